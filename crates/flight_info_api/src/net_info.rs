//! Local and public IP discovery
//!
//! Logged once at startup; the public IP also feeds the proxy provisioning
//! request, which allow-lists the caller's address.

use std::net::UdpSocket;

use tracing::warn;

/// Best-effort local IP via a connected UDP socket
///
/// The target address never needs to be reachable; connecting is enough to
/// make the OS pick the outbound interface. Falls back to loopback.
pub fn local_ip() -> String {
    fn probe() -> std::io::Result<String> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.connect("10.255.255.255:1")?;
        Ok(socket.local_addr()?.ip().to_string())
    }

    probe().unwrap_or_else(|_| "127.0.0.1".to_string())
}

/// Public IP as seen from outside, via api.ipify.org
pub async fn public_ip() -> Option<String> {
    match reqwest::get("https://api.ipify.org").await {
        Ok(response) => match response.text().await {
            Ok(text) => Some(text.trim().to_string()),
            Err(e) => {
                warn!("Unable to read public IP response: {}", e);
                None
            }
        },
        Err(e) => {
            warn!("Unable to determine public IP: {}", e);
            None
        }
    }
}
