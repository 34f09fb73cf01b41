//! Tracking-page retrieval
//!
//! This module issues the single outbound GET for one lookup attempt. The
//! client is rebuilt per attempt so the proxy route and user agent can change
//! between attempts.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::proxy::ProxyDescriptor;
use crate::{LookupConfig, LookupError};

/// Fetches the live-tracking page for a flight number
pub struct PageFetcher {
    base_url: String,
    timeout: Duration,
    dump_dir: Option<PathBuf>,
}

impl PageFetcher {
    pub fn new(config: &LookupConfig) -> Self {
        Self {
            base_url: config.tracker_base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.fetch_timeout_secs),
            dump_dir: config.html_dump_dir.clone(),
        }
    }

    /// Fetch the raw HTML of the tracking page for `flight_number`
    ///
    /// # Arguments
    /// * `flight_number` - Spelling to interpolate into the page URL
    /// * `proxy` - Optional proxy to route both HTTP and HTTPS traffic through
    /// * `user_agent` - User-agent header for this attempt
    ///
    /// # Returns
    /// * `Ok(html)` on HTTP 200
    /// * `Err(LookupError::UpstreamStatus)` on any other status
    /// * `Err(LookupError::Fetch)` on transport errors (timeout, connection
    ///   refused, proxy auth failure)
    pub async fn fetch_tracking_page(
        &self,
        flight_number: &str,
        proxy: Option<&ProxyDescriptor>,
        user_agent: &str,
    ) -> Result<String, LookupError> {
        let url = format!("{}/live/flight/{}", self.base_url, flight_number);
        debug!("Fetching {} (proxy: {:?})", url, proxy.map(|p| p.endpoint()));

        let mut builder = Client::builder()
            .timeout(self.timeout)
            .user_agent(user_agent);
        if let Some(descriptor) = proxy {
            builder = builder.proxy(reqwest::Proxy::all(descriptor.url())?);
        }
        let client = builder.build()?;

        let response = client.get(&url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            debug!("Failed to retrieve {}: status {}", url, status);
            return Err(LookupError::UpstreamStatus(status.as_u16()));
        }

        let html = response.text().await?;

        if let Some(dir) = &self.dump_dir {
            self.dump_html(dir, flight_number, &html).await;
        }

        Ok(html)
    }

    /// Write the raw page to `<dump_dir>/<flight_number>.html`; failures only
    /// affect diagnostics, never the lookup result.
    async fn dump_html(&self, dir: &PathBuf, flight_number: &str, html: &str) {
        if let Err(e) = tokio::fs::create_dir_all(dir).await {
            warn!("Could not create HTML dump directory {:?}: {}", dir, e);
            return;
        }
        let path = dir.join(format!("{flight_number}.html"));
        if let Err(e) = tokio::fs::write(&path, html).await {
            warn!("Could not write HTML dump {:?}: {}", path, e);
        }
    }
}
