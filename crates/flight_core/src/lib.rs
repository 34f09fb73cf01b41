//! # flight_core
//!
//! Flight lookup library: retrieves a live flight-tracking page, extracts the
//! embedded `trackpollBootstrap` JSON blob, and projects the first flight
//! record into a fixed, serializable summary.
//!
//! ## Features
//!
//! - **Tracking-page retrieval** over an optional authenticated proxy with a
//!   rotating user agent
//! - **Embedded-JSON extraction** via a fixed assignment-marker scan
//! - **Normalization** into a stable output schema with placeholder defaults
//! - **Bounded retry orchestration** rotating proxy, user agent, and
//!   flight-number spelling
//!
//! ## Example
//!
//! ```rust,no_run
//! use flight_core::{LookupConfig, LookupPipeline, ProxyPool};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = LookupPipeline::new(LookupConfig::default(), ProxyPool::empty());
//!
//!     let (info, spelling) = pipeline.lookup("DL400").await?;
//!     println!("{} is {}", spelling, info.flight_status);
//!
//!     Ok(())
//! }
//! ```

pub mod extract;
pub mod fetch;
pub mod flight_number;
pub mod lookup_pipeline;
pub mod normalize;
pub mod proxy;
pub mod user_agent;

use std::path::PathBuf;

use thiserror::Error;

/// Configuration for the flight lookup pipeline
#[derive(Debug, Clone)]
pub struct LookupConfig {
    /// Base URL of the flight-tracking site
    pub tracker_base_url: String,
    /// Per-fetch timeout in seconds
    pub fetch_timeout_secs: u64,
    /// Attempts per flight-number spelling before the pass is abandoned
    pub max_attempts: u32,
    /// Directory for raw-HTML diagnostic dumps; disabled when unset
    pub html_dump_dir: Option<PathBuf>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            tracker_base_url: "https://www.flightaware.com".to_string(),
            fetch_timeout_secs: 10,
            max_attempts: 5,
            html_dump_dir: None,
        }
    }
}

/// Errors that can occur during a flight lookup
///
/// Everything except [`LookupError::NotFound`] is recovered inside the
/// pipeline and counted as a failed attempt.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("upstream returned HTTP {0}")]
    UpstreamStatus(u16),
    #[error("no flight data found in page")]
    NoData,
    #[error("flight record contains only placeholder values")]
    AllPlaceholders,
    #[error("flight information not found after exhausting all attempts")]
    NotFound,
}

pub type Result<T> = std::result::Result<T, LookupError>;

// Re-export main types
pub use lookup_pipeline::LookupPipeline;
pub use normalize::NormalizedFlightInfo;
pub use proxy::{ProxyDescriptor, ProxyPool};
