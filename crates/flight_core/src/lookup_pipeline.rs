//! Retry orchestration across attempts and flight-number spellings
//!
//! One "pass" is a bounded linear retry cycle over a single spelling,
//! rotating proxy and user agent per attempt. The top level runs a pass over
//! the literal input and, when that yields nothing, one more pass over the
//! carrier-letter respelling. Rotation exists to evade upstream blocking,
//! not to ride out congestion, so there is no backoff or jitter.

use tracing::{debug, info, instrument, warn};

use crate::extract::extract_flights;
use crate::fetch::PageFetcher;
use crate::flight_number::alternate_spelling;
use crate::normalize::{normalize_flights, NormalizedFlightInfo};
use crate::proxy::{ProxyDescriptor, ProxyPool, ProxyRotation};
use crate::user_agent::random_user_agent;
use crate::{LookupConfig, LookupError};

/// Drives Fetcher → Extractor → Normalizer under the retry policy
pub struct LookupPipeline {
    config: LookupConfig,
    fetcher: PageFetcher,
    proxy_pool: ProxyPool,
}

impl LookupPipeline {
    /// Create a pipeline over an injected read-only proxy pool
    pub fn new(config: LookupConfig, proxy_pool: ProxyPool) -> Self {
        let fetcher = PageFetcher::new(&config);
        info!(
            "Lookup pipeline initialized - {} attempt(s) per pass, {} proxy(ies)",
            config.max_attempts,
            proxy_pool.len()
        );
        Self {
            config,
            fetcher,
            proxy_pool,
        }
    }

    /// Look up a flight, trying the literal spelling and then the
    /// carrier-letter respelling
    ///
    /// # Returns
    /// * `Ok((info, spelling))` with the normalized record and the spelling
    ///   that produced it
    /// * `Err(LookupError::NotFound)` once every attempt of every pass has
    ///   failed
    #[instrument(skip(self), fields(flight_number = %flight_number))]
    pub async fn lookup(
        &self,
        flight_number: &str,
    ) -> Result<(NormalizedFlightInfo, String), LookupError> {
        match self.run_pass(flight_number).await {
            Ok(info) => return Ok((info, flight_number.to_string())),
            Err(e) => debug!("Pass over {} yielded nothing: {}", flight_number, e),
        }

        if let Some(alternate) = alternate_spelling(flight_number) {
            info!(
                "No valid data for {}; retrying as {}",
                flight_number, alternate
            );
            if let Ok(info) = self.run_pass(&alternate).await {
                info!("Flight information found using flight number {}", alternate);
                return Ok((info, alternate));
            }
        }

        Err(LookupError::NotFound)
    }

    /// One full retry cycle for a single spelling, with a fresh proxy
    /// rotation
    async fn run_pass(&self, flight_number: &str) -> Result<NormalizedFlightInfo, LookupError> {
        let mut rotation = ProxyRotation::new();

        for attempt in 1..=self.config.max_attempts {
            let proxy = rotation.next(&self.proxy_pool);
            let user_agent = random_user_agent();
            debug!(
                "Attempt {}/{} for {} via {:?}",
                attempt,
                self.config.max_attempts,
                flight_number,
                proxy.map(ProxyDescriptor::endpoint)
            );

            match self.attempt(flight_number, proxy, user_agent).await {
                Ok(info) => {
                    info!("Attempt {} for {} succeeded", attempt, flight_number);
                    return Ok(info);
                }
                Err(e) => warn!(
                    "Attempt {}/{} for {} failed: {}",
                    attempt, self.config.max_attempts, flight_number, e
                ),
            }
        }

        Err(LookupError::NotFound)
    }

    async fn attempt(
        &self,
        flight_number: &str,
        proxy: Option<&ProxyDescriptor>,
        user_agent: &str,
    ) -> Result<NormalizedFlightInfo, LookupError> {
        let html = self
            .fetcher
            .fetch_tracking_page(flight_number, proxy, user_agent)
            .await?;
        let flights = extract_flights(&html)?;
        normalize_flights(&flights)
    }
}
