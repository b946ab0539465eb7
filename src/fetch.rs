//! Fetch stage: list seeds under a deadline and aggregate their regions

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::info;

use crate::client::SeedLister;
use crate::convert::to_provider_regions;
use crate::error::StageFailure;
use crate::providers::Providers;
use crate::sync::FetchSeeds;
use crate::SyncError;

/// Lists seeds from Gardener and turns them into provider regions
pub struct SeedFetcher<L> {
    lister: L,
    timeout: Duration,
}

impl<L: SeedLister> SeedFetcher<L> {
    /// Create a fetcher bounding the list call by `timeout`
    pub fn new(lister: L, timeout: Duration) -> Self {
        Self { lister, timeout }
    }

    /// List seeds and aggregate the usable ones
    ///
    /// A failed or timed-out list is returned as [`SyncError::List`]; the
    /// call is not retried.
    pub async fn fetch(&self) -> Result<Providers, SyncError> {
        let start = Instant::now();

        let seeds = tokio::time::timeout(self.timeout, self.lister.list_seeds())
            .await
            .map_err(|_| SyncError::List {
                source: StageFailure::Timeout(self.timeout),
            })?
            .map_err(|e| SyncError::List { source: e.into() })?;

        info!(
            count = seeds.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "gardener-seed list complete"
        );

        let providers = to_provider_regions(&seeds);

        info!(
            duration_ms = start.elapsed().as_millis() as u64,
            "fetching gardener data complete"
        );
        Ok(providers)
    }
}

#[async_trait]
impl<L: SeedLister> FetchSeeds for SeedFetcher<L> {
    async fn fetch(&self) -> Result<Providers, SyncError> {
        SeedFetcher::fetch(self).await
    }
}
