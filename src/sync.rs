//! One-shot synchronisation: fetch provider regions, then store them

use std::time::Instant;

use async_trait::async_trait;
use tracing::info;

#[cfg(test)]
use mockall::automock;

use crate::providers::Providers;
use crate::SyncError;

/// Produces the current provider regions
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FetchSeeds: Send + Sync {
    /// Fetch and aggregate
    async fn fetch(&self) -> Result<Providers, SyncError>;
}

/// Persists provider regions
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StoreProviders: Send + Sync {
    /// Store the aggregate, replacing what was stored before
    async fn store(&self, providers: &Providers) -> Result<(), SyncError>;
}

/// Run one fetch followed by one store
///
/// A fetch failure is returned unchanged and nothing is written.
pub async fn sync(fetch: &dyn FetchSeeds, store: &dyn StoreProviders) -> Result<(), SyncError> {
    let start = Instant::now();

    let providers = fetch.fetch().await?;
    store.store(&providers).await?;

    info!(
        providers = providers.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "synchronisation complete"
    );
    Ok(())
}
