//! Seeds → provider regions → ConfigMap data

use std::collections::BTreeMap;
use std::time::Instant;

use gardener_syncer_common::crd::Seed;
use tracing::info;

use crate::providers::Providers;
use crate::readiness::seed_can_be_used;
use crate::SyncError;

/// Aggregate the regions of all usable seeds by provider type
///
/// Region order within a provider follows the order of `seeds`.
pub fn to_provider_regions(seeds: &[Seed]) -> Providers {
    let start = Instant::now();

    let mut out = Providers::new();
    for seed in seeds.iter().filter(|s| seed_can_be_used(s)) {
        out.add(&seed.spec.provider.type_, &seed.spec.provider.region);
    }

    info!(
        seeds = seeds.len(),
        providers = out.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "conversion complete"
    );
    out
}

/// Render each provider's regions as a YAML block for the ConfigMap data
///
/// ```text
/// seedRegions:
/// - eu-1
/// - eu-2
/// ```
///
/// Trailing newlines are trimmed so the stored value is stable.
pub fn to_config_map_data(providers: &Providers) -> Result<BTreeMap<String, String>, SyncError> {
    providers
        .iter()
        .map(|(provider, info)| {
            let rendered = serde_yaml::to_string(info).map_err(|source| SyncError::Encoding {
                provider: provider.clone(),
                source,
            })?;
            Ok((provider.clone(), rendered.trim_end_matches('\n').to_string()))
        })
        .collect()
}
