//! Provider → region aggregate built from eligible seeds

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Regions in which a provider has at least one usable seed
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    /// Distinct regions in first-seen order
    pub seed_regions: Vec<String>,
}

/// Aggregate keyed by provider type
///
/// Backed by a `BTreeMap` so iteration order, and everything rendered from
/// it, only depends on the content.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Providers(BTreeMap<String, ProviderInfo>);

impl Providers {
    /// Create an empty aggregate
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `provider` has a usable seed in `region`
    ///
    /// Regions already recorded for the provider are ignored.
    pub fn add(&mut self, provider: &str, region: &str) {
        let info = self.0.entry(provider.to_string()).or_default();
        if info.seed_regions.iter().any(|r| r == region) {
            return;
        }
        info.seed_regions.push(region.to_string());
    }

    /// Regions of a single provider
    pub fn get(&self, provider: &str) -> Option<&ProviderInfo> {
        self.0.get(provider)
    }

    /// Iterate providers in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ProviderInfo)> {
        self.0.iter()
    }

    /// Number of providers
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no provider has been recorded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, ProviderInfo)> for Providers {
    fn from_iter<I: IntoIterator<Item = (String, ProviderInfo)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
