//! Gardener Seed resource
//!
//! A Seed registers a cluster that can host shoot control planes. The type is
//! owned by Gardener; only the fields the syncer reads are modelled here and
//! schema generation is disabled.

use kube::CustomResource;
use serde::{Deserialize, Serialize};

use super::types::{Condition, LastOperation};

/// Condition type reported by gardenlet once it is connected and healthy
pub const SEED_GARDENLET_READY: &str = "GardenletReady";

/// Condition type reported once the seed's backup buckets are usable
pub const SEED_BACKUP_BUCKETS_READY: &str = "BackupBucketsReady";

/// Seed specification
///
/// Example:
/// ```yaml
/// apiVersion: core.gardener.cloud/v1beta1
/// kind: Seed
/// metadata:
///   name: aws-eu1
/// spec:
///   provider:
///     type: aws
///     region: eu-central-1
///   backup:
///     provider: aws
///   settings:
///     scheduling:
///       visible: true
/// ```
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[kube(
    group = "core.gardener.cloud",
    version = "v1beta1",
    kind = "Seed",
    status = "SeedStatus",
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct SeedSpec {
    /// Infrastructure the seed cluster runs on
    #[serde(default)]
    pub provider: SeedProvider,

    /// Backup configuration; when set, backup buckets must be ready
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup: Option<SeedBackup>,

    /// Optional seed settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<SeedSettings>,
}

/// Seed provider details
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeedProvider {
    /// Provider type (e.g. aws, gcp, azure, openstack)
    #[serde(rename = "type", default)]
    pub type_: String,

    /// Provider region of the seed cluster
    #[serde(default)]
    pub region: String,
}

/// Backup configuration of a seed
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeedBackup {
    /// Backup infrastructure provider type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    /// Backup region, defaults to the seed region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// Seed settings
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeedSettings {
    /// Scheduling settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduling: Option<SeedSettingScheduling>,
}

/// Scheduling settings of a seed
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeedSettingScheduling {
    /// Whether the scheduler may place shoots on this seed
    #[serde(default)]
    pub visible: bool,
}

/// Seed status
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeedStatus {
    /// Conditions reported by gardenlet
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,

    /// Last operation performed on the seed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_operation: Option<LastOperation>,
}

impl Seed {
    /// Whether the seed has been marked for deletion
    pub fn is_deleting(&self) -> bool {
        self.metadata.deletion_timestamp.is_some()
    }

    /// Whether the seed is visible to the scheduler
    ///
    /// Missing `settings` or `settings.scheduling` means not visible.
    pub fn is_visible(&self) -> bool {
        self.spec
            .settings
            .as_ref()
            .and_then(|s| s.scheduling.as_ref())
            .is_some_and(|s| s.visible)
    }

    /// Conditions reported on the seed, empty if it has no status yet
    pub fn conditions(&self) -> &[Condition] {
        self.status
            .as_ref()
            .map(|s| s.conditions.as_slice())
            .unwrap_or_default()
    }

    /// The last operation recorded on the seed, if any
    pub fn last_operation(&self) -> Option<&LastOperation> {
        self.status.as_ref().and_then(|s| s.last_operation.as_ref())
    }
}
