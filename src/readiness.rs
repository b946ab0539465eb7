//! Seed readiness filter
//!
//! A seed is usable for scheduling when it is not being deleted, is visible
//! to the scheduler and gardenlet reports it ready (plus its backup buckets,
//! if it declares a backup).

use gardener_syncer_common::crd::{Seed, SEED_BACKUP_BUCKETS_READY, SEED_GARDENLET_READY};
use gardener_syncer_common::kube_utils::has_condition;
use kube::ResourceExt;
use tracing::debug;

/// Whether gardenlet has finished at least one operation and reports the
/// seed (and its backup buckets, when configured) as ready
pub fn verify_seed_readiness(seed: &Seed) -> bool {
    if seed.last_operation().is_none() {
        return false;
    }

    let conditions = seed.conditions();
    if !has_condition(conditions, SEED_GARDENLET_READY) {
        return false;
    }

    if seed.spec.backup.is_some() && !has_condition(conditions, SEED_BACKUP_BUCKETS_READY) {
        return false;
    }

    true
}

/// Whether a seed can be offered as a scheduling target
pub fn seed_can_be_used(seed: &Seed) -> bool {
    let is_deleted = seed.is_deleting();
    let is_visible = seed.is_visible();
    let is_ready = verify_seed_readiness(seed);

    let usable = !is_deleted && is_visible && is_ready;
    if !usable {
        debug!(
            seed = %seed.name_any(),
            is_deleted,
            is_visible,
            is_ready,
            "seed rejected"
        );
    }
    usable
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Seed builders shared by the pipeline tests

    use gardener_syncer_common::crd::{
        Condition, LastOperation, Seed, SeedBackup, SeedProvider, SeedSettingScheduling,
        SeedSettings, SeedSpec, SeedStatus,
    };
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;

    /// A visible seed with a completed operation and GardenletReady=True
    pub fn ready_seed(name: &str, provider: &str, region: &str) -> Seed {
        let mut seed = Seed::new(
            name,
            SeedSpec {
                provider: SeedProvider {
                    type_: provider.to_string(),
                    region: region.to_string(),
                },
                backup: None,
                settings: Some(SeedSettings {
                    scheduling: Some(SeedSettingScheduling { visible: true }),
                }),
            },
        );
        seed.status = Some(SeedStatus {
            conditions: vec![Condition::new("GardenletReady", "True")],
            last_operation: Some(LastOperation::default()),
        });
        seed
    }

    /// A ready seed that also declares a backup with ready buckets
    pub fn ready_seed_with_backup(name: &str, provider: &str, region: &str) -> Seed {
        let mut seed = with_backup(ready_seed(name, provider, region));
        set_condition(&mut seed, "BackupBucketsReady", "True");
        seed
    }

    pub fn with_backup(mut seed: Seed) -> Seed {
        seed.spec.backup = Some(SeedBackup::default());
        seed
    }

    pub fn deleting(mut seed: Seed) -> Seed {
        seed.metadata.deletion_timestamp = Some(Time(Default::default()));
        seed
    }

    pub fn invisible(mut seed: Seed) -> Seed {
        seed.spec.settings = Some(SeedSettings {
            scheduling: Some(SeedSettingScheduling { visible: false }),
        });
        seed
    }

    pub fn without_last_operation(mut seed: Seed) -> Seed {
        if let Some(status) = seed.status.as_mut() {
            status.last_operation = None;
        }
        seed
    }

    pub fn without_condition(mut seed: Seed, type_: &str) -> Seed {
        if let Some(status) = seed.status.as_mut() {
            status.conditions.retain(|c| c.type_ != type_);
        }
        seed
    }

    pub fn set_condition(seed: &mut Seed, type_: &str, status: &str) {
        let status_block = seed.status.get_or_insert_with(Default::default);
        status_block.conditions.retain(|c| c.type_ != type_);
        status_block.conditions.push(Condition::new(type_, status));
    }
}
