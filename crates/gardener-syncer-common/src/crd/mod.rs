//! Gardener resource definitions read by the syncer

mod seed;
mod types;

pub use seed::{
    Seed, SeedBackup, SeedProvider, SeedSettingScheduling, SeedSettings, SeedSpec, SeedStatus,
    SEED_BACKUP_BUCKETS_READY, SEED_GARDENLET_READY,
};
pub use types::{Condition, LastOperation};
