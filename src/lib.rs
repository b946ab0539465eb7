//! gardener-syncer - publish schedulable Gardener seed regions to KCP
//!
//! A one-shot job that lists the seeds of a Gardener landscape, keeps the
//! ones that can take new shoots, groups their regions by provider type and
//! server-side applies the result into a ConfigMap on the KCP cluster.
//!
//! # Modules
//!
//! - [`config`] - Flags, environment variables and their validation
//! - [`client`] - Seed listing and ConfigMap access behind mockable traits
//! - [`readiness`] - Which seeds are usable scheduling targets
//! - [`providers`] - Provider type to regions aggregate
//! - [`convert`] - Seeds to aggregate, aggregate to ConfigMap data
//! - [`fetch`] - Deadline-bounded seed listing
//! - [`store`] - Read-modify-apply of the target ConfigMap
//! - [`sync`] - Fetch followed by store
//! - [`error`] - Error types for a run

#![deny(missing_docs)]

pub mod client;
pub mod config;
pub mod convert;
pub mod error;
pub mod fetch;
pub mod providers;
pub mod readiness;
pub mod store;
pub mod sync;

pub use error::{StageFailure, SyncError};

/// Result type alias using [`SyncError`]
pub type Result<T> = std::result::Result<T, SyncError>;

/// Field manager used for server-side apply of the seed ConfigMap
pub const FIELD_MANAGER: &str = "gardener-syncer";
