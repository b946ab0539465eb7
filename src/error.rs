//! Error types for a synchronisation run
//!
//! Every variant is terminal: the run stops at the first failing stage and
//! the binary exits non-zero after logging it.

use std::time::Duration;

use thiserror::Error;

use crate::config::ObjectKey;

/// Why a call to one of the control planes failed
#[derive(Debug, Error)]
pub enum StageFailure {
    /// The API call returned an error
    #[error(transparent)]
    Kube(#[from] kube::Error),

    /// The call did not finish before the stage deadline
    #[error("deadline of {0:?} exceeded")]
    Timeout(Duration),
}

/// Main error type for a synchronisation run
#[derive(Debug, Error)]
pub enum SyncError {
    /// Listing seeds from Gardener failed
    #[error("failed to list seeds: {source}")]
    List {
        /// The underlying failure
        source: StageFailure,
    },

    /// Reading the target ConfigMap failed for a reason other than not-found
    #[error("failed to read config map {key}: {source}")]
    Read {
        /// The ConfigMap being read
        key: ObjectKey,
        /// The underlying failure
        source: StageFailure,
    },

    /// Rendering a provider entry as YAML failed
    #[error("failed to encode regions of provider {provider}: {source}")]
    Encoding {
        /// Provider whose entry could not be rendered
        provider: String,
        /// The underlying encoder error
        source: serde_yaml::Error,
    },

    /// Applying the target ConfigMap failed
    #[error("failed to apply config map {key}: {source}")]
    Write {
        /// The ConfigMap being written
        key: ObjectKey,
        /// The underlying failure
        source: StageFailure,
    },

    /// A configuration value failed validation
    #[error("invalid value for --{flag}: {value:?}")]
    Config {
        /// Flag name without leading dashes
        flag: &'static str,
        /// The rejected value
        value: String,
    },

    /// Building a Kubernetes client failed
    #[error(transparent)]
    Client(#[from] gardener_syncer_common::Error),
}

impl SyncError {
    /// Name of the stage that produced this error, used as a log field
    pub fn stage(&self) -> &'static str {
        match self {
            SyncError::List { .. } => "fetch",
            SyncError::Read { .. } | SyncError::Encoding { .. } | SyncError::Write { .. } => {
                "store"
            }
            SyncError::Config { .. } => "config",
            SyncError::Client(_) => "client",
        }
    }
}
