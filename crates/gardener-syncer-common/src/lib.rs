//! Common types for gardener-syncer: the Seed resource model, errors, and
//! Kubernetes client utilities

#![deny(missing_docs)]

pub mod crd;
pub mod error;
pub mod kube_utils;

pub use error::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Condition status value meaning the condition holds
pub const STATUS_TRUE: &str = "True";
