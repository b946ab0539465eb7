//! Error types shared by gardener-syncer crates
//!
//! Errors carry the context in which they occurred (e.g. which client was
//! being built) so the final log line is enough to diagnose a failed run.

use thiserror::Error;

/// Common error type
#[derive(Debug, Error)]
pub enum Error {
    /// Kubernetes API error
    #[error("kubernetes error: {source}")]
    Kube {
        /// The underlying kube-rs error
        #[from]
        source: kube::Error,
    },

    /// Building a Kubernetes client failed
    #[error("client error [{context}]: {message}")]
    Client {
        /// Description of what failed
        message: String,
        /// Which client was being built (e.g. "gardener", "kcp")
        context: String,
    },
}

impl Error {
    /// Create a client construction error with context
    pub fn client(context: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Client {
            message: msg.into(),
            context: context.into(),
        }
    }
}
