//! Command-line configuration
//!
//! Every flag can also be supplied through the environment variable named in
//! its `env` attribute. Values are validated once, up front, by a flat list of
//! `(flag, value, predicate)` checks; the first failing check aborts the run.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use tracing::info;

use crate::SyncError;

/// Flag name of the Gardener kubeconfig path
pub const FLAG_GARDENER_KUBECONFIG_PATH: &str = "gardener-kubeconfig-path";
/// Flag name of the target ConfigMap name
pub const FLAG_SEED_MAP_NAME: &str = "gardener-seed-map-name";
/// Flag name of the target ConfigMap namespace
pub const FLAG_SEED_MAP_NAMESPACE: &str = "gardener-seed-map-namespace";
/// Flag name of the Gardener list timeout
pub const FLAG_GARDENER_TIMEOUT: &str = "gardener-timeout";
/// Flag name of the KCP client timeout
pub const FLAG_KCP_TIMEOUT: &str = "kcp-timeout";
/// Flag name of the log level
pub const FLAG_LOG_LEVEL: &str = "log-level";

/// Default location of the mounted Gardener kubeconfig
pub const DEFAULT_GARDENER_KUBECONFIG_PATH: &str = "/gardener/kubeconfig";
/// Default name of the ConfigMap holding seed regions
pub const DEFAULT_SEED_MAP_NAME: &str = "gardener-seeds-cache";
/// Default namespace of the ConfigMap holding seed regions
pub const DEFAULT_SEED_MAP_NAMESPACE: &str = "kcp-system";
/// Default timeout for Gardener and KCP calls
pub const DEFAULT_TIMEOUT: &str = "10s";

/// Namespaced address of a Kubernetes object
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectKey {
    /// Object namespace
    pub namespace: String,
    /// Object name
    pub name: String,
}

impl ObjectKey {
    /// Create a key from namespace and name
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Accepted log levels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Includes per-seed rejection reasons
    Debug,
    /// Stage completion and timings
    #[default]
    Info,
    /// Warnings only
    Warn,
    /// Errors only
    Error,
}

impl LogLevel {
    /// All accepted levels, in increasing severity
    pub const ALL: [LogLevel; 4] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
    ];

    /// The flag spelling of this level
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// `tracing_subscriber::EnvFilter` directive for this level
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Parse a flag value, case-sensitive like the flag itself
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.as_str() == s)
    }
}

/// gardener-syncer - copy schedulable Gardener seed regions into a KCP ConfigMap
#[derive(Parser, Debug, Clone)]
#[command(name = "gardener-syncer", version, about, long_about = None)]
pub struct Config {
    /// A path to gardener kubeconfig file
    #[arg(
        long = FLAG_GARDENER_KUBECONFIG_PATH,
        env = "GARDENER_KUBECONFIG_PATH",
        default_value = DEFAULT_GARDENER_KUBECONFIG_PATH
    )]
    pub gardener_kubeconfig_path: PathBuf,

    /// The name of the config-map that will store gardener seeds
    #[arg(
        long = FLAG_SEED_MAP_NAME,
        env = "GARDENER_SEED_MAP_NAME",
        default_value = DEFAULT_SEED_MAP_NAME
    )]
    pub seed_map_name: String,

    /// The namespace of the config-map that will store gardener seeds
    #[arg(
        long = FLAG_SEED_MAP_NAMESPACE,
        env = "GARDENER_SEED_MAP_NAMESPACE",
        default_value = DEFAULT_SEED_MAP_NAMESPACE
    )]
    pub seed_map_namespace: String,

    /// Gardener client timeout duration (e.g. 10s, 2m, 500ms)
    #[arg(
        long = FLAG_GARDENER_TIMEOUT,
        env = "GARDENER_TIMEOUT",
        default_value = DEFAULT_TIMEOUT
    )]
    pub gardener_timeout: String,

    /// Path to the KCP kubeconfig; inferred from the environment when unset
    #[arg(long = "kcp-kubeconfig-path", env = "KCP_KUBECONFIG_PATH")]
    pub kcp_kubeconfig_path: Option<PathBuf>,

    /// KCP client timeout duration (e.g. 10s, 2m, 500ms)
    #[arg(long = FLAG_KCP_TIMEOUT, env = "KCP_TIMEOUT", default_value = DEFAULT_TIMEOUT)]
    pub kcp_timeout: String,

    /// One of: DEBUG, INFO, WARN, ERROR
    #[arg(long = FLAG_LOG_LEVEL, env = "LOG_LEVEL", default_value = "INFO")]
    pub log_level: String,
}

type Rule = fn(&str) -> bool;

fn is_not_empty(s: &str) -> bool {
    !s.is_empty()
}

fn is_valid_duration(s: &str) -> bool {
    parse_duration(s).is_some()
}

fn is_valid_log_level(s: &str) -> bool {
    LogLevel::parse(s).is_some()
}

/// Parse a non-zero duration such as `10s`, `500ms` or `2m`
pub fn parse_duration(s: &str) -> Option<Duration> {
    humantime::parse_duration(s.trim())
        .ok()
        .filter(|d| !d.is_zero())
}

impl Config {
    /// Parse configuration from the process arguments and validate it
    pub fn from_args() -> Result<Self, SyncError> {
        Self::try_from_iter(std::env::args_os())
    }

    /// Parse configuration from an argument iterator and validate it
    ///
    /// `--help` and `--version` print and exit like any clap binary.
    pub fn try_from_iter<I, T>(args: I) -> Result<Self, SyncError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let config = Self::try_parse_from(args).unwrap_or_else(|e| e.exit());
        config.validate()?;
        Ok(config)
    }

    /// Check every flag value against its rules
    pub fn validate(&self) -> Result<(), SyncError> {
        let kubeconfig = self.gardener_kubeconfig_path.to_string_lossy();
        let checks: [(&'static str, &str, Rule); 6] = [
            (FLAG_GARDENER_KUBECONFIG_PATH, &*kubeconfig, is_not_empty),
            (FLAG_SEED_MAP_NAME, self.seed_map_name.as_str(), is_not_empty),
            (FLAG_SEED_MAP_NAMESPACE, self.seed_map_namespace.as_str(), is_not_empty),
            (FLAG_GARDENER_TIMEOUT, self.gardener_timeout.as_str(), is_valid_duration),
            (FLAG_KCP_TIMEOUT, self.kcp_timeout.as_str(), is_valid_duration),
            (FLAG_LOG_LEVEL, self.log_level.as_str(), is_valid_log_level),
        ];

        for (flag, value, is_valid) in checks {
            if !is_valid(value) {
                return Err(SyncError::Config {
                    flag,
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Key of the ConfigMap the syncer maintains
    pub fn seed_map_key(&self) -> ObjectKey {
        ObjectKey::new(&self.seed_map_namespace, &self.seed_map_name)
    }

    /// Deadline for listing seeds
    pub fn gardener_timeout(&self) -> Result<Duration, SyncError> {
        duration_flag(FLAG_GARDENER_TIMEOUT, &self.gardener_timeout)
    }

    /// Deadline for KCP reads and writes
    pub fn kcp_timeout(&self) -> Result<Duration, SyncError> {
        duration_flag(FLAG_KCP_TIMEOUT, &self.kcp_timeout)
    }

    /// Configured log level
    pub fn log_level(&self) -> LogLevel {
        LogLevel::parse(&self.log_level).unwrap_or_default()
    }

    /// Gardener kubeconfig path
    pub fn gardener_kubeconfig(&self) -> &Path {
        &self.gardener_kubeconfig_path
    }

    /// Log the effective configuration
    pub fn log(&self) {
        info!(
            gardener_kubeconfig_path = %self.gardener_kubeconfig_path.display(),
            gardener_seed_map_name = %self.seed_map_name,
            gardener_seed_map_namespace = %self.seed_map_namespace,
            gardener_timeout = %self.gardener_timeout,
            kcp_timeout = %self.kcp_timeout,
            log_level = %self.log_level,
            "configuration parsed"
        );
    }
}

fn duration_flag(flag: &'static str, value: &str) -> Result<Duration, SyncError> {
    parse_duration(value).ok_or_else(|| SyncError::Config {
        flag,
        value: value.to_string(),
    })
}
