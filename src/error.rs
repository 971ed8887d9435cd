//! Error types for lookout.
//!
//! Uses `thiserror` for ergonomic error definitions. Per-port failures during a
//! bulk scan are values the prober matches on; only configuration errors and
//! deep-probe failures reach the caller.

use std::path::PathBuf;
use thiserror::Error;

pub use crate::types::{PortError, TargetError};

/// Outcome of a failed connection attempt against a single port.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Connection timed out")]
    Timeout,

    #[error("Connection refused")]
    ConnectionRefused,

    #[error("Connection to port {port} failed: {reason}")]
    ConnectionFailed { port: u16, reason: String },

    #[error("Admission gate closed while the scan was running")]
    GateClosed,
}

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Failure of the single-target HTTP/HTTPS header probe.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error(transparent)]
    Resolve(#[from] TargetError),

    #[error("Connection to {addr} failed: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TLS error: {0}")]
    Tls(#[from] native_tls::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Timed out during {stage}")]
    TimedOut { stage: &'static str },
}

/// Result type alias for deep-probe operations.
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Errors raised while loading or saving application settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine the configuration directory")]
    DirectoryNotFound,

    #[error("Failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("Failed to write {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    #[error("Invalid settings file: {0}")]
    InvalidFormat(String),

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level error for command handlers.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Port(#[from] PortError),

    #[error(transparent)]
    Target(#[from] TargetError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Probe(#[from] ProbeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Interrupted")]
    Interrupted,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for command handlers.
pub type CliResult<T> = Result<T, CliError>;
