//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service.

use crate::config::ConfigError;
use cadence_core::ports::PortError;

/// Top-level error for the `api` binaries. Everything that can stop the
/// service at startup or leak past a handler converges here.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Configuration could not be loaded or parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A failure surfaced through one of the core ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// The database driver failed outside the port mapping (pool setup,
    /// migrations).
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Socket binding and other I/O at startup.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything without a more specific home.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}
