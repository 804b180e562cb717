//! Error types for configuration operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for configuration discovery and loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The selected configuration source does not exist.
    #[error("configuration file not found at '{}'", path.display())]
    NotFound {
        /// Location that was probed.
        path: PathBuf,
    },
    /// The configuration source exists but is not a valid document.
    #[error("failed to parse configuration file '{}'", path.display())]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },
    /// File system operation failed.
    #[error("filesystem operation failed ({operation}) for '{}'", path.display())]
    Io {
        /// Operation identifier.
        operation: &'static str,
        /// Path involved in the failed operation.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
