use std::path::PathBuf;

use thiserror::Error;

/// Common error type for the exporter's shared plumbing.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Logging error: {0}")]
    Logging(String),

    #[error("Failed to read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;
