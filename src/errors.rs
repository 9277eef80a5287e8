use std::path::PathBuf;
use thiserror::Error;

/// Startup failures. Any of these is fatal to the process.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SDK configuration failed. '{}' not found.", .0.display())]
    NotFound(PathBuf),

    #[error("INI parsing error: {0}")]
    IniParse(String),

    #[error("Configuration failed. Setting '{0}' is empty - please check the config file")]
    MissingField(&'static str),

    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Failures reported by a single storage operation.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Text reported by the storage backend, kept verbatim.
    #[error("{0}")]
    Service(String),

    #[error("Local file '{}' could not be read: {source}", .path.display())]
    LocalFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    pub fn service(message: impl Into<String>) -> Self {
        StorageError::Service(message.into())
    }
}

// Use Box<dyn Error> at the application boundary, same as the rest of the binary
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
