//! Configuration sources
//!
//! File and process-environment implementations of the `ConfigSource`
//! port. All of them degrade to "layer absent" on failure.

mod env;
mod location;
mod properties;
mod yaml;

pub use env::{DEFAULT_ENV_PREFIX, ProcessEnvSource};
pub use location::{DEFAULT_CONFIG_DIR, FileLocation};
pub use properties::PropertiesFileSource;
pub use yaml::YamlFileSource;

use std::path::PathBuf;

/// Why a file-backed layer could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The file does not exist.
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// The file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying cause.
        #[source]
        source: std::io::Error,
    },

    /// The file content is not valid for its format.
    #[error("failed to parse {path}: {message}")]
    Parse {
        /// File path.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
}
