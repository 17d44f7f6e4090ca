//! Where a file-backed layer lives.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::SourceError;

/// Directory searched for configuration files when none is given.
pub const DEFAULT_CONFIG_DIR: &str = "config";

/// Location of a configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileLocation {
    /// A single file used for every environment.
    Fixed(PathBuf),
    /// `{dir}/{stem}-{environment}.{extension}`, chosen per environment.
    PerEnvironment {
        /// Directory holding the files.
        dir: PathBuf,
        /// File name before the environment suffix.
        stem: String,
        /// File extension without the dot.
        extension: String,
    },
}

impl FileLocation {
    /// Returns true if the path depends on the environment.
    #[must_use]
    pub const fn is_environment_specific(&self) -> bool {
        matches!(self, Self::PerEnvironment { .. })
    }

    /// Resolves the file path for an environment.
    #[must_use]
    pub fn path_for(&self, environment: &str) -> PathBuf {
        match self {
            Self::Fixed(path) => path.clone(),
            Self::PerEnvironment {
                dir,
                stem,
                extension,
            } => dir.join(format!("{stem}-{environment}.{extension}")),
        }
    }

    /// Display name of the file, without the directory.
    #[must_use]
    pub fn file_name(&self) -> String {
        match self {
            Self::Fixed(path) => path
                .file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned()),
            Self::PerEnvironment {
                stem, extension, ..
            } => format!("{stem}-{{env}}.{extension}"),
        }
    }
}

pub(super) fn read_file(path: &Path) -> Result<String, SourceError> {
    fs::read_to_string(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            SourceError::NotFound(path.to_path_buf())
        } else {
            SourceError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}
