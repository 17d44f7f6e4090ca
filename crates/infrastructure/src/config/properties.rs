//! Java-style `.properties` files.

use std::path::{Path, PathBuf};

use restprobe_application::ports::ConfigSource;
use restprobe_domain::ConfigLayer;
use tracing::{debug, warn};

use super::SourceError;
use super::location::{DEFAULT_CONFIG_DIR, FileLocation, read_file};

/// Loads a layer from a `key=value` properties file.
///
/// ```ignore
/// let sources: Vec<Arc<dyn ConfigSource>> = vec![
///     Arc::new(PropertiesFileSource::base("config")),
///     Arc::new(PropertiesFileSource::per_environment("config")),
/// ];
/// ```
#[derive(Debug, Clone)]
pub struct PropertiesFileSource {
    location: FileLocation,
}

impl PropertiesFileSource {
    /// `{dir}/config.properties`, loaded for every environment.
    #[must_use]
    pub fn base(dir: impl AsRef<Path>) -> Self {
        Self::at(dir.as_ref().join("config.properties"))
    }

    /// `{dir}/config-{env}.properties` for the selected environment.
    #[must_use]
    pub fn per_environment(dir: impl AsRef<Path>) -> Self {
        Self {
            location: FileLocation::PerEnvironment {
                dir: dir.as_ref().to_path_buf(),
                stem: "config".to_string(),
                extension: "properties".to_string(),
            },
        }
    }

    /// A specific file, loaded for every environment.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            location: FileLocation::Fixed(path.into()),
        }
    }

    /// Base and per-environment sources under the default directory.
    #[must_use]
    pub fn defaults() -> [Self; 2] {
        [
            Self::base(DEFAULT_CONFIG_DIR),
            Self::per_environment(DEFAULT_CONFIG_DIR),
        ]
    }

    fn read(path: &Path) -> Result<ConfigLayer, SourceError> {
        let content = read_file(path)?;
        let properties =
            java_properties::read(content.as_bytes()).map_err(|e| SourceError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Ok(ConfigLayer::from_pairs(name, properties))
    }
}

impl ConfigSource for PropertiesFileSource {
    fn name(&self) -> String {
        self.location.file_name()
    }

    fn is_environment_specific(&self) -> bool {
        self.location.is_environment_specific()
    }

    fn load(&self, environment: &str) -> Option<ConfigLayer> {
        let path = self.location.path_for(environment);
        match Self::read(&path) {
            Ok(layer) => {
                debug!(path = %path.display(), keys = layer.len(), "Loaded properties");
                Some(layer)
            }
            Err(SourceError::NotFound(_)) => {
                debug!(path = %path.display(), "Properties file not found");
                None
            }
            Err(e) => {
                warn!(error = %e, "Could not load properties");
                None
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    #[test]
    fn test_base_file() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "config.properties",
            "# comment\nbase.url=https://jsonplaceholder.typicode.com\ntimeout = 5000\napi.key:abc\n",
        );

        let source = PropertiesFileSource::base(dir.path());
        assert!(!source.is_environment_specific());
        let layer = source.load("qa").unwrap();

        assert_eq!(layer.name(), "config.properties");
        assert_eq!(layer.get("base.url"), Some("https://jsonplaceholder.typicode.com"));
        assert_eq!(layer.get("timeout"), Some("5000"));
        assert_eq!(layer.get("api.key"), Some("abc"));
        assert_eq!(layer.len(), 3);
    }

    #[test]
    fn test_per_environment_file() {
        let dir = TempDir::new().unwrap();
        write(&dir, "config-qa.properties", "base.url=http://qa\n");
        write(&dir, "config-prod.properties", "base.url=http://prod\n");

        let source = PropertiesFileSource::per_environment(dir.path());
        assert!(source.is_environment_specific());
        assert_eq!(source.name(), "config-{env}.properties");
        assert_eq!(source.load("prod").unwrap().get("base.url"), Some("http://prod"));
        assert_eq!(source.load("qa").unwrap().name(), "config-qa.properties");
        assert!(source.load("dev").is_none());
    }

    #[test]
    fn test_missing_file_is_absent() {
        let dir = TempDir::new().unwrap();
        assert!(PropertiesFileSource::base(dir.path()).load("qa").is_none());
    }

    #[test]
    fn test_unicode_escape() {
        let dir = TempDir::new().unwrap();
        write(&dir, "app.properties", "greeting=caf\\u00e9\nmulti=a \\\n  b\n");

        let layer = PropertiesFileSource::at(dir.path().join("app.properties"))
            .load("qa")
            .unwrap();
        assert_eq!(layer.get("greeting"), Some("café"));
        assert_eq!(layer.get("multi"), Some("a b"));
    }
}
