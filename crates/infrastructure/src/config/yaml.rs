//! YAML files flattened into dotted keys.

use std::path::{Path, PathBuf};

use restprobe_application::ports::ConfigSource;
use restprobe_domain::ConfigLayer;
use serde_yaml::Value;
use tracing::{debug, warn};

use super::SourceError;
use super::location::{FileLocation, read_file};

/// Loads a layer from a YAML document.
///
/// Nested mappings become dotted keys and sequence items get an index
/// suffix, so
///
/// ```yaml
/// base:
///   url: http://localhost
/// hosts: [a, b]
/// ```
///
/// yields `base.url`, `hosts[0]` and `hosts[1]`. Null values become empty
/// strings.
#[derive(Debug, Clone)]
pub struct YamlFileSource {
    location: FileLocation,
}

impl YamlFileSource {
    /// `{dir}/config.yaml`, loaded for every environment.
    #[must_use]
    pub fn base(dir: impl AsRef<Path>) -> Self {
        Self::at(dir.as_ref().join("config.yaml"))
    }

    /// `{dir}/config-{env}.yaml` for the selected environment.
    #[must_use]
    pub fn per_environment(dir: impl AsRef<Path>) -> Self {
        Self {
            location: FileLocation::PerEnvironment {
                dir: dir.as_ref().to_path_buf(),
                stem: "config".to_string(),
                extension: "yaml".to_string(),
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

    fn read(path: &Path) -> Result<ConfigLayer, SourceError> {
        let content = read_file(path)?;
        let parse_error = |message: String| SourceError::Parse {
            path: path.to_path_buf(),
            message,
        };

        let document: Value =
            serde_yaml::from_str(&content).map_err(|e| parse_error(e.to_string()))?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

        let mut layer = ConfigLayer::new(name);
        match document {
            Value::Null => {}
            Value::Mapping(_) => flatten(&mut layer, None, &document),
            _ => return Err(parse_error("top level must be a mapping".to_string())),
        }
        Ok(layer)
    }
}

fn flatten(layer: &mut ConfigLayer, prefix: Option<&str>, value: &Value) {
    match value {
        Value::Mapping(mapping) => {
            for (key, child) in mapping {
                let Some(key) = scalar(key) else {
                    warn!(?key, "Skipping non-scalar YAML key");
                    continue;
                };
                let full = prefix.map_or_else(|| key.clone(), |p| format!("{p}.{key}"));
                flatten(layer, Some(&full), child);
            }
        }
        Value::Sequence(items) => {
            let prefix = prefix.unwrap_or_default();
            for (index, item) in items.iter().enumerate() {
                flatten(layer, Some(&format!("{prefix}[{index}]")), item);
            }
        }
        Value::Tagged(tagged) => flatten(layer, prefix, &tagged.value),
        scalar_value => {
            if let (Some(key), Some(text)) = (prefix, scalar(scalar_value)) {
                layer.insert(key, text);
            }
        }
    }
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Tagged(tagged) => scalar(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

impl ConfigSource for YamlFileSource {
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
                debug!(path = %path.display(), keys = layer.len(), "Loaded YAML configuration");
                Some(layer)
            }
            Err(SourceError::NotFound(_)) => {
                debug!(path = %path.display(), "YAML file not found");
                None
            }
            Err(e) => {
                warn!(error = %e, "Could not load YAML configuration");
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

    #[test]
    fn test_flattens_nested_document() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("config.yaml"),
            "base:\n  url: http://localhost:8080\ntimeout: 5000\nlogging:\n  enabled: false\nhosts:\n  - a\n  - b\napi:\n  key: ~\n",
        )
        .unwrap();

        let layer = YamlFileSource::base(dir.path()).load("qa").unwrap();

        assert_eq!(layer.name(), "config.yaml");
        assert_eq!(layer.get("base.url"), Some("http://localhost:8080"));
        assert_eq!(layer.get("timeout"), Some("5000"));
        assert_eq!(layer.get("logging.enabled"), Some("false"));
        assert_eq!(layer.get("hosts[1]"), Some("b"));
        assert_eq!(layer.get("api.key"), Some(""));
    }

    #[test]
    fn test_per_environment() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config-staging.yaml"), "env: staging\n").unwrap();

        let source = YamlFileSource::per_environment(dir.path());
        assert!(source.is_environment_specific());
        assert_eq!(source.load("staging").unwrap().get("env"), Some("staging"));
        assert!(source.load("qa").is_none());
    }

    #[test]
    #[tracing_test::traced_test]
    fn test_invalid_documents_are_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("list.yaml"), "- a\n- b\n").unwrap();
        fs::write(dir.path().join("broken.yaml"), "base: [unclosed\n").unwrap();

        assert!(YamlFileSource::at(dir.path().join("list.yaml")).load("qa").is_none());
        assert!(YamlFileSource::at(dir.path().join("broken.yaml")).load("qa").is_none());
        assert!(logs_contain("Could not load YAML configuration"));
    }

    #[test]
    fn test_empty_document() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("empty.yaml"), "").unwrap();

        let layer = YamlFileSource::at(dir.path().join("empty.yaml")).load("qa").unwrap();
        assert!(layer.is_empty());
    }
}
