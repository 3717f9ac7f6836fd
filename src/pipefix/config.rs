//! Preprocessor configuration
//!
//!     Everything the preprocessor needs to know about the host engine's syntax: the
//!     placeholder delimiters, the namespace variables live under, and the selector for the
//!     root context. Defaults match Go-style templates:
//!
//! ```yaml
//! open_delimiter: "{{"
//! close_delimiter: "}}"
//! namespace: Vars
//! root_selector: "$."
//! ```
//!
//!     Files may be YAML or JSON, picked by extension; missing keys keep their defaults.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessorConfig {
    pub open_delimiter: String,
    pub close_delimiter: String,
    /// Map on the root context holding template variables
    pub namespace: String,
    /// Prefix that selects the root context, prepended to `namespace`
    pub root_selector: String,
}

impl Default for PreprocessorConfig {
    fn default() -> Self {
        PreprocessorConfig {
            open_delimiter: "{{".to_string(),
            close_delimiter: "}}".to_string(),
            namespace: "Vars".to_string(),
            root_selector: "$.".to_string(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    Json(serde_json::Error),
    Invalid { field: &'static str, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "could not read config: {}", err),
            ConfigError::Yaml(err) => write!(f, "invalid YAML config: {}", err),
            ConfigError::Json(err) => write!(f, "invalid JSON config: {}", err),
            ConfigError::Invalid { field, message } => {
                write!(f, "invalid config field '{}': {}", field, message)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Yaml(err) => Some(err),
            ConfigError::Json(err) => Some(err),
            ConfigError::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Yaml(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Json(err)
    }
}

impl PreprocessorConfig {
    /// Load a config file. `.json` files are read as JSON, anything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let config = if is_json {
            Self::from_json(&text)?
        } else {
            Self::from_yaml(&text)?
        };
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: PreprocessorConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: PreprocessorConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.open_delimiter.is_empty() {
            return Err(ConfigError::Invalid {
                field: "open_delimiter",
                message: "must not be empty".to_string(),
            });
        }
        if self.close_delimiter.is_empty() {
            return Err(ConfigError::Invalid {
                field: "close_delimiter",
                message: "must not be empty".to_string(),
            });
        }
        let namespace_ok = !self.namespace.is_empty()
            && self
                .namespace
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_');
        if !namespace_ok {
            return Err(ConfigError::Invalid {
                field: "namespace",
                message: format!("'{}' is not an identifier", self.namespace),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PreprocessorConfig::default();
        assert_eq!(config.open_delimiter, "{{");
        assert_eq!(config.close_delimiter, "}}");
        assert_eq!(config.namespace, "Vars");
        assert_eq!(config.root_selector, "$.");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = PreprocessorConfig::from_yaml("open_delimiter: \"[[\"\nclose_delimiter: \"]]\"\n")
            .unwrap();
        assert_eq!(config.open_delimiter, "[[");
        assert_eq!(config.close_delimiter, "]]");
        assert_eq!(config.namespace, "Vars");
    }

    #[test]
    fn test_json() {
        let config = PreprocessorConfig::from_json(r#"{"namespace": "Data", "root_selector": "."}"#)
            .unwrap();
        assert_eq!(config.namespace, "Data");
        assert_eq!(config.root_selector, ".");
        assert_eq!(config.open_delimiter, "{{");
    }

    #[test]
    fn test_invalid_namespace() {
        let err = PreprocessorConfig::from_yaml("namespace: \"a.b\"\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "namespace",
                ..
            }
        ));
    }

    #[test]
    fn test_empty_delimiter() {
        let err = PreprocessorConfig::from_json(r#"{"close_delimiter": ""}"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid config field 'close_delimiter': must not be empty"
        );
    }

    #[test]
    fn test_malformed_yaml() {
        let err = PreprocessorConfig::from_yaml("namespace: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = PreprocessorConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
