//! Deployment configuration
//!
//! A deployment is described by a single YAML document. Recognized top-level
//! keys: `database`, `monitoring`, `registry`, plus one section per provider
//! keyed by provider name. Provider sections are opaque to the core and are
//! handed verbatim to the matching provider adapter.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

pub const DEFAULT_DATABASE: &str = "cockroachdb";

/// Where the configuration comes from. Resolved once at the command-line
/// boundary; everything past that point works on the parsed [`Config`].
#[derive(Debug, Clone)]
pub enum ConfigInput {
    /// Read and parse a YAML file.
    Path(PathBuf),
    /// Use an already-built configuration tree.
    Value(Value),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitoring: Option<bool>,

    /// Container registry description, required by the scaffold and stress
    /// stages and passed through to their automation units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry: Option<Value>,

    /// Provider sections keyed by provider name.
    #[serde(flatten)]
    pub providers: BTreeMap<String, Value>,
}

impl Config {
    pub fn load(input: &ConfigInput) -> Result<Self> {
        match input {
            ConfigInput::Path(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    Error::ConfigFormat(format!("cannot read {}: {}", path.display(), e))
                })?;
                serde_yaml::from_str(&raw)
                    .map_err(|e| Error::ConfigFormat(format!("{}: {}", path.display(), e)))
            }
            ConfigInput::Value(value) => serde_json::from_value(value.clone())
                .map_err(|e| Error::ConfigFormat(e.to_string())),
        }
    }

    /// Selected database, falling back to the default engine.
    pub fn database(&self) -> String {
        self.database
            .clone()
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string())
    }

    /// Monitoring is deployed unless explicitly disabled.
    pub fn monitoring(&self) -> bool {
        self.monitoring.unwrap_or(true)
    }

    pub fn provider_section(&self, name: &str) -> Result<&Value> {
        self.providers
            .get(name)
            .ok_or_else(|| Error::UnsupportedProvider(name.to_string()))
    }

    pub fn registry(&self) -> Result<&Value> {
        self.registry.as_ref().ok_or_else(|| {
            Error::ConfigFormat("a 'registry' section is required for this stage".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_apply_when_keys_are_absent() {
        let config = Config::load(&ConfigInput::Value(json!({}))).unwrap();
        assert_eq!(config.database(), "cockroachdb");
        assert!(config.monitoring());
        assert!(config.registry().is_err());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = Config::load(&ConfigInput::Value(json!({
            "database": "mariadb",
            "monitoring": false,
        })))
        .unwrap();
        assert_eq!(config.database(), "mariadb");
        assert!(!config.monitoring());
    }

    #[test]
    fn provider_sections_are_captured_by_name() {
        let config = Config::load(&ConfigInput::Value(json!({
            "database": "cockroachdb",
            "static": {"resources": {"database": []}},
        })))
        .unwrap();
        assert!(config.provider_section("static").is_ok());
        assert!(matches!(
            config.provider_section("vagrant"),
            Err(Error::UnsupportedProvider(name)) if name == "vagrant"
        ));
    }

    #[test]
    fn yaml_file_parses_into_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf.yaml");
        std::fs::write(
            &path,
            "database: mariadb\nmonitoring: true\nregistry:\n  type: internal\n",
        )
        .unwrap();

        let config = Config::load(&ConfigInput::Path(path)).unwrap();
        assert_eq!(config.database(), "mariadb");
        assert!(config.registry().is_ok());
    }

    #[test]
    fn malformed_yaml_is_a_config_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf.yaml");
        std::fs::write(&path, ": not yaml: [").unwrap();

        assert!(matches!(
            Config::load(&ConfigInput::Path(path)),
            Err(Error::ConfigFormat(_))
        ));
    }

    #[test]
    fn missing_file_is_a_config_format_error() {
        let input = ConfigInput::Path(PathBuf::from("/nonexistent/conf.yaml"));
        assert!(matches!(Config::load(&input), Err(Error::ConfigFormat(_))));
    }
}
