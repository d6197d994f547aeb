//! TOML-based application configuration.
//!
//! Stores user preferences for the CLI:
//! - Where the plan catalog lives
//! - Default company, vertical and horizon for goal calculations
//! - Output format
//!
//! Configuration is stored at `~/.config/repflow/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, Result};

/// Defaults applied to goal calculations when a flag is omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalDefaults {
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub vertical_id: Option<String>,
    #[serde(default)]
    pub horizon_months: Option<f64>,
}

/// Output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Print results as JSON instead of text
    #[serde(default)]
    pub json: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/repflow/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Plan catalog path; `catalog.toml` in the data directory when unset
    #[serde(default)]
    pub catalog_path: Option<String>,
    #[serde(default)]
    pub goal: GoalDefaults,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => parse_number(value)
                        .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?,
                    // Unset optional: infer the type from the text
                    serde_json::Value::Null => match value.parse::<bool>() {
                        Ok(b) => serde_json::Value::Bool(b),
                        Err(_) => parse_number(value)
                            .unwrap_or_else(|| serde_json::Value::String(value.into())),
                    },
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    serde_json::Value::String(_) => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Parse a configuration document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid configuration TOML.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Self::from_toml_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.clone(),
                message: e.to_string(),
            })?),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.set_value(key, value)?;
        self.save()
    }

    /// Resolved catalog path.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn catalog_path(&self) -> Result<PathBuf> {
        match &self.catalog_path {
            Some(path) => Ok(Path::new(path).to_path_buf()),
            None => Ok(data_dir()?.join("catalog.toml")),
        }
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

fn parse_number(value: &str) -> Option<serde_json::Value> {
    if let Ok(n) = value.parse::<u64>() {
        Some(serde_json::Value::Number(n.into()))
    } else {
        value
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(serde_json::Value::Number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let mut cfg = Config::default();
        cfg.goal.horizon_months = Some(6.0);
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed = Config::from_toml_str(&toml_str).unwrap();
        assert_eq!(parsed.goal.horizon_months, Some(6.0));
        assert!(!parsed.output.json);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("output.json").as_deref(), Some("false"));
        assert_eq!(cfg.get("goal.company_id").as_deref(), Some("null"));
        assert!(cfg.get("output.missing_key").is_none());
    }

    #[test]
    fn set_value_updates_nested_bool() {
        let mut cfg = Config::default();
        cfg.set_value("output.json", "true").unwrap();
        assert!(cfg.output.json);
    }

    #[test]
    fn set_value_fills_unset_optionals() {
        let mut cfg = Config::default();
        cfg.set_value("goal.company_id", "acme").unwrap();
        cfg.set_value("goal.horizon_months", "9").unwrap();
        cfg.set_value("catalog_path", "/tmp/catalog.toml").unwrap();
        assert_eq!(cfg.goal.company_id.as_deref(), Some("acme"));
        assert_eq!(cfg.goal.horizon_months, Some(9.0));
        assert_eq!(cfg.catalog_path().unwrap(), PathBuf::from("/tmp/catalog.toml"));
    }

    #[test]
    fn set_value_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set_value("output.colour", "true"),
            Err(crate::error::CoreError::Config(ConfigError::UnknownKey(_)))
        ));
        assert!(cfg.set_value("", "x").is_err());
    }

    #[test]
    fn set_value_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set_value("output.json", "not_a_bool").is_err());
        assert!(!cfg.output.json);
    }

    #[test]
    fn set_value_rejects_wrong_type_for_optional() {
        let mut cfg = Config::default();
        // A bool cannot become a company id
        assert!(cfg.set_value("goal.company_id", "true").is_err());
    }
}
