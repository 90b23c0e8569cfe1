//! Configuration for evaluation runs.
//!
//! Supports both environment variables and YAML config file.
//! Environment variables take precedence over config file values.

use crate::error::{EvalError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Scoring configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Top-level fields removed from both records before scoring
    /// (e.g. image paths and raw transcripts)
    #[serde(default = "default_excluded_fields")]
    pub excluded_fields: Vec<String>,

    /// Rebuild both records into the invoice schema before scoring
    #[serde(default = "default_standardise")]
    pub standardise: bool,
}

fn default_excluded_fields() -> Vec<String> {
    vec!["Img_path".to_string(), "Doc Transcript".to_string()]
}

fn default_standardise() -> bool {
    true
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            excluded_fields: default_excluded_fields(),
            standardise: default_standardise(),
        }
    }
}

/// Full application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Scoring settings
    pub scoring: ScoringConfig,
}

/// Configuration file structure (YAML format).
#[derive(Debug, Deserialize)]
struct ConfigFile {
    scoring: Option<ScoringFileSection>,
}

#[derive(Debug, Deserialize)]
struct ScoringFileSection {
    excluded_fields: Option<Vec<String>>,
    standardise: Option<bool>,
}

impl Config {
    /// Load configuration from environment variables and optional config file.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (EVAL_EXCLUDED_FIELDS, EVAL_STANDARDISE)
    /// 2. Config file (~/.config/invoice-eval/config.yaml)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        let mut config = Config::default();

        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                config = Self::load_from_file(&config_path)?;
            }
        }

        config.apply_env(|name| env::var(name).ok())?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| EvalError::io(path, e))?;

        let file_config: ConfigFile = serde_yaml::from_str(&content)
            .map_err(|e| EvalError::Config(format!("Failed to parse config file: {}", e)))?;

        let mut config = Config::default();

        if let Some(scoring) = file_config.scoring {
            if let Some(excluded_fields) = scoring.excluded_fields {
                config.scoring.excluded_fields = excluded_fields;
            }
            if let Some(standardise) = scoring.standardise {
                config.scoring.standardise = standardise;
            }
        }

        Ok(config)
    }

    /// Override values from environment variables read through `var`.
    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(fields) = var("EVAL_EXCLUDED_FIELDS") {
            self.scoring.excluded_fields = fields
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(standardise) = var("EVAL_STANDARDISE") {
            self.scoring.standardise = parse_bool(&standardise).ok_or_else(|| {
                EvalError::Config(format!(
                    "EVAL_STANDARDISE must be true or false, got '{}'",
                    standardise
                ))
            })?;
        }

        Ok(())
    }

    /// Get the default config file path.
    pub fn config_file_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "invoice-eval")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self
            .scoring
            .excluded_fields
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(EvalError::InvalidConfig(
                "Excluded field names must not be empty.".to_string(),
            ));
        }

        Ok(())
    }

    /// Create a config with explicit excluded fields (useful for testing).
    pub fn with_excluded_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scoring: ScoringConfig {
                excluded_fields: fields.into_iter().map(Into::into).collect(),
                ..Default::default()
            },
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.scoring.excluded_fields, vec!["Img_path", "Doc Transcript"]);
        assert!(config.scoring.standardise);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_fails_with_empty_field_name() {
        let config = Config::with_excluded_fields(["Img_path", " "]);
        assert!(matches!(config.validate(), Err(EvalError::InvalidConfig(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "scoring:\n  excluded_fields: [Notes]\n  standardise: false").unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.scoring.excluded_fields, vec!["Notes"]);
        assert!(!config.scoring.standardise);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "scoring:\n  standardise: false").unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.scoring.excluded_fields, default_excluded_fields());
        assert!(!config.scoring.standardise);
    }

    #[test]
    fn test_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "scoring: 42").unwrap();
        assert!(matches!(
            Config::load_from_file(file.path()),
            Err(EvalError::Config(_))
        ));

        let missing = Config::load_from_file(Path::new("/nonexistent/config.yaml"));
        assert!(matches!(missing, Err(EvalError::Io { .. })));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("EVAL_EXCLUDED_FIELDS", "Img_path, Notes ,"),
            ("EVAL_STANDARDISE", "no"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_env(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.scoring.excluded_fields, vec!["Img_path", "Notes"]);
        assert!(!config.scoring.standardise);

        let result = config.apply_env(|name| (name == "EVAL_STANDARDISE").then(|| "maybe".into()));
        assert!(result.is_err());
    }
}
