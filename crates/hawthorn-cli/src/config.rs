//! CLI configuration stored as TOML

use std::path::PathBuf;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "HAWTHORN_CONFIG";

/// Default config file: `<config dir>/hawthorn/config.toml`
pub fn config_file_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hawthorn")
        .join("config.toml")
}

/// Configuration for the CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Graph file used when `--graph` is not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_graph: Option<PathBuf>,
    /// Weight for seed edges that do not set one
    pub default_weight: f64,
    /// Output format when `--format` is not given
    pub format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_graph: None,
            default_weight: 1.0,
            format: "table".to_string(),
        }
    }
}

impl Config {
    /// Load the config file, falling back to defaults if it is missing or
    /// unreadable
    pub fn load() -> Self {
        let path = config_file_path();
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config file {}: {:#}", path.display(), e);
                Self::default()
            }
        }
    }

    fn load_from(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_file_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::debug!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn keys() -> &'static [&'static str] {
        &["default_graph", "default_weight", "format"]
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "default_graph" => Some(
                self.default_graph
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string()),
            ),
            "default_weight" => Some(self.default_weight.to_string()),
            "format" => Some(self.format.clone()),
            _ => None,
        }
    }

    /// Set a value by key. An empty `default_graph` clears it.
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "default_graph" => {
                self.default_graph = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            "default_weight" => {
                let weight: f64 = value
                    .parse()
                    .with_context(|| format!("Invalid weight: {}", value))?;
                if !weight.is_finite() {
                    anyhow::bail!("Weight must be finite: {}", value);
                }
                self.default_weight = weight;
            }
            "format" => match value {
                "table" | "json" => self.format = value.to_string(),
                _ => anyhow::bail!("Unknown format: {} (expected table or json)", value),
            },
            _ => anyhow::bail!(
                "Unknown config key: {}. Available keys: {}",
                key,
                Self::keys().join(", ")
            ),
        }
        Ok(())
    }
}
