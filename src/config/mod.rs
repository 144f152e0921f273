use anyhow::{Context, Result, anyhow};
use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::dataproc::controller::DEFAULT_ENDPOINT;

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const MAX_TIMEOUT_SECONDS: u64 = 600;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    // Defaults for connection options not given on the command line
    pub project_id: Option<String>,
    pub region: Option<String>,
    pub verbosity: Option<u8>,
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub endpoint: String,
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl Config {
    /// Get the configuration file path
    pub fn config_file_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "dataproc-url", "dataproc-url")
            .context("Unable to determine project directories")?;

        let config_dir = proj_dirs.config_dir();
        fs::create_dir_all(config_dir).context("Failed to create config directory")?;

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load configuration from `path`, falling back to defaults when it is missing or unreadable as TOML
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;

        match toml::from_str::<Config>(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                warn!("Failed to parse config file {}: {}", path.display(), e);
                eprintln!("⚠️  Warning: Failed to parse config file ({}). Using defaults.", e);
                Ok(Self::default())
            }
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::config_file_path()?;
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Set a configuration value using dot notation
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "project_id" => {
                self.project_id = non_empty(value);
            }
            "region" => {
                self.region = non_empty(value);
            }
            "verbosity" => {
                let level = value
                    .parse::<u8>()
                    .map_err(|_| anyhow!("Invalid verbosity: '{}'. Must be an integer from 0 to 4", value))?;
                if level > 4 {
                    return Err(anyhow!("Verbosity too large: {} (maximum: 4)", level));
                }
                self.verbosity = Some(level);
            }
            "api.endpoint" => {
                self.api.endpoint = if value.is_empty() || value == "reset" {
                    DEFAULT_ENDPOINT.to_string()
                } else {
                    if !value.starts_with("http://") && !value.starts_with("https://") {
                        return Err(anyhow!("Invalid API endpoint: '{}'. Must be a valid HTTP/HTTPS URL", value));
                    }
                    value.trim_end_matches('/').to_string()
                };
            }
            "api.timeout_seconds" => {
                let timeout = value
                    .parse::<u64>()
                    .map_err(|_| anyhow!("Invalid API timeout: '{}'. Must be a positive integer (seconds)", value))?;

                if timeout == 0 {
                    return Err(anyhow!("API timeout must be at least 1 second (got: {})", timeout));
                }
                if timeout > MAX_TIMEOUT_SECONDS {
                    return Err(anyhow!(
                        "API timeout too large: {}s (maximum: {}s)",
                        timeout,
                        MAX_TIMEOUT_SECONDS
                    ));
                }

                self.api.timeout_seconds = timeout;
            }
            _ => {
                return Err(anyhow!(
                    "Unknown configuration key: '{}'. Available keys: {}",
                    key,
                    Self::all_keys().join(", ")
                ));
            }
        }

        Ok(())
    }

    pub fn all_keys() -> &'static [&'static str] {
        &[
            "project_id",
            "region",
            "verbosity",
            "api.endpoint",
            "api.timeout_seconds",
        ]
    }

    /// Get a configuration value using dot notation
    pub fn get_value(&self, key: &str) -> Result<String> {
        match key {
            "project_id" => Ok(self.project_id.clone().unwrap_or_else(|| "<not-set>".to_string())),
            "region" => Ok(self.region.clone().unwrap_or_else(|| "<not-set>".to_string())),
            "verbosity" => Ok(self.verbosity.unwrap_or(0).to_string()),
            "api.endpoint" => Ok(self.api.endpoint.clone()),
            "api.timeout_seconds" => Ok(self.api.timeout_seconds.to_string()),
            _ => Err(anyhow!("Configuration key not found: {}", key)),
        }
    }

    /// Render the keys starting with `prefix` (all keys when empty) as a table
    pub fn display(&self, prefix: &str) -> Result<String> {
        let keys: Vec<&str> = Self::all_keys()
            .iter()
            .copied()
            .filter(|k| prefix.is_empty() || *k == prefix || k.starts_with(&format!("{}.", prefix)))
            .collect();

        if keys.is_empty() {
            return Err(anyhow!("Configuration key not found: {}", prefix));
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Setting", "Value"]);
        for key in keys {
            table.add_row(vec![Cell::new(key), Cell::new(self.get_value(key)?)]);
        }

        Ok(table.to_string())
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() || value == "reset" {
        None
    } else {
        Some(value.to_string())
    }
}
