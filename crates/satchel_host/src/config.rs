//! Host configuration
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variables: `SATCHEL_CAPACITY`, `SATCHEL_WEIGHT_CAPACITY`,
//!    `SATCHEL_OBSERVERS`
//! 2. Config file: `--config <path>`, else `satchel.toml`, else
//!    `/etc/satchel/satchel.toml`
//! 3. Built-in defaults
//!
//! # Example Config File
//!
//! ```toml
//! observers = 2
//! catalog = "items.toml"
//! log_filter = "debug"
//!
//! [inventory]
//! capacity = 20
//! weight_capacity = 100.0
//! ```

use std::path::{Path, PathBuf};

use satchel_inventory::InventoryConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

const DEFAULT_PATHS: &[&str] = &["satchel.toml", "/etc/satchel/satchel.toml"];

/// Complete host configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SatchelConfig {
    /// Limits of the hosted inventory
    pub inventory: InventoryConfig,
    /// Number of loopback observers to attach
    pub observers: usize,
    /// Item catalog file (built-in demo items when unset)
    pub catalog: Option<PathBuf>,
    /// Log filter used when `RUST_LOG` is unset
    pub log_filter: String,
    /// Config file path (for reloading)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for SatchelConfig {
    fn default() -> Self {
        Self {
            inventory: InventoryConfig::default(),
            observers: 2,
            catalog: None,
            log_filter: "info".to_string(),
            config_path: None,
        }
    }
}

impl SatchelConfig {
    /// Load configuration from all sources
    pub fn load() -> ConfigResult<Self> {
        let explicit = config_arg(std::env::args().skip(1));
        let mut config = match explicit {
            Some(path) => Self::load_from_file(&path)?,
            None => {
                let found = DEFAULT_PATHS.iter().map(Path::new).find(|path| path.exists());
                match found {
                    Some(path) => Self::load_from_file(path)?,
                    None => Self::default(),
                }
            }
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let mut config: Self = toml::from_str(content)?;
        config.inventory = config.inventory.normalized();
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// [`SatchelConfig::load`])
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("SATCHEL_CAPACITY") {
            self.inventory.capacity = parse_value("SATCHEL_CAPACITY", &value)?;
        }
        if let Some(value) = lookup("SATCHEL_WEIGHT_CAPACITY") {
            self.inventory.weight_capacity = parse_value("SATCHEL_WEIGHT_CAPACITY", &value)?;
        }
        if let Some(value) = lookup("SATCHEL_OBSERVERS") {
            self.observers = parse_value("SATCHEL_OBSERVERS", &value)?;
        }
        self.inventory = self.inventory.normalized();
        Ok(())
    }

    /// Builder: set the number of observers
    pub fn with_observers(mut self, observers: usize) -> Self {
        self.observers = observers;
        self
    }

    /// Builder: set inventory limits
    pub fn with_inventory(mut self, inventory: InventoryConfig) -> Self {
        self.inventory = inventory.normalized();
        self
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        log::info!("Satchel Configuration:");
        log::info!(
            "  Inventory: {} slots, {} weight",
            self.inventory.capacity,
            self.inventory.weight_capacity
        );
        log::info!("  Observers: {}", self.observers);
        match &self.catalog {
            Some(path) => log::info!("  Catalog: {}", path.display()),
            None => log::info!("  Catalog: built-in"),
        }
        if let Some(path) = &self.config_path {
            log::info!("  Config: {}", path.display());
        }
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, value: &str) -> ConfigResult<T> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}

/// Find `--config <path>` or `--config=<path>` in the arguments
fn config_arg(mut args: impl Iterator<Item = String>) -> Option<PathBuf> {
    while let Some(arg) = args.next() {
        if let Some(path) = arg.strip_prefix("--config=") {
            return Some(PathBuf::from(path));
        }
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}
