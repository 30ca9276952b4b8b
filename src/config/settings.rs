//! Application settings loading from config.toml
//!
//! Every field has a default, so a partial file (or no file at all) is valid.
//! The defaults mirror a fresh trip: one member with weight 1 and the Singapore
//! dollar as the only currency.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "SPLITZY_CONFIG";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Database connection settings
    pub database: DatabaseConfig,
    /// Values used when a trip is created without members or currencies
    pub defaults: TripDefaults,
    /// Presentation settings
    pub display: DisplayConfig,
}

/// `[database]` section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL; `DATABASE_URL` takes precedence when set
    pub url: Option<String>,
}

/// `[defaults]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TripDefaults {
    /// Weight given to members added without one
    pub member_weight: f64,
    /// Name of the currency seeded into trips created without any
    pub currency_name: String,
    /// Abbreviation of the seeded currency
    pub currency_abbreviation: String,
}

impl Default for TripDefaults {
    fn default() -> Self {
        Self {
            member_weight: 1.0,
            currency_name: "Singapore Dollar".to_string(),
            currency_abbreviation: "SGD".to_string(),
        }
    }
}

/// `[display]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Decimal places shown for amounts
    pub decimals: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { decimals: 2 }
    }
}

/// Parses and validates a TOML configuration string.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    let weight = config.defaults.member_weight;
    if !weight.is_finite() || weight < 0.0 {
        return Err(Error::Config {
            message: format!("defaults.member_weight must be a non-negative number, got {weight}"),
        });
    }
    if config.defaults.currency_abbreviation.trim().is_empty() {
        return Err(Error::Config {
            message: "defaults.currency_abbreviation cannot be empty".to_string(),
        });
    }

    Ok(config)
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A default value is out of range
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    parse_config(&contents)
}

/// Loads configuration from `SPLITZY_CONFIG` or `./config.toml`.
///
/// A missing file is not an error; the built-in defaults are used instead.
pub fn load_default_config() -> Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config.toml".to_string());
    if Path::new(&path).exists() {
        load_config(&path)
    } else {
        info!("No config file at {path}, using defaults");
        Ok(AppConfig::default())
    }
}
