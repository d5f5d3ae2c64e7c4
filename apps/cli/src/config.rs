//! # Configuration
//!
//! Application configuration read once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`KIRANA_*`)
//! 2. Defaults (this file)
//!
//! | Variable                 | Default                          |
//! |--------------------------|----------------------------------|
//! | `KIRANA_DB_PATH`         | `<platform data dir>/kirana.db`  |
//! | `KIRANA_STORE_NAME`      | `Kirana Store`                   |
//! | `KIRANA_CURRENCY_SYMBOL` | `₹`                              |
//! | `KIRANA_OVERSELL`        | `clamp`                          |

use std::path::PathBuf;

use directories::ProjectDirs;
use kirana_core::money::DEFAULT_CURRENCY_SYMBOL;
use kirana_core::OversellPolicy;
use thiserror::Error;

pub const ENV_DB_PATH: &str = "KIRANA_DB_PATH";
pub const ENV_STORE_NAME: &str = "KIRANA_STORE_NAME";
pub const ENV_CURRENCY_SYMBOL: &str = "KIRANA_CURRENCY_SYMBOL";
pub const ENV_OVERSELL: &str = "KIRANA_OVERSELL";

pub const DEFAULT_STORE_NAME: &str = "Kirana Store";
const DB_FILE_NAME: &str = "kirana.db";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// An environment variable is set to something unusable.
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    /// No data directory could be found for the default database path.
    #[error("Could not determine app data directory; set {ENV_DB_PATH}")]
    NoDataDir,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_path: PathBuf,

    /// Printed at the top of every bill.
    pub store_name: String,

    pub currency_symbol: String,

    pub oversell: OversellPolicy,
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value of
    /// a variable if it is set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = match lookup(ENV_DB_PATH) {
            Some(path) if path.trim().is_empty() => {
                return Err(ConfigError::InvalidValue(ENV_DB_PATH.to_string()))
            }
            Some(path) => PathBuf::from(path),
            None => default_database_path()?,
        };

        let store_name = lookup(ENV_STORE_NAME)
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_STORE_NAME.to_string());

        let currency_symbol = match lookup(ENV_CURRENCY_SYMBOL) {
            Some(symbol) if symbol.trim().is_empty() => {
                return Err(ConfigError::InvalidValue(ENV_CURRENCY_SYMBOL.to_string()))
            }
            Some(symbol) => symbol.trim().to_string(),
            None => DEFAULT_CURRENCY_SYMBOL.to_string(),
        };

        let oversell = match lookup(ENV_OVERSELL) {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidValue(ENV_OVERSELL.to_string()))?,
            None => OversellPolicy::default(),
        };

        Ok(AppConfig {
            database_path,
            store_name,
            currency_symbol,
            oversell,
        })
    }
}

/// Platform data directory path for the database.
///
/// - **macOS**: `~/Library/Application Support/in.kirana.counter/kirana.db`
/// - **Windows**: `%APPDATA%\kirana\counter\data\kirana.db`
/// - **Linux**: `~/.local/share/counter/kirana.db`
///
/// The directory is created if missing.
fn default_database_path() -> Result<PathBuf, ConfigError> {
    let dirs = ProjectDirs::from("in", "kirana", "counter").ok_or(ConfigError::NoDataDir)?;
    let data_dir = dirs.data_dir();
    std::fs::create_dir_all(data_dir).map_err(|_| ConfigError::NoDataDir)?;

    Ok(data_dir.join(DB_FILE_NAME))
}

// =============================================================================
// Unit Tests
// =============================================================================
