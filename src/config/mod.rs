use std::path::{Path, PathBuf};
use std::str::FromStr;

use config::{Config, ConfigError, FileFormat};
use log::LevelFilter;
use once_cell::sync::Lazy;
use serde::Deserialize;

#[cfg(test)]
mod tests;

/// where the config file is looked for when none is passed
pub static CONFIG_FILE: &str = "./CodeWallet.toml";

/// config properties for the durable store file
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct StoreConfig {
    /// the directory holding the store. Defaults to `.code-wallet` in the user's home directory
    pub location: PathBuf,
    /// the file name of the store, without extension
    pub name: String,
}

impl StoreConfig {
    /// the directory the browser-style storage keeps its files in
    pub fn browser_dir(&self) -> PathBuf {
        self.location.join("browser")
    }
}

/// which storage backend the gateway is built on
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendChoice {
    /// use the durable store if it can be opened, browser storage otherwise
    Auto,
    Packaged,
    Browser,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct StorageConfig {
    pub backend: BackendChoice,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
}

impl LoggingConfig {
    /// the configured level, or `Info` if it isn't a level name
    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(&self.level).unwrap_or_else(|_| {
            log::warn!("Unknown log level {}, using info", self.level);
            LevelFilter::Info
        })
    }
}

/// config properties for the whole of this application
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct WalletConfig {
    pub store: StoreConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Parses the config file at `path`, if it exists. Anything the file leaves out keeps its default value
pub fn parse_config(path: &str) -> Result<WalletConfig, ConfigError> {
    if !Path::new(path).exists() {
        log::warn!("No config file found at {path}. Continuing with defaults...");
    }
    let defaults = WALLET_CONFIG_DEFAULT.clone();
    Config::builder()
        .set_default(
            "store.location",
            defaults.store.location.to_string_lossy().into_owned(),
        )?
        .set_default("store.name", defaults.store.name)?
        .set_default("storage.backend", "auto")?
        .set_default("logging.level", defaults.logging.level)?
        .add_source(config::File::new(path, FileFormat::Toml).required(false))
        .build()?
        .try_deserialize()
}

/// parses [`CONFIG_FILE`], falling back to the defaults if it can't be parsed
pub fn load_config() -> WalletConfig {
    match parse_config(CONFIG_FILE) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to parse config file, using defaults. Exception is {e}");
            WALLET_CONFIG_DEFAULT.clone()
        }
    }
}

fn default_store_location() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".code-wallet")
}

pub static WALLET_CONFIG_DEFAULT: Lazy<WalletConfig> = Lazy::new(|| WalletConfig {
    store: StoreConfig {
        location: default_store_location(),
        name: "code-wallet-data".to_string(),
    },
    storage: StorageConfig {
        backend: BackendChoice::Auto,
    },
    logging: LoggingConfig {
        level: "info".to_string(),
    },
});
