use crate::core::errors::{WalletError, WalletResult};
use crate::core::mnemonic::MnemonicStrength;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_DATA_DIR: &str = "SOL_WALLET_DATA_DIR";
pub const ENV_WORDS: &str = "SOL_WALLET_WORDS";
pub const ENV_LOG: &str = "SOL_WALLET_LOG";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Directory holding the persisted mnemonic and wallet list
    #[serde(default = "AppConfig::default_data_dir")]
    pub data_dir: PathBuf,

    /// Length of newly generated mnemonics
    #[serde(default)]
    pub mnemonic_words: MnemonicStrength,

    /// tracing filter used when RUST_LOG is unset
    #[serde(default = "AppConfig::default_log_level")]
    pub log_level: String,
}

impl AppConfig {
    fn default_data_dir() -> PathBuf {
        PathBuf::from("./.sol-wallet")
    }

    fn default_log_level() -> String {
        "info".to_string()
    }

    /// Parse a TOML config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> WalletResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            WalletError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> WalletResult<Self> {
        toml::from_str(raw).map_err(|e| WalletError::ConfigError(e.to_string()))
    }

    /// Overlay SOL_WALLET_* environment variables.
    pub fn apply_env_overrides(mut self) -> WalletResult<Self> {
        if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
            if dir.trim().is_empty() {
                return Err(WalletError::ConfigError(format!("{} is empty", ENV_DATA_DIR)));
            }
            self.data_dir = PathBuf::from(dir);
        }
        if let Ok(words) = std::env::var(ENV_WORDS) {
            let count: usize = words.trim().parse().map_err(|_| {
                WalletError::ConfigError(format!("{} must be a number, got '{}'", ENV_WORDS, words))
            })?;
            self.mnemonic_words = MnemonicStrength::try_from(count)?;
        }
        if let Ok(level) = std::env::var(ENV_LOG) {
            self.log_level = level;
        }
        Ok(self)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: Self::default_data_dir(),
            mnemonic_words: MnemonicStrength::default(),
            log_level: Self::default_log_level(),
        }
    }
}
