#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use serde::{Deserialize, Serialize};

pub const DEFAULT_STOCK_API_URL: &str = "http://localhost:3333";
pub const DEFAULT_STORAGE_PATH: &str = "./.small-cart";
pub const DEFAULT_STORAGE_KEY: &str = "@small-cart:cart";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// User-facing notification texts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub out_of_stock: String,
    pub add_failed: String,
    pub remove_failed: String,
    pub update_failed: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            out_of_stock: "Requested quantity exceeds available stock".to_string(),
            add_failed: "Error adding product".to_string(),
            remove_failed: "Error removing product".to_string(),
            update_failed: "Error changing product amount".to_string(),
        }
    }
}

/// Settings the engine itself needs; adapters are configured separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSettings {
    pub storage_key: String,
    pub messages: Messages,
}

impl CartSettings {
    pub fn from_config<C: ConfigProvider>(config: &C, messages: Messages) -> Self {
        Self {
            storage_key: config.storage_key().to_string(),
            messages,
        }
    }
}

impl Default for CartSettings {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            messages: Messages::default(),
        }
    }
}
