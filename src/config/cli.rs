use crate::config::{
    toml_config::TomlConfig, DEFAULT_STOCK_API_URL, DEFAULT_STORAGE_KEY, DEFAULT_STORAGE_PATH,
    DEFAULT_TIMEOUT_SECONDS,
};
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "small-cart")]
#[command(about = "Shopping cart backed by a remote stock service and a local snapshot")]
pub struct CliConfig {
    /// Base URL of the stock service
    #[arg(long, default_value = DEFAULT_STOCK_API_URL)]
    pub api_url: String,

    /// Directory holding the cart snapshot
    #[arg(long, default_value = DEFAULT_STORAGE_PATH)]
    pub storage_path: String,

    /// Key the snapshot is stored under
    #[arg(long, default_value = DEFAULT_STORAGE_KEY)]
    pub storage_key: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout: u64,

    /// Load settings from a TOML file; CLI defaults are then ignored
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: CartCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum CartCommand {
    /// Print the current cart
    Show,
    /// Add one unit of a product
    Add { product_id: u64 },
    /// Remove a product line entirely
    Remove { product_id: u64 },
    /// Set the amount of a product already in the cart
    Update {
        product_id: u64,
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

impl CliConfig {
    pub fn load_toml(&self) -> Option<Result<TomlConfig>> {
        self.config.as_deref().map(TomlConfig::from_file)
    }
}

impl ConfigProvider for CliConfig {
    fn stock_api_url(&self) -> &str {
        &self.api_url
    }

    fn storage_path(&self) -> &str {
        &self.storage_path
    }

    fn storage_key(&self) -> &str {
        &self.storage_key
    }

    fn request_timeout_seconds(&self) -> u64 {
        self.timeout
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_service_url("--api-url", &self.api_url)?;
        validation::validate_storage_path("--storage-path", &self.storage_path)?;
        validation::validate_storage_key("--storage-key", &self.storage_key)?;
        validation::validate_timeout_seconds("--timeout", self.timeout)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_update_with_negative_amount() {
        let config =
            CliConfig::try_parse_from(["small-cart", "update", "3", "-1"]).unwrap();

        match config.command {
            CartCommand::Update { product_id, amount } => {
                assert_eq!(product_id, 3);
                assert_eq!(amount, -1);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_defaults_validate() {
        let config = CliConfig::try_parse_from(["small-cart", "show"]).unwrap();
        assert_eq!(config.storage_key(), DEFAULT_STORAGE_KEY);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        let config =
            CliConfig::try_parse_from(["small-cart", "--timeout", "0", "show"]).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_url_with_query_rejected() {
        let config = CliConfig::try_parse_from([
            "small-cart",
            "--api-url",
            "http://localhost:3333/?token=1",
            "show",
        ])
        .unwrap();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("--api-url"));
    }
}
