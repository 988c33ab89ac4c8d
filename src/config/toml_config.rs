use crate::config::{Messages, DEFAULT_STORAGE_KEY, DEFAULT_TIMEOUT_SECONDS};
use crate::core::ConfigProvider;
use crate::utils::error::{CartError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub messages: Option<Messages>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub path: String,
    pub key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: Option<String>,
    pub verbose: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CartError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CartError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CART_API_URL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CartError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn messages(&self) -> Messages {
        self.messages.clone().unwrap_or_default()
    }

    pub fn json_logs(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.format.as_deref())
            .map(|f| f.eq_ignore_ascii_case("json"))
            .unwrap_or(false)
    }

    pub fn verbose(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.verbose).unwrap_or(false)
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_service_url("service.base_url", &self.service.base_url)?;
        validation::validate_storage_path("storage.path", &self.storage.path)?;
        validation::validate_storage_key("storage.key", self.storage_key())?;
        validation::validate_timeout_seconds(
            "service.timeout_seconds",
            self.request_timeout_seconds(),
        )?;

        if let Some(format) = self.logging.as_ref().and_then(|l| l.format.as_deref()) {
            let valid_formats = ["compact", "json"];
            if !valid_formats.contains(&format.to_ascii_lowercase().as_str()) {
                return Err(CartError::InvalidConfigValueError {
                    field: "logging.format".to_string(),
                    value: format.to_string(),
                    reason: format!(
                        "Unsupported format. Valid formats: {}",
                        valid_formats.join(", ")
                    ),
                });
            }
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn stock_api_url(&self) -> &str {
        &self.service.base_url
    }

    fn storage_path(&self) -> &str {
        &self.storage.path
    }

    fn storage_key(&self) -> &str {
        self.storage.key.as_deref().unwrap_or(DEFAULT_STORAGE_KEY)
    }

    fn request_timeout_seconds(&self) -> u64 {
        self.service.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[service]
base_url = "http://localhost:3333"
timeout_seconds = 5

[storage]
path = "./cart-data"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.stock_api_url(), "http://localhost:3333");
        assert_eq!(config.storage_path(), "./cart-data");
        assert_eq!(config.storage_key(), DEFAULT_STORAGE_KEY);
        assert_eq!(config.request_timeout_seconds(), 5);
        assert_eq!(config.messages(), Messages::default());
        assert!(!config.json_logs());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_messages_keep_defaults() {
        let toml_content = r#"
[service]
base_url = "http://localhost:3333"

[storage]
path = "./cart-data"
key = "@RocketShoes:cart"

[messages]
out_of_stock = "Quantidade solicitada fora de estoque"

[logging]
format = "json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let messages = config.messages();

        assert_eq!(config.storage_key(), "@RocketShoes:cart");
        assert_eq!(messages.out_of_stock, "Quantidade solicitada fora de estoque");
        assert_eq!(messages.add_failed, Messages::default().add_failed);
        assert!(config.json_logs());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SMALL_CART_TEST_API_URL", "https://stock.example.com");

        let toml_content = r#"
[service]
base_url = "${SMALL_CART_TEST_API_URL}"

[storage]
path = "./output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.service.base_url, "https://stock.example.com");

        std::env::remove_var("SMALL_CART_TEST_API_URL");
    }

    #[test]
    fn test_config_validation() {
        let bad_url = r#"
[service]
base_url = "invalid-url"

[storage]
path = "./output"
"#;
        assert!(TomlConfig::from_toml_str(bad_url).unwrap().validate().is_err());

        let bad_timeout = r#"
[service]
base_url = "http://localhost:3333"
timeout_seconds = 0

[storage]
path = "./output"
"#;
        assert!(TomlConfig::from_toml_str(bad_timeout).unwrap().validate().is_err());

        let bad_format = r#"
[service]
base_url = "http://localhost:3333"

[storage]
path = "./output"

[logging]
format = "xml"
"#;
        assert!(TomlConfig::from_toml_str(bad_format).unwrap().validate().is_err());
    }

    #[test]
    fn test_missing_section_is_parse_error() {
        let result = TomlConfig::from_toml_str("[service]\nbase_url = \"http://x\"\n");
        assert!(matches!(
            result,
            Err(CartError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[service]
base_url = "https://api.example.com"

[storage]
path = "./output"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.stock_api_url(), "https://api.example.com");
    }
}
