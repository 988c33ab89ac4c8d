pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{CartCommand, CliConfig};

pub use adapters::{ConsoleNotifier, HttpStockService, LocalStorage};
pub use config::{toml_config::TomlConfig, CartSettings, Messages};
pub use crate::core::{
    accessor::CartAccessor,
    engine::{CartEngine, MutationOutcome},
    Cart, CartLine, Product, ProductId, Stock, UpdateProductAmount,
};
pub use utils::error::{CartError, Result};
