pub mod accessor;
pub mod engine;

pub use crate::domain::model::{Cart, CartLine, Product, ProductId, Stock, UpdateProductAmount};
pub use crate::domain::ports::{ConfigProvider, NotificationSink, PersistentStore, StockService};
pub use crate::utils::error::Result;
