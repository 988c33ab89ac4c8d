use crate::domain::model::{Product, ProductId, Stock};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Remote source of truth for availability and product metadata.
#[async_trait]
pub trait StockService: Send + Sync {
    async fn get_stock(&self, product_id: ProductId) -> Result<Stock>;
    async fn get_product(&self, product_id: ProductId) -> Result<Product>;
}

/// Key/value blob store holding the serialized cart snapshot.
pub trait PersistentStore: Send + Sync {
    fn get(&self, key: &str)
        -> impl std::future::Future<Output = Result<Option<Vec<u8>>>> + Send;
    fn set(&self, key: &str, blob: &[u8])
        -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Fire-and-forget channel for user-facing messages. Must not fail.
pub trait NotificationSink: Send + Sync {
    fn error(&self, message: &str);
}

pub trait ConfigProvider: Send + Sync {
    fn stock_api_url(&self) -> &str;
    fn storage_path(&self) -> &str;
    fn storage_key(&self) -> &str;
    fn request_timeout_seconds(&self) -> u64;
}
