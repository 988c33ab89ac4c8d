use crate::core::engine::CartEngine;
use crate::core::{Cart, NotificationSink, PersistentStore, ProductId, StockService, UpdateProductAmount};
use std::sync::Arc;
use tokio::sync::watch;

/// Read/subscribe handle handed to consuming code. Pure delegation to the
/// engine; outcomes surface through the cart contents or the notifier.
pub struct CartAccessor<S: StockService, P: PersistentStore, N: NotificationSink> {
    engine: Arc<CartEngine<S, P, N>>,
}

impl<S, P, N> CartAccessor<S, P, N>
where
    S: StockService,
    P: PersistentStore + 'static,
    N: NotificationSink,
{
    pub fn new(engine: Arc<CartEngine<S, P, N>>) -> Self {
        Self { engine }
    }

    pub fn cart(&self) -> Cart {
        self.engine.cart()
    }

    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.engine.subscribe()
    }

    pub async fn add_product(&self, product_id: ProductId) {
        self.engine.add_product(product_id).await;
    }

    pub async fn remove_product(&self, product_id: ProductId) {
        self.engine.remove_product(product_id).await;
    }

    pub async fn update_product_amount(&self, request: UpdateProductAmount) {
        self.engine.update_product_amount(request).await;
    }
}

impl<S: StockService, P: PersistentStore, N: NotificationSink> Clone for CartAccessor<S, P, N> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<S: StockService, P: PersistentStore + 'static, N: NotificationSink> From<CartEngine<S, P, N>>
    for CartAccessor<S, P, N>
{
    fn from(engine: CartEngine<S, P, N>) -> Self {
        Self::new(Arc::new(engine))
    }
}
