use crate::config::CartSettings;
use crate::core::{
    Cart, CartLine, NotificationSink, PersistentStore, ProductId, StockService,
    UpdateProductAmount,
};
use crate::utils::error::{CartError, Result};
use std::sync::Arc;
use tokio::sync::{watch, Mutex, OwnedMutexGuard};

/// How a single mutation ended.
#[derive(Debug)]
pub enum MutationOutcome {
    Committed,
    /// Request was a no-op (non-positive amount).
    Ignored,
    RejectedStock { requested: i64, available: i64 },
    RejectedNotFound,
    InfrastructureFailure(CartError),
}

impl MutationOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, MutationOutcome::Committed)
    }
}

#[derive(Debug, Clone, Copy)]
enum Operation {
    Add,
    Remove,
    Update,
}

/// Owns the live cart. Every mutation builds a working copy from the latest
/// committed cart and either commits it whole or leaves the cart untouched.
///
/// Once a commit has started writing the snapshot it runs to completion on
/// its own task, so dropping a mutation future (timeout, `select!`) never
/// leaves the stored snapshot and the live cart out of sync.
pub struct CartEngine<S: StockService, P: PersistentStore, N: NotificationSink> {
    stock: S,
    store: Arc<P>,
    notifier: N,
    settings: CartSettings,
    state: Arc<watch::Sender<Cart>>,
    // 序列化整個 read-modify-write-persist 流程
    mutation: Arc<Mutex<()>>,
}

impl<S, P, N> CartEngine<S, P, N>
where
    S: StockService,
    P: PersistentStore + 'static,
    N: NotificationSink,
{
    pub async fn new(stock: S, store: P, notifier: N, settings: CartSettings) -> Self {
        let initial = restore_snapshot(&store, &settings.storage_key).await;
        tracing::debug!("Cart restored with {} line(s)", initial.len());

        let (state, _) = watch::channel(initial);

        Self {
            stock,
            store: Arc::new(store),
            notifier,
            settings,
            state: Arc::new(state),
            mutation: Arc::new(Mutex::new(())),
        }
    }

    /// Latest committed cart.
    pub fn cart(&self) -> Cart {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.state.subscribe()
    }

    pub async fn add_product(&self, product_id: ProductId) -> MutationOutcome {
        let guard = self.lock().await;
        let outcome = self
            .try_add(product_id, guard)
            .await
            .unwrap_or_else(MutationOutcome::InfrastructureFailure);
        self.report(Operation::Add, product_id, &outcome);
        outcome
    }

    pub async fn remove_product(&self, product_id: ProductId) -> MutationOutcome {
        let guard = self.lock().await;
        let outcome = self
            .try_remove(product_id, guard)
            .await
            .unwrap_or_else(MutationOutcome::InfrastructureFailure);
        self.report(Operation::Remove, product_id, &outcome);
        outcome
    }

    pub async fn update_product_amount(&self, request: UpdateProductAmount) -> MutationOutcome {
        if request.amount <= 0 {
            tracing::debug!(
                "Ignoring amount {} for product {}",
                request.amount,
                request.product_id
            );
            return MutationOutcome::Ignored;
        }

        let guard = self.lock().await;
        let outcome = self
            .try_update(request, guard)
            .await
            .unwrap_or_else(MutationOutcome::InfrastructureFailure);
        self.report(Operation::Update, request.product_id, &outcome);
        outcome
    }

    async fn lock(&self) -> OwnedMutexGuard<()> {
        Arc::clone(&self.mutation).lock_owned().await
    }

    async fn try_add(
        &self,
        product_id: ProductId,
        guard: OwnedMutexGuard<()>,
    ) -> Result<MutationOutcome> {
        let mut working = self.cart();
        let current = working.find(product_id).map(|line| line.amount);

        let stock = self.stock.get_stock(product_id).await?;
        let desired = i64::from(current.unwrap_or(0)) + 1;

        // 庫存為零或負數時一律視為缺貨
        if desired > stock.amount {
            return Ok(MutationOutcome::RejectedStock {
                requested: desired,
                available: stock.amount,
            });
        }

        let desired = line_amount(desired)?;

        match working.line_mut(product_id) {
            Some(line) => line.amount = desired,
            None => {
                let product = self.stock.get_product(product_id).await?;
                working.push(CartLine::new(product, 1));
            }
        }

        self.commit(working, guard).await?;
        Ok(MutationOutcome::Committed)
    }

    async fn try_remove(
        &self,
        product_id: ProductId,
        guard: OwnedMutexGuard<()>,
    ) -> Result<MutationOutcome> {
        let mut working = self.cart();

        let Some(index) = working.position(product_id) else {
            return Ok(MutationOutcome::RejectedNotFound);
        };
        working.remove_at(index);

        self.commit(working, guard).await?;
        Ok(MutationOutcome::Committed)
    }

    async fn try_update(
        &self,
        request: UpdateProductAmount,
        guard: OwnedMutexGuard<()>,
    ) -> Result<MutationOutcome> {
        let stock = self.stock.get_stock(request.product_id).await?;

        if request.amount > stock.amount {
            return Ok(MutationOutcome::RejectedStock {
                requested: request.amount,
                available: stock.amount,
            });
        }

        let amount = line_amount(request.amount)?;

        let mut working = self.cart();
        match working.line_mut(request.product_id) {
            Some(line) => line.amount = amount,
            None => return Ok(MutationOutcome::RejectedNotFound),
        }

        self.commit(working, guard).await?;
        Ok(MutationOutcome::Committed)
    }

    /// Persist first, then swap and publish in one step. The write and the
    /// swap run on a spawned task that keeps the mutation lock until done.
    async fn commit(&self, next: Cart, guard: OwnedMutexGuard<()>) -> Result<()> {
        let blob = serde_json::to_vec(&next)?;
        let store = Arc::clone(&self.store);
        let state = Arc::clone(&self.state);
        let key = self.settings.storage_key.clone();

        tokio::spawn(async move {
            let _guard = guard;
            store.set(&key, &blob).await?;
            state.send_replace(next);
            Ok::<_, CartError>(())
        })
        .await?
    }

    fn report(&self, operation: Operation, product_id: ProductId, outcome: &MutationOutcome) {
        let messages = &self.settings.messages;
        let failure_message = match operation {
            Operation::Add => &messages.add_failed,
            Operation::Remove => &messages.remove_failed,
            Operation::Update => &messages.update_failed,
        };

        match outcome {
            MutationOutcome::Committed => {
                tracing::info!("{:?} product {} committed", operation, product_id);
            }
            MutationOutcome::Ignored => {}
            MutationOutcome::RejectedStock {
                requested,
                available,
            } => {
                tracing::info!(
                    "{:?} product {} rejected: requested {}, available {}",
                    operation,
                    product_id,
                    requested,
                    available
                );
                self.notifier.error(&messages.out_of_stock);
            }
            MutationOutcome::RejectedNotFound => {
                tracing::info!("{:?} product {} rejected: not in cart", operation, product_id);
                self.notifier.error(failure_message);
            }
            MutationOutcome::InfrastructureFailure(e) => {
                tracing::error!(
                    "{:?} product {} failed: {} (Category: {:?})",
                    operation,
                    product_id,
                    e,
                    e.category()
                );
                self.notifier.error(failure_message);
            }
        }
    }
}

fn line_amount(amount: i64) -> Result<u32> {
    u32::try_from(amount).map_err(|_| CartError::InvariantViolation {
        message: format!("amount {} out of range", amount),
    })
}

/// Loads the persisted cart. Anything unreadable yields an empty cart.
async fn restore_snapshot<P: PersistentStore>(store: &P, key: &str) -> Cart {
    let blob = match store.get(key).await {
        Ok(Some(blob)) => blob,
        Ok(None) => return Cart::new(),
        Err(e) => {
            tracing::warn!("Could not read cart snapshot '{}': {}", key, e);
            return Cart::new();
        }
    };

    let parsed = serde_json::from_slice::<Cart>(&blob)
        .map_err(CartError::from)
        .and_then(|cart| cart.check_invariants().map(|_| cart));

    match parsed {
        Ok(cart) => cart,
        Err(e) => {
            tracing::warn!("Discarding malformed cart snapshot '{}': {}", key, e);
            Cart::new()
        }
    }
}
