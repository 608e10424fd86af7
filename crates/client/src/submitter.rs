//! Movement submission and reconciliation.
//!
//! A submission is one call to the backend, never retried. Once the server
//! has accepted the movement, the cached product is brought in line with the
//! server's stock:
//!
//! 1. the `newStock` returned with the movement, when present;
//! 2. otherwise a fresh `GET` of the product;
//! 3. if that fails too, the cached entry is marked stale.
//!
//! The locally projected stock is never written to the cache.

use tracing::{info, warn};

use stockia_core::ProductId;
use stockia_inventory::InventoryMovement;

use crate::api::{ApiError, MovementRequest, PersistedMovement, StockiaBackend};
use crate::context::AppContext;
use crate::error::SubmissionError;
use crate::session::BearerToken;

/// How the cached stock was settled after a successful submission.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// The server reported the new stock with the movement.
    ServerStock(u32),
    /// The product was fetched again.
    Refetched(u32),
    /// The stock could not be confirmed; the cache entry is marked stale.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedMovement {
    pub persisted: PersistedMovement,
    pub reconciliation: Reconciliation,
}

impl Reconciliation {
    pub fn confirmed_stock(&self) -> Option<u32> {
        match *self {
            Reconciliation::ServerStock(stock) | Reconciliation::Refetched(stock) => Some(stock),
            Reconciliation::Stale => None,
        }
    }
}

impl SubmittedMovement {
    /// Server-confirmed stock after the movement, if known.
    pub fn resulting_stock(&self) -> Option<u32> {
        self.reconciliation.confirmed_stock()
    }
}

impl<B: StockiaBackend> AppContext<B> {
    /// Submit a validated movement.
    ///
    /// Fails fast with [`SubmissionError::Unauthenticated`] when there is no
    /// token, and with [`SubmissionError::InFlight`] when another movement for
    /// the same product has not finished yet.
    pub async fn submit_movement(
        &self,
        movement: &InventoryMovement,
    ) -> Result<SubmittedMovement, SubmissionError> {
        let token = self.token().await?;
        let product_id = movement.product_id();
        let _guard = self
            .in_flight
            .try_acquire(product_id)
            .ok_or(SubmissionError::InFlight)?;

        let request = MovementRequest::from(movement);
        info!(
            product_id = %product_id,
            direction = %movement.direction(),
            quantity = movement.quantity(),
            "submitting inventory movement"
        );

        let persisted = match self.backend.create_movement(&token, &request).await {
            Ok(persisted) => persisted,
            Err(ApiError::Unconfirmed(detail)) => {
                warn!(
                    product_id = %product_id,
                    detail = %detail,
                    "movement accepted but reply unusable; reloading stock"
                );
                let stock = self
                    .reconcile(&token, product_id, None)
                    .await
                    .confirmed_stock();
                return Err(SubmissionError::Unconfirmed { stock });
            }
            Err(err) => {
                warn!(product_id = %product_id, error = %err, "inventory movement rejected");
                return Err(err.into());
            }
        };

        let reconciliation = self
            .reconcile(&token, product_id, persisted.new_stock)
            .await;
        info!(
            product_id = %product_id,
            movement_id = %persisted.id,
            ?reconciliation,
            "inventory movement recorded"
        );

        Ok(SubmittedMovement {
            persisted,
            reconciliation,
        })
    }

    async fn reconcile(
        &self,
        token: &BearerToken,
        product_id: ProductId,
        new_stock: Option<u32>,
    ) -> Reconciliation {
        if let Some(stock) = new_stock {
            self.cache.lock().await.set_stock(product_id, stock);
            return Reconciliation::ServerStock(stock);
        }

        match self.backend.get_product(token, product_id).await {
            Ok(product) => {
                let stock = product.current_stock;
                self.cache.lock().await.replace(product);
                Reconciliation::Refetched(stock)
            }
            Err(err) => {
                warn!(
                    product_id = %product_id,
                    error = %err,
                    "could not confirm stock after movement; marking product stale"
                );
                self.cache.lock().await.mark_stale(product_id);
                Reconciliation::Stale
            }
        }
    }
}
