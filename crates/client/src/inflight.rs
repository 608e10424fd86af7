//! Per-product submission registry.
//!
//! At most one movement per product may be in flight. The entry is released
//! when the [`InFlightGuard`] drops, whichever way the submission ends.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use stockia_core::ProductId;

#[derive(Debug, Clone, Default)]
pub struct InFlightRegistry {
    products: Arc<Mutex<HashSet<ProductId>>>,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // Never held across an await.
    fn lock(&self) -> MutexGuard<'_, HashSet<ProductId>> {
        self.products.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claim `id`; `None` if a submission for it is already pending.
    pub fn try_acquire(&self, id: ProductId) -> Option<InFlightGuard> {
        if !self.lock().insert(id) {
            return None;
        }
        Some(InFlightGuard {
            registry: self.clone(),
            id,
        })
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.lock().contains(&id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[derive(Debug)]
pub struct InFlightGuard {
    registry: InFlightRegistry,
    id: ProductId,
}

impl InFlightGuard {
    pub fn product_id(&self) -> ProductId {
        self.id
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.registry.lock().remove(&self.id);
    }
}
