//! In-memory product cache.
//!
//! The cache owns the session's product list. Loads are tracked with
//! [`LoadTicket`]s so that only the most recently started load may populate
//! it; a slower response to an older request is dropped.

use std::collections::{HashMap, HashSet};

use stockia_core::ProductId;
use stockia_products::{Product, ProductPatch, ProductQuery};

use crate::api::{Listing, PageInfo};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CacheState {
    Empty,
    Loading,
    Populated,
}

/// Identifies one load started with [`ProductCache::begin_load`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone)]
pub struct ProductCache {
    state: CacheState,
    // State to fall back to when the pending load fails.
    settled: CacheState,
    latest_ticket: u64,
    query: Option<ProductQuery>,
    order: Vec<ProductId>,
    products: HashMap<ProductId, Product>,
    stale: HashSet<ProductId>,
    page: PageInfo,
}

impl Default for ProductCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductCache {
    pub fn new() -> Self {
        Self {
            state: CacheState::Empty,
            settled: CacheState::Empty,
            latest_ticket: 0,
            query: None,
            order: Vec::new(),
            products: HashMap::new(),
            stale: HashSet::new(),
            page: PageInfo::default(),
        }
    }

    pub fn state(&self) -> CacheState {
        self.state
    }

    /// Query of the most recent load.
    pub fn query(&self) -> Option<&ProductQuery> {
        self.query.as_ref()
    }

    pub fn page_info(&self) -> PageInfo {
        self.page
    }

    /// Start a (re)load. Any ticket issued before this one is now superseded.
    pub fn begin_load(&mut self, query: ProductQuery) -> LoadTicket {
        self.latest_ticket += 1;
        if self.state != CacheState::Loading {
            self.settled = self.state;
        }
        self.state = CacheState::Loading;
        self.query = Some(query);
        LoadTicket(self.latest_ticket)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.latest_ticket
    }

    /// Populate from a finished load. Returns `false`, leaving the cache
    /// untouched, when the ticket was superseded.
    pub fn finish_load(&mut self, ticket: LoadTicket, listing: Listing<Product>) -> bool {
        if !self.is_current(ticket) {
            tracing::warn!(
                ticket = ticket.0,
                latest = self.latest_ticket,
                "ignoring product load superseded by a newer request"
            );
            return false;
        }

        self.order.clear();
        self.products.clear();
        self.stale.clear();
        for product in listing.items {
            let id = product.id;
            if self.products.insert(id, product).is_none() {
                self.order.push(id);
            }
        }
        self.page = listing.page;
        self.state = CacheState::Populated;
        true
    }

    /// Abandon a failed load; the cache returns to its state before the load.
    pub fn fail_load(&mut self, ticket: LoadTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.state = self.settled;
        true
    }

    /// Insert a product created locally. Returns `false` if the id was
    /// already cached, in which case the entry is replaced.
    pub fn add_product(&mut self, product: Product) -> bool {
        let is_new = self.replace(product).is_none();
        if is_new {
            self.page.total_elements += 1;
        }
        is_new
    }

    /// Apply a patch locally. Returns `false` for an unknown id.
    pub fn update_product(&mut self, id: ProductId, patch: &ProductPatch) -> bool {
        match self.products.get_mut(&id) {
            Some(product) => {
                patch.apply_to(product);
                true
            }
            None => false,
        }
    }

    pub fn delete_product(&mut self, id: ProductId) -> Option<Product> {
        let removed = self.products.remove(&id)?;
        self.order.retain(|p| *p != id);
        self.stale.remove(&id);
        self.page.total_elements = self.page.total_elements.saturating_sub(1);
        Some(removed)
    }

    /// Store the server's version of a product, clearing any stale mark.
    pub fn replace(&mut self, product: Product) -> Option<Product> {
        let id = product.id;
        self.stale.remove(&id);
        let previous = self.products.insert(id, product);
        if previous.is_none() {
            self.order.push(id);
        }
        if self.state == CacheState::Empty {
            self.state = CacheState::Populated;
        }
        previous
    }

    /// Set the authoritative stock of a cached product.
    pub fn set_stock(&mut self, id: ProductId, stock: u32) -> bool {
        match self.products.get_mut(&id) {
            Some(product) => {
                product.current_stock = stock;
                self.stale.remove(&id);
                true
            }
            None => false,
        }
    }

    /// Flag a cached product whose stock could not be confirmed.
    pub fn mark_stale(&mut self, id: ProductId) -> bool {
        if self.products.contains_key(&id) {
            self.stale.insert(id);
            true
        } else {
            false
        }
    }

    pub fn is_stale(&self, id: ProductId) -> bool {
        self.stale.contains(&id)
    }

    pub fn stale_ids(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.order.iter().copied().filter(|id| self.stale.contains(id))
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    pub fn current_stock(&self, id: ProductId) -> Option<u32> {
        self.get(id).map(|p| p.current_stock)
    }

    /// Cached products in load order.
    pub fn products(&self) -> impl Iterator<Item = &Product> + '_ {
        self.order.iter().filter_map(|id| self.products.get(id))
    }

    pub fn low_stock(&self) -> Vec<&Product> {
        self.products().filter(|p| p.is_low_stock()).collect()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
