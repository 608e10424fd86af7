//! The explicit application context.
//!
//! Everything the screens share lives here and is passed to operations
//! explicitly: the backend handle, the session, the product cache, the
//! reference data and the in-flight registry.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use stockia_core::{CustomerId, FieldError, ProductId};
use stockia_inventory::{InventoryMovement, MovementDirection, MovementForm, MovementValidator};
use stockia_parties::{Customer, CustomerQuery, CustomerRequest};
use stockia_products::{Product, ProductPatch, ProductQuery, ProductRequest};

use crate::api::{PageInfo, StockiaBackend};
use crate::cache::ProductCache;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::inflight::InFlightRegistry;
use crate::reference::ReferenceData;
use crate::session::{BearerToken, Credentials, Session, SessionUser};

/// Customers fetched with the reference data.
const REFERENCE_CUSTOMER_PAGE: u32 = 100;

pub struct AppContext<B> {
    pub(crate) backend: Arc<B>,
    pub(crate) config: ClientConfig,
    pub(crate) session: Mutex<Session>,
    pub(crate) cache: Mutex<ProductCache>,
    pub(crate) reference: Mutex<ReferenceData>,
    pub(crate) in_flight: InFlightRegistry,
    validator: MovementValidator,
}

impl<B: StockiaBackend> AppContext<B> {
    pub fn new(backend: Arc<B>, config: ClientConfig) -> Self {
        let session = match &config.auth_token {
            Some(token) => Session::with_token(BearerToken::new(token.clone())),
            None => Session::anonymous(),
        };

        Self {
            backend,
            validator: MovementValidator::new(config.stock_policy),
            config,
            session: Mutex::new(session),
            cache: Mutex::new(ProductCache::new()),
            reference: Mutex::new(ReferenceData::new()),
            in_flight: InFlightRegistry::new(),
        }
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn validator(&self) -> MovementValidator {
        self.validator
    }

    pub(crate) async fn token(&self) -> Result<BearerToken, crate::session::Unauthenticated> {
        self.session.lock().await.require_token()
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<SessionUser, ClientError> {
        let grant = self.backend.login(credentials).await?;
        info!(email = %credentials.email, "signed in");
        self.session
            .lock()
            .await
            .sign_in(grant.token, Some(grant.user.clone()));
        Ok(grant.user)
    }

    /// Sign out locally, then tell the backend. A failed server call is
    /// logged; the local session is cleared either way.
    pub async fn logout(&self) {
        let token = self.session.lock().await.sign_out();
        if let Some(token) = token {
            if let Err(err) = self.backend.logout(&token).await {
                warn!(error = %err, "server-side logout failed");
            }
        }
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.lock().await.is_authenticated()
    }

    /// Reload the product list. A response that arrives after a newer
    /// refresh was started is discarded and reported as
    /// [`ClientError::Superseded`].
    pub async fn refresh_products(&self, query: ProductQuery) -> Result<PageInfo, ClientError> {
        let token = self.token().await?;
        let ticket = self.cache.lock().await.begin_load(query.clone());

        let result = self.backend.list_products(&token, &query).await;

        let mut cache = self.cache.lock().await;
        match result {
            Ok(listing) => {
                let count = listing.items.len();
                if cache.finish_load(ticket, listing) {
                    info!(count, page = query.page, "products loaded");
                    Ok(cache.page_info())
                } else {
                    Err(ClientError::Superseded)
                }
            }
            Err(err) => {
                warn!(error = %err, "product load failed");
                cache.fail_load(ticket);
                Err(err.into())
            }
        }
    }

    /// Fetch one product from the backend and store it in the cache.
    pub async fn fetch_product(&self, id: ProductId) -> Result<Product, ClientError> {
        let token = self.token().await?;
        let product = self.backend.get_product(&token, id).await?;
        self.cache.lock().await.replace(product.clone());
        Ok(product)
    }

    pub async fn product(&self, id: ProductId) -> Option<Product> {
        self.cache.lock().await.get(id).cloned()
    }

    pub async fn products(&self) -> Vec<Product> {
        self.cache.lock().await.products().cloned().collect()
    }

    pub async fn low_stock_products(&self) -> Vec<Product> {
        self.cache
            .lock()
            .await
            .low_stock()
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn is_stale(&self, id: ProductId) -> bool {
        self.cache.lock().await.is_stale(id)
    }

    /// `true` while a movement for `id` is being submitted.
    pub fn is_submitting(&self, id: ProductId) -> bool {
        self.in_flight.contains(id)
    }

    /// Validate the adjustment form against the cached stock. A product
    /// missing from the cache counts as having no stock.
    pub async fn validate_movement(
        &self,
        id: ProductId,
        form: &MovementForm,
    ) -> Result<InventoryMovement, Vec<FieldError>> {
        let stock = self.cache.lock().await.current_stock(id).unwrap_or(0);
        self.validator.validate(id, form, stock)
    }

    /// Live "resulting stock" preview for the adjustment form.
    pub async fn preview_stock(
        &self,
        id: ProductId,
        direction: MovementDirection,
        quantity_text: &str,
    ) -> Option<u32> {
        let stock = self.cache.lock().await.current_stock(id)?;
        Some(stockia_inventory::preview(stock, direction, quantity_text))
    }

    pub async fn create_product(&self, request: &ProductRequest) -> Result<Product, ClientError> {
        let token = self.token().await?;
        let product = self.backend.create_product(&token, request).await?;
        info!(product_id = %product.id, name = %product.name, "product created");
        self.cache.lock().await.add_product(product.clone());
        Ok(product)
    }

    /// Send the patch and store what the server returns.
    pub async fn update_product(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, ClientError> {
        let token = self.token().await?;
        let product = self.backend.update_product(&token, id, patch).await?;
        info!(product_id = %id, "product updated");
        self.cache.lock().await.replace(product.clone());
        Ok(product)
    }

    pub async fn delete_product(&self, id: ProductId) -> Result<(), ClientError> {
        let token = self.token().await?;
        self.backend.delete_product(&token, id).await?;
        info!(product_id = %id, "product deleted");
        self.cache.lock().await.delete_product(id);
        Ok(())
    }

    pub async fn restore_product(&self, id: ProductId) -> Result<Product, ClientError> {
        let token = self.token().await?;
        let product = self.backend.restore_product(&token, id).await?;
        info!(product_id = %id, "product restored");
        self.cache.lock().await.replace(product.clone());
        Ok(product)
    }

    /// Load categories, customers and suppliers. A backend without a
    /// suppliers endpoint (404) yields an empty supplier list.
    pub async fn load_reference_data(&self) -> Result<(), ClientError> {
        let token = self.token().await?;

        let categories = self.backend.list_categories(&token).await?;
        let customers = self
            .backend
            .list_customers(
                &token,
                &CustomerQuery {
                    size: REFERENCE_CUSTOMER_PAGE,
                    ..CustomerQuery::default()
                },
            )
            .await?
            .items;
        let suppliers = match self.backend.list_suppliers(&token).await {
            Ok(suppliers) => suppliers,
            Err(err) if err.is_not_found() => {
                warn!("suppliers endpoint not available; continuing without suppliers");
                Vec::new()
            }
            Err(err) => return Err(err.into()),
        };

        info!(
            categories = categories.len(),
            customers = customers.len(),
            suppliers = suppliers.len(),
            "reference data loaded"
        );
        self.reference
            .lock()
            .await
            .replace_all(categories, customers, suppliers);
        Ok(())
    }

    pub async fn reference_data(&self) -> ReferenceData {
        self.reference.lock().await.clone()
    }

    pub async fn create_customer(&self, request: &CustomerRequest) -> Result<Customer, ClientError> {
        let token = self.token().await?;
        let customer = self.backend.create_customer(&token, request).await?;
        self.reference.lock().await.upsert_customer(customer.clone());
        Ok(customer)
    }

    pub async fn update_customer(
        &self,
        id: CustomerId,
        request: &CustomerRequest,
    ) -> Result<Customer, ClientError> {
        let token = self.token().await?;
        let customer = self.backend.update_customer(&token, id, request).await?;
        self.reference.lock().await.upsert_customer(customer.clone());
        Ok(customer)
    }
}
