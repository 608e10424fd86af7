//! In-memory `StockiaBackend` for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Notify;

use stockia_core::{CustomerId, MovementId, ProductId};
use stockia_inventory::{MovementDirection, project};
use stockia_parties::{Customer, CustomerQuery, CustomerRequest, Supplier};
use stockia_products::{Category, Product, ProductPatch, ProductQuery, ProductRequest};

use crate::api::{
    ApiError, AuthGrant, Listing, MovementRequest, PersistedMovement, StockiaBackend,
};
use crate::session::{BearerToken, Credentials, SessionUser};

pub(crate) const PASSWORD: &str = "secret123";

fn not_found(what: &str) -> ApiError {
    ApiError::Server {
        status: 404,
        message: format!("{what} not found"),
    }
}

pub(crate) struct FakeBackend {
    products: Mutex<HashMap<ProductId, Product>>,
    deleted: Mutex<HashMap<ProductId, Product>>,
    customers: Mutex<Vec<Customer>>,
    categories: Mutex<Vec<Category>>,
    pub movements: Mutex<Vec<MovementRequest>>,
    movement_error: Mutex<Option<ApiError>>,
    report_new_stock: AtomicBool,
    reported_stock: Mutex<Option<u32>>,
    unreadable_movement_reply: AtomicBool,
    fail_get_product: AtomicBool,
    suppliers_missing: AtomicBool,
    hold_movements: AtomicBool,
    release: Notify,
    pub get_product_calls: AtomicUsize,
    pub logouts: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            products: Mutex::new(HashMap::new()),
            deleted: Mutex::new(HashMap::new()),
            customers: Mutex::new(Vec::new()),
            categories: Mutex::new(Vec::new()),
            movements: Mutex::new(Vec::new()),
            movement_error: Mutex::new(None),
            report_new_stock: AtomicBool::new(true),
            reported_stock: Mutex::new(None),
            unreadable_movement_reply: AtomicBool::new(false),
            fail_get_product: AtomicBool::new(false),
            suppliers_missing: AtomicBool::new(false),
            hold_movements: AtomicBool::new(false),
            release: Notify::new(),
            get_product_calls: AtomicUsize::new(0),
            logouts: AtomicUsize::new(0),
        }
    }

    pub fn with_product(self, name: &str, stock: u32) -> (Self, ProductId) {
        let mut product = Product::new(ProductId::new(), name);
        product.current_stock = stock;
        let id = product.id;
        self.products.lock().unwrap().insert(id, product);
        (self, id)
    }

    pub fn with_category(self, category: Category) -> Self {
        self.categories.lock().unwrap().push(category);
        self
    }

    pub fn report_new_stock(&self, report: bool) {
        self.report_new_stock.store(report, Ordering::SeqCst);
    }

    /// Answer movements with this `newStock` instead of the stored value.
    pub fn report_stock_as(&self, stock: Option<u32>) {
        *self.reported_stock.lock().unwrap() = stock;
    }

    /// Apply movements but answer with a reply the client cannot use.
    pub fn unreadable_movement_reply(&self, unreadable: bool) {
        self.unreadable_movement_reply.store(unreadable, Ordering::SeqCst);
    }

    pub fn fail_get_product(&self, fail: bool) {
        self.fail_get_product.store(fail, Ordering::SeqCst);
    }

    pub fn suppliers_missing(&self, missing: bool) {
        self.suppliers_missing.store(missing, Ordering::SeqCst);
    }

    pub fn fail_movements_with(&self, err: Option<ApiError>) {
        *self.movement_error.lock().unwrap() = err;
    }

    /// Park movement calls until [`release_movement`](Self::release_movement).
    pub fn hold_movements(&self) {
        self.hold_movements.store(true, Ordering::SeqCst);
    }

    pub fn release_movement(&self) {
        self.hold_movements.store(false, Ordering::SeqCst);
        self.release.notify_one();
    }

    pub fn stored_stock(&self, id: ProductId) -> Option<u32> {
        self.products.lock().unwrap().get(&id).map(|p| p.current_stock)
    }

    pub fn movement_count(&self) -> usize {
        self.movements.lock().unwrap().len()
    }
}

#[async_trait]
impl StockiaBackend for FakeBackend {
    async fn login(&self, credentials: &Credentials) -> Result<AuthGrant, ApiError> {
        if credentials.password != PASSWORD {
            return Err(ApiError::Unauthorized {
                status: 401,
                message: "Credenciales invalidas".into(),
            });
        }
        Ok(AuthGrant {
            token: BearerToken::new("fake-jwt"),
            user: SessionUser {
                email: Some(credentials.email.clone()),
                name: Some("Tester".into()),
                role: Some("ADMIN".into()),
            },
        })
    }

    async fn logout(&self, _token: &BearerToken) -> Result<(), ApiError> {
        self.logouts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn list_products(
        &self,
        _token: &BearerToken,
        _query: &ProductQuery,
    ) -> Result<Listing<Product>, ApiError> {
        let mut items: Vec<Product> = self.products.lock().unwrap().values().cloned().collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Listing::complete(items))
    }

    async fn get_product(&self, _token: &BearerToken, id: ProductId) -> Result<Product, ApiError> {
        self.get_product_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_get_product.load(Ordering::SeqCst) {
            return Err(ApiError::Network("connection reset".into()));
        }
        self.products
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("product"))
    }

    async fn create_product(
        &self,
        _token: &BearerToken,
        request: &ProductRequest,
    ) -> Result<Product, ApiError> {
        let mut product = Product::new(ProductId::new(), request.name.clone());
        product.price = request.price;
        product.min_stock = request.min_stock;
        product.photo_url = request.photo_url.clone();
        product.category = self
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == request.category_id)
            .map(Category::to_ref);
        self.products
            .lock()
            .unwrap()
            .insert(product.id, product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        _token: &BearerToken,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, ApiError> {
        let mut products = self.products.lock().unwrap();
        let product = products.get_mut(&id).ok_or_else(|| not_found("product"))?;
        patch.apply_to(product);
        Ok(product.clone())
    }

    async fn delete_product(&self, _token: &BearerToken, id: ProductId) -> Result<(), ApiError> {
        let product = self
            .products
            .lock()
            .unwrap()
            .remove(&id)
            .ok_or_else(|| not_found("product"))?;
        self.deleted.lock().unwrap().insert(id, product);
        Ok(())
    }

    async fn restore_product(
        &self,
        _token: &BearerToken,
        id: ProductId,
    ) -> Result<Product, ApiError> {
        let product = self
            .deleted
            .lock()
            .unwrap()
            .remove(&id)
            .ok_or_else(|| not_found("deleted product"))?;
        self.products.lock().unwrap().insert(id, product.clone());
        Ok(product)
    }

    async fn create_movement(
        &self,
        _token: &BearerToken,
        movement: &MovementRequest,
    ) -> Result<PersistedMovement, ApiError> {
        self.movements.lock().unwrap().push(movement.clone());
        if self.hold_movements.load(Ordering::SeqCst) {
            self.release.notified().await;
        }
        if let Some(err) = self.movement_error.lock().unwrap().clone() {
            return Err(err);
        }

        let mut products = self.products.lock().unwrap();
        let product = products
            .get_mut(&movement.product_id)
            .ok_or_else(|| not_found("product"))?;
        product.current_stock = project(
            product.current_stock,
            movement.movement_type,
            movement.quantity,
        );
        if self.unreadable_movement_reply.load(Ordering::SeqCst) {
            return Err(ApiError::Unconfirmed("response carried no data".into()));
        }
        let new_stock = self
            .reported_stock
            .lock()
            .unwrap()
            .or(Some(product.current_stock))
            .filter(|_| self.report_new_stock.load(Ordering::SeqCst));

        Ok(PersistedMovement {
            id: MovementId::new(),
            product_id: product.id,
            product_name: Some(product.name.clone()),
            movement_type: movement.movement_type,
            quantity: movement.quantity,
            reason: movement.reason.clone(),
            user_id: None,
            user_name: Some("tester".into()),
            new_stock,
            purchase_cost: match movement.movement_type {
                MovementDirection::In => movement.purchase_cost,
                MovementDirection::Out => None,
            },
            created_at: None,
        })
    }

    async fn list_categories(&self, _token: &BearerToken) -> Result<Vec<Category>, ApiError> {
        Ok(self.categories.lock().unwrap().clone())
    }

    async fn list_customers(
        &self,
        _token: &BearerToken,
        _query: &CustomerQuery,
    ) -> Result<Listing<Customer>, ApiError> {
        Ok(Listing::complete(self.customers.lock().unwrap().clone()))
    }

    async fn create_customer(
        &self,
        _token: &BearerToken,
        request: &CustomerRequest,
    ) -> Result<Customer, ApiError> {
        let customer = Customer {
            id: CustomerId::new(),
            name: request.name.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            is_frequent: request.is_frequent,
        };
        self.customers.lock().unwrap().push(customer.clone());
        Ok(customer)
    }

    async fn update_customer(
        &self,
        _token: &BearerToken,
        id: CustomerId,
        request: &CustomerRequest,
    ) -> Result<Customer, ApiError> {
        let mut customers = self.customers.lock().unwrap();
        let customer = customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| not_found("customer"))?;
        customer.name = request.name.clone();
        customer.email = request.email.clone();
        customer.phone = request.phone.clone();
        customer.is_frequent = request.is_frequent;
        Ok(customer.clone())
    }

    async fn list_suppliers(&self, _token: &BearerToken) -> Result<Vec<Supplier>, ApiError> {
        if self.suppliers_missing.load(Ordering::SeqCst) {
            return Err(not_found("suppliers endpoint"));
        }
        Ok(Vec::new())
    }
}
