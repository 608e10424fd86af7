//! Bindings to the Stockia REST backend.
//!
//! [`StockiaBackend`] is the seam between the client core and the system of
//! record; [`HttpBackend`] is the production implementation.

pub mod dto;
pub mod envelope;
pub mod http;

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

use stockia_core::{CustomerId, ProductId};
use stockia_parties::{Customer, CustomerQuery, CustomerRequest, Supplier};
use stockia_products::{Category, Product, ProductPatch, ProductQuery, ProductRequest};

use crate::session::{BearerToken, Credentials, SessionUser};

pub use dto::{MovementRequest, PersistedMovement};
pub use envelope::{ApiResult, ErrorData, ListPayload, Listing, Page, PageInfo};
pub use http::HttpBackend;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("validation failed: {message}")]
    Validation {
        message: String,
        fields: BTreeMap<String, String>,
    },
    #[error("unauthorized ({status}): {message}")]
    Unauthorized { status: u16, message: String },
    #[error("API error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("decode error: {0}")]
    Decode(String),
    /// A 2xx reply to a write whose body could not be used. The server may
    /// already have applied the write.
    #[error("unconfirmed write: {0}")]
    Unconfirmed(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Server { status: 404, .. })
    }
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthGrant {
    pub token: BearerToken,
    pub user: SessionUser,
}

/// Operations the client needs from the backend.
///
/// Every call except [`login`](StockiaBackend::login) is authenticated with
/// the caller's bearer token.
#[async_trait]
pub trait StockiaBackend: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<AuthGrant, ApiError>;

    async fn logout(&self, token: &BearerToken) -> Result<(), ApiError>;

    async fn list_products(
        &self,
        token: &BearerToken,
        query: &ProductQuery,
    ) -> Result<Listing<Product>, ApiError>;

    async fn get_product(&self, token: &BearerToken, id: ProductId) -> Result<Product, ApiError>;

    async fn create_product(
        &self,
        token: &BearerToken,
        request: &ProductRequest,
    ) -> Result<Product, ApiError>;

    async fn update_product(
        &self,
        token: &BearerToken,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, ApiError>;

    /// Soft delete.
    async fn delete_product(&self, token: &BearerToken, id: ProductId) -> Result<(), ApiError>;

    async fn restore_product(&self, token: &BearerToken, id: ProductId)
    -> Result<Product, ApiError>;

    async fn create_movement(
        &self,
        token: &BearerToken,
        movement: &MovementRequest,
    ) -> Result<PersistedMovement, ApiError>;

    async fn list_categories(&self, token: &BearerToken) -> Result<Vec<Category>, ApiError>;

    async fn list_customers(
        &self,
        token: &BearerToken,
        query: &CustomerQuery,
    ) -> Result<Listing<Customer>, ApiError>;

    async fn create_customer(
        &self,
        token: &BearerToken,
        request: &CustomerRequest,
    ) -> Result<Customer, ApiError>;

    async fn update_customer(
        &self,
        token: &BearerToken,
        id: CustomerId,
        request: &CustomerRequest,
    ) -> Result<Customer, ApiError>;

    async fn list_suppliers(&self, token: &BearerToken) -> Result<Vec<Supplier>, ApiError>;
}
