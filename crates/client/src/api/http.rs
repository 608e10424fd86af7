//! `reqwest` implementation of [`StockiaBackend`].

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use stockia_core::{CustomerId, ProductId};
use stockia_parties::{Customer, CustomerQuery, CustomerRequest, Supplier};
use stockia_products::{Category, Product, ProductPatch, ProductQuery, ProductRequest};

use super::dto::{LoginResponse, MovementRequest, PersistedMovement};
use super::envelope::{ApiResult, ErrorData, ListPayload, Listing};
use super::{ApiError, AuthGrant, StockiaBackend};
use crate::config::ClientConfig;
use crate::session::{BearerToken, Credentials};

const LOGIN_PATH: &str = "/api/auth/login";
const LOGOUT_PATH: &str = "/api/auth/logout";
const PRODUCTS_PATH: &str = "/api/products";
const CATEGORIES_PATH: &str = "/api/categories";
const CUSTOMERS_PATH: &str = "/api/clients";
const SUPPLIERS_PATH: &str = "/api/suppliers";

/// HTTP client for the Stockia REST API.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    config: ClientConfig,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.config.api_url
    }

    fn url(&self, path: &str) -> String {
        self.config.endpoint(path)
    }

    fn request(&self, method: Method, path: &str, token: Option<&BearerToken>) -> RequestBuilder {
        let url = self.url(path);
        tracing::debug!(method = %method, url = %url, "stockia request");

        let req = self.client.request(method, url);
        match token {
            Some(token) => req.bearer_auth(token.as_str()),
            None => req,
        }
    }

    /// Send and unwrap the `ApiResult` envelope. `Ok(None)` for an empty
    /// body or an envelope without `data`.
    async fn fetch<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<Option<T>, ApiError> {
        let resp = req
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        tracing::debug!(status = status.as_u16(), bytes = body.len(), "stockia response");

        if !status.is_success() {
            return Err(error_from_response(status, &body));
        }
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        let envelope: ApiResult<T> =
            serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))?;
        if !envelope.success {
            return Err(ApiError::Server {
                status: status.as_u16(),
                message: envelope
                    .message
                    .unwrap_or_else(|| "request was not successful".to_string()),
            });
        }
        Ok(envelope.data)
    }

    async fn fetch_data<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        self.fetch(req)
            .await?
            .ok_or_else(|| ApiError::Decode("response carried no data".to_string()))
    }

    async fn fetch_list<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<Vec<T>, ApiError> {
        Ok(self
            .fetch::<ListPayload<T>>(req)
            .await?
            .map(ListPayload::into_items)
            .unwrap_or_default())
    }
}

/// Map a non-2xx response onto [`ApiError`].
pub(crate) fn error_from_response(status: StatusCode, body: &[u8]) -> ApiError {
    let envelope = serde_json::from_slice::<ApiResult<serde_json::Value>>(body).ok();

    let message = envelope
        .as_ref()
        .and_then(|e| e.message.clone())
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

    let fields = envelope
        .and_then(|e| e.data)
        .and_then(|data| serde_json::from_value::<ErrorData>(data).ok())
        .map(|data| data.fields)
        .unwrap_or_default();

    match status {
        StatusCode::BAD_REQUEST if !fields.is_empty() => ApiError::Validation { message, fields },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized {
            status: status.as_u16(),
            message,
        },
        _ => ApiError::Server {
            status: status.as_u16(),
            message,
        },
    }
}

/// Errors raised after a 2xx status mean the write went through but the reply
/// is unusable.
fn unconfirmed_if_accepted(err: ApiError) -> ApiError {
    match err {
        ApiError::Decode(detail) => ApiError::Unconfirmed(detail),
        ApiError::Server { status, message } if (200..300).contains(&status) => {
            ApiError::Unconfirmed(message)
        }
        other => other,
    }
}

#[async_trait]
impl StockiaBackend for HttpBackend {
    async fn login(&self, credentials: &Credentials) -> Result<AuthGrant, ApiError> {
        let req = self.request(Method::POST, LOGIN_PATH, None).json(credentials);
        let resp: LoginResponse = self.fetch_data(req).await?;
        Ok(AuthGrant {
            token: BearerToken::new(resp.token),
            user: resp.user,
        })
    }

    async fn logout(&self, token: &BearerToken) -> Result<(), ApiError> {
        let req = self.request(Method::POST, LOGOUT_PATH, Some(token));
        self.fetch::<serde_json::Value>(req).await.map(|_| ())
    }

    async fn list_products(
        &self,
        token: &BearerToken,
        query: &ProductQuery,
    ) -> Result<Listing<Product>, ApiError> {
        let req = self
            .request(Method::GET, PRODUCTS_PATH, Some(token))
            .query(&query.to_query_pairs());
        let payload: Option<ListPayload<Product>> = self.fetch(req).await?;
        Ok(payload
            .map(|p| p.into_listing(query.page, query.size))
            .unwrap_or_else(|| Listing::complete(Vec::new())))
    }

    async fn get_product(&self, token: &BearerToken, id: ProductId) -> Result<Product, ApiError> {
        let req = self.request(Method::GET, &format!("{PRODUCTS_PATH}/{id}"), Some(token));
        self.fetch_data(req).await
    }

    async fn create_product(
        &self,
        token: &BearerToken,
        request: &ProductRequest,
    ) -> Result<Product, ApiError> {
        let req = self
            .request(Method::POST, PRODUCTS_PATH, Some(token))
            .json(request);
        self.fetch_data(req).await
    }

    async fn update_product(
        &self,
        token: &BearerToken,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, ApiError> {
        let req = self
            .request(Method::PUT, &format!("{PRODUCTS_PATH}/{id}"), Some(token))
            .json(patch);
        self.fetch_data(req).await
    }

    async fn delete_product(&self, token: &BearerToken, id: ProductId) -> Result<(), ApiError> {
        let req = self.request(Method::DELETE, &format!("{PRODUCTS_PATH}/{id}"), Some(token));
        self.fetch::<serde_json::Value>(req).await.map(|_| ())
    }

    async fn restore_product(
        &self,
        token: &BearerToken,
        id: ProductId,
    ) -> Result<Product, ApiError> {
        let req = self.request(
            Method::PATCH,
            &format!("{PRODUCTS_PATH}/{id}/restore"),
            Some(token),
        );
        self.fetch_data(req).await
    }

    async fn create_movement(
        &self,
        token: &BearerToken,
        movement: &MovementRequest,
    ) -> Result<PersistedMovement, ApiError> {
        let req = self
            .request(Method::POST, &self.config.movements_path, Some(token))
            .json(movement);
        self.fetch_data(req).await.map_err(unconfirmed_if_accepted)
    }

    async fn list_categories(&self, token: &BearerToken) -> Result<Vec<Category>, ApiError> {
        let req = self.request(Method::GET, CATEGORIES_PATH, Some(token));
        self.fetch_list(req).await
    }

    async fn list_customers(
        &self,
        token: &BearerToken,
        query: &CustomerQuery,
    ) -> Result<Listing<Customer>, ApiError> {
        let req = self
            .request(Method::GET, CUSTOMERS_PATH, Some(token))
            .query(&query.to_query_pairs());
        let payload: Option<ListPayload<Customer>> = self.fetch(req).await?;
        Ok(payload
            .map(|p| p.into_listing(query.page, query.size))
            .unwrap_or_else(|| Listing::complete(Vec::new())))
    }

    async fn create_customer(
        &self,
        token: &BearerToken,
        request: &CustomerRequest,
    ) -> Result<Customer, ApiError> {
        let req = self
            .request(Method::POST, CUSTOMERS_PATH, Some(token))
            .json(request);
        self.fetch_data(req).await
    }

    async fn update_customer(
        &self,
        token: &BearerToken,
        id: CustomerId,
        request: &CustomerRequest,
    ) -> Result<Customer, ApiError> {
        let req = self
            .request(Method::PUT, &format!("{CUSTOMERS_PATH}/{id}"), Some(token))
            .json(request);
        self.fetch_data(req).await
    }

    async fn list_suppliers(&self, token: &BearerToken) -> Result<Vec<Supplier>, ApiError> {
        let req = self.request(Method::GET, SUPPLIERS_PATH, Some(token));
        self.fetch_list(req).await
    }
}
