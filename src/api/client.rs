//! HTTP client for the marketplace API.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::{
    api::{
        error::ApiError,
        models::{
            NewProduct, NewUser, Order, OrderRequest, Product, ProductQuery, ProductUpdate, User,
            UserUpdate,
        },
    },
    checkout::OrderGateway,
    config::ApiConfig,
};

/// Typed client over the marketplace REST endpoints.
#[derive(Debug, Clone)]
pub struct MarketClient {
    base_url: String,
    http: Client,
}

impl MarketClient {
    /// Create a client from the given configuration.
    ///
    /// Every request carries the configured timeout, so a hung call fails
    /// with [`ApiError::Network`] instead of blocking forever.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// List all users.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or a non-2xx response.
    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let response = self.http.get(self.url("/users")).send().await?;
        Self::decode(response).await
    }

    /// Fetch a single user.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or a non-2xx response.
    pub async fn get_user(&self, id: &str) -> Result<User, ApiError> {
        let response = self.http.get(self.url(&format!("/users/{id}"))).send().await?;
        Self::decode(response).await
    }

    /// Create a user.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or a non-2xx response.
    pub async fn create_user(&self, user: &NewUser) -> Result<User, ApiError> {
        let response = self.http.post(self.url("/users")).json(user).send().await?;
        Self::decode(response).await
    }

    /// Update a user's name and/or email.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or a non-2xx response.
    pub async fn update_user(&self, id: &str, update: &UserUpdate) -> Result<User, ApiError> {
        let response = self
            .http
            .patch(self.url(&format!("/users/{id}")))
            .json(update)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// List products, optionally filtered by category and/or seller.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or a non-2xx response.
    pub async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, ApiError> {
        let response = self
            .http
            .get(self.url("/products"))
            .query(&query.pairs())
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Fetch a single product.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or a non-2xx response.
    pub async fn get_product(&self, id: &str) -> Result<Product, ApiError> {
        let response = self
            .http
            .get(self.url(&format!("/products/{id}")))
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Create a product in a seller's catalogue.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or a non-2xx response.
    pub async fn create_product(&self, product: &NewProduct) -> Result<Product, ApiError> {
        let response = self
            .http
            .post(self.url("/products"))
            .json(product)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Update fields of an existing product.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or a non-2xx response.
    pub async fn update_product(
        &self,
        id: &str,
        update: &ProductUpdate,
    ) -> Result<Product, ApiError> {
        let response = self
            .http
            .patch(self.url(&format!("/products/{id}")))
            .json(update)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or a non-2xx response.
    pub async fn delete_product(&self, id: &str) -> Result<(), ApiError> {
        let response = self
            .http
            .delete(self.url(&format!("/products/{id}")))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// List orders, optionally restricted to one buyer.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or a non-2xx response.
    pub async fn list_orders(&self, buyer_id: Option<&str>) -> Result<Vec<Order>, ApiError> {
        let mut request = self.http.get(self.url("/orders"));
        if let Some(buyer_id) = buyer_id {
            request = request.query(&[("buyerId", buyer_id)]);
        }

        let response = request.send().await?;
        Self::decode(response).await
    }

    /// Create an order.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure or a non-2xx response;
    /// the server validates stock and pricing.
    pub async fn create_order(&self, request: &OrderRequest) -> Result<Order, ApiError> {
        tracing::debug!(
            buyer_id = %request.buyer_id,
            lines = request.items.len(),
            "submitting order"
        );

        let response = self
            .http
            .post(self.url("/orders"))
            .json(request)
            .send()
            .await?;
        Self::decode(response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<RemoteMessage>().await {
            Ok(body) => body.message,
            Err(_) => format!("request failed with status {status}"),
        };

        Err(ApiError::Remote { status, message })
    }
}

#[async_trait]
impl OrderGateway for MarketClient {
    async fn submit_order(&self, request: &OrderRequest) -> Result<Order, ApiError> {
        self.create_order(request).await
    }
}

#[derive(Debug, Deserialize)]
struct RemoteMessage {
    message: String,
}
