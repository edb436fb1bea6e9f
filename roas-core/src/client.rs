//! Typed HTTP client for the checkout API.
//!
//! [`CheckoutApiClient`] is the [`OrderApi`] implementation used against
//! a running checkout server.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;

use crate::checkout::OrderApi;
use roas_sdk::objects::{
    CreateOrderRequest, OrderResponse, VerificationResponse, VerifyPaymentRequest,
};

/// Default timeout for checkout API requests.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Errors produced by the HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Transport-level failure (DNS, TLS, connection reset, timeout).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("api error: status {status}, body: {body}")]
    Api { status: StatusCode, body: String },

    /// Response body could not be deserialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The base URL could not be joined with the endpoint path.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

/// HTTP client for the checkout server's `/api` endpoints.
#[derive(Debug, Clone)]
pub struct CheckoutApiClient {
    http: Client,
    base_url: Url,
}

impl CheckoutApiClient {
    /// Create a client against the given server root URL
    /// (e.g. `https://school.example.com`).
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure a proxy).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: serde::Serialize,
        T: serde::de::DeserializeOwned,
    {
        let url = self.base_url.join(path)?;
        let resp = self.http.post(url).json(body).send().await?;
        parse_response(resp).await
    }
}

#[async_trait]
impl OrderApi for CheckoutApiClient {
    /// `POST /api/create-order` — create a gateway order for a course.
    async fn create_order(&self, request: &CreateOrderRequest) -> Result<OrderResponse, ApiError> {
        self.post_json("/api/create-order", request).await
    }

    /// `POST /api/verify-payment` — verify a completed payment's signature.
    async fn verify_payment(
        &self,
        request: &VerifyPaymentRequest,
    ) -> Result<VerificationResponse, ApiError> {
        self.post_json("/api/verify-payment", request).await
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ApiError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ApiError::Api { status, body });
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(ApiError::Json)
}
