//! Razorpay orders REST client.
//!
//! The server calls this to create a payment intent ("order") before the
//! widget is opened. Only the orders endpoint is wrapped; everything
//! after order creation happens between the widget and the gateway.

use serde::{Deserialize, Serialize};
use url::Url;

/// Default Razorpay API root.
pub const DEFAULT_API_BASE: &str = "https://api.razorpay.com/v1/";

/// Request timeout for gateway calls.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Errors produced by the gateway client.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway returned a non-2xx status code.
    #[error("gateway error: status {status}, body: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

/// Order-creation payload for `POST /v1/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewayOrderRequest {
    /// Amount in minor currency units.
    pub amount: u64,
    pub currency: String,
    /// Merchant receipt identifier, unique per order.
    pub receipt: String,
    pub notes: OrderNotes,
}

/// Course and customer metadata attached to the gateway order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderNotes {
    pub course_id: String,
    pub course_name: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
}

/// The subset of the gateway's order object the checkout flow needs.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayOrder {
    /// Gateway order identifier (`order_...`).
    pub id: String,
    pub amount: u64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Build a receipt identifier from the current unix timestamp.
pub fn receipt_id() -> String {
    format!(
        "rcpt_{}",
        time::OffsetDateTime::now_utc().unix_timestamp()
    )
}

/// Authenticated client for the Razorpay orders API.
#[derive(Debug, Clone)]
pub struct RazorpayClient {
    http: reqwest::Client,
    base_url: Url,
    key_id: String,
    key_secret: String,
}

impl RazorpayClient {
    pub fn new(base_url: Url, key_id: impl Into<String>, key_secret: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            base_url,
            key_id: key_id.into(),
            key_secret: key_secret.into(),
        }
    }

    /// The public key id, handed to clients for opening the widget.
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// The key secret, used for payment-signature verification.
    pub fn key_secret(&self) -> &[u8] {
        self.key_secret.as_bytes()
    }

    /// `POST /v1/orders` — create a gateway order.
    pub async fn create_order(
        &self,
        request: &GatewayOrderRequest,
    ) -> Result<GatewayOrder, GatewayError> {
        let url = self.base_url.join("orders")?;

        let resp = self
            .http
            .post(url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GatewayError::Api { status, body });
        }

        let bytes = resp.bytes().await?;
        let order: GatewayOrder = serde_json::from_slice(&bytes)?;

        tracing::info!(order = %order.id, amount = order.amount, "gateway order created");
        Ok(order)
    }
}
