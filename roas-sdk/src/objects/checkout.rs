//! Request and response bodies for the two checkout endpoints.

use serde::{Deserialize, Serialize};

/// Request payload for `POST /api/create-order`.
///
/// Sent by the checkout client once the customer's details have been
/// validated and the course resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub course_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Contact fields echoed back by the server so the payment widget can
/// prefill its form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefill {
    pub name: String,
    pub email: String,
    pub contact: String,
}

/// Response returned by `POST /api/create-order`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
    /// Whether the order was created. Clients must not open the payment
    /// widget when this is `false`.
    pub success: bool,
    /// Gateway order identifier (e.g. `order_...`).
    pub order_id: String,
    /// Amount in minor currency units, exactly as configured for the course.
    pub amount: u64,
    /// ISO currency code (e.g. `INR`).
    pub currency: String,
    /// Public gateway key for opening the widget.
    pub key_id: String,
    /// Display name of the purchased course.
    pub course_name: String,
    pub prefill: Prefill,
}

/// Request payload for `POST /api/verify-payment`.
///
/// Carries the identifiers the widget's success callback produced plus
/// the original submission so the server can record the enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyPaymentRequest {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
    pub course_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Response returned by `POST /api/verify-payment`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResponse {
    /// Whether the payment signature matched the created order.
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
}

/// Response returned by `GET /api/razorpay-key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayKeyResponse {
    pub key_id: String,
}
