//! Payloads exchanged with the hosted payment widget.
//!
//! The widget is an external capability: checkout hands it a
//! [`CheckoutOptions`] and receives exactly one [`WidgetOutcome`] per
//! opened session. Everything payment-sensitive (card entry, 3-D secure,
//! gateway traffic) happens inside the widget.

use serde::{Deserialize, Serialize};

/// Options used to open the payment widget for one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutOptions {
    /// Public gateway key.
    pub key: String,
    /// Amount in minor currency units.
    pub amount: u64,
    pub currency: String,
    /// Merchant display name shown in the widget header.
    pub name: String,
    /// Line-item description (the course name).
    pub description: String,
    /// Gateway order this payment is collected against.
    pub order_id: String,
    pub prefill: super::Prefill,
    pub theme: Theme,
}

/// Widget theming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    /// Accent color as a hex string, e.g. `#6366f1`.
    pub color: String,
}

/// Identifiers delivered by the widget's success callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentCompleted {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

/// Error payload delivered by the widget's `payment.failed` callback.
///
/// The gateway's error object is opaque to us; it is kept as raw JSON
/// for logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentFailure {
    pub error: serde_json::Value,
}

/// Terminal outcome of one widget session.
///
/// The widget contract guarantees at most one of `Completed` / `Failed`
/// per session; `Dismissed` fires only when the customer closes the
/// widget without paying.
#[derive(Debug, Clone)]
pub enum WidgetOutcome {
    Completed(PaymentCompleted),
    Failed(PaymentFailure),
    Dismissed,
}
