//! Wire objects for the checkout APIs and the payment widget.

pub mod checkout;
pub mod widget;

pub use checkout::{
    CreateOrderRequest, GatewayKeyResponse, OrderResponse, Prefill, VerificationResponse,
    VerifyPaymentRequest,
};
pub use widget::{CheckoutOptions, PaymentCompleted, PaymentFailure, Theme, WidgetOutcome};
