//! Checkout API handlers.
//!
//! # Endpoints
//!
//! - `POST /api/create-order`   – resolve the course and create a gateway order
//! - `POST /api/verify-payment` – verify the payment signature, then enroll
//! - `GET  /api/razorpay-key`   – public gateway key for opening the widget
//!
//! Error responses carry a JSON `{success:false, error}` body so clients
//! that branch on the `success` flag fail closed.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use roas_core::catalog::{Course, CourseId};
use roas_core::gateway::{GatewayError, GatewayOrderRequest, OrderNotes, receipt_id};
use roas_sdk::objects::{
    CreateOrderRequest, GatewayKeyResponse, OrderResponse, Prefill, VerificationResponse,
    VerifyPaymentRequest,
};
use roas_sdk::signature::verify_payment_signature;
use serde::Serialize;

use crate::state::AppState;

/// Build the checkout API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/create-order", post(create_order))
        .route("/api/verify-payment", post(verify_payment))
        .route("/api/razorpay-key", get(razorpay_key))
}

/// `POST /api/create-order` — create a gateway order for a course.
///
/// An unknown course id fails before any gateway call.
async fn create_order(
    state: State<AppState>,
    Json(body): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, CheckoutApiError> {
    tracing::info!(course = %body.course_id, email = %body.email, "creating order");

    let catalog = state.catalog.read().await;
    let (course_id, course) = catalog
        .resolve(&body.course_id)
        .map(|(id, course)| (id, course.clone()))
        .ok_or(CheckoutApiError::UnknownCourse)?;
    drop(catalog);

    let order = state
        .gateway
        .create_order(&gateway_order_request(&course_id, &course, &body))
        .await
        .map_err(CheckoutApiError::Gateway)?;

    Ok(Json(OrderResponse {
        success: true,
        order_id: order.id,
        amount: order.amount,
        currency: order.currency,
        key_id: state.gateway.key_id().to_owned(),
        course_name: course.name,
        prefill: Prefill {
            name: body.name,
            email: body.email,
            contact: body.phone,
        },
    }))
}

/// Assemble the gateway order payload for one submission.
///
/// The configured amount flows into the payload unmodified; the customer
/// and course metadata ride along in the order notes.
fn gateway_order_request(
    course_id: &CourseId,
    course: &Course,
    body: &CreateOrderRequest,
) -> GatewayOrderRequest {
    GatewayOrderRequest {
        amount: course.amount,
        currency: course.currency.clone(),
        receipt: receipt_id(),
        notes: OrderNotes {
            course_id: course_id.to_string(),
            course_name: course.name.clone(),
            customer_name: body.name.clone(),
            customer_email: body.email.clone(),
            customer_phone: body.phone.clone(),
        },
    }
}

/// `POST /api/verify-payment` — verify the payment signature.
///
/// On success, post-payment enrollment runs in the background; its
/// failures are logged for operations, never returned to the customer.
async fn verify_payment(
    state: State<AppState>,
    Json(body): Json<VerifyPaymentRequest>,
) -> Result<impl IntoResponse, CheckoutApiError> {
    verify_payment_signature(
        &body.razorpay_order_id,
        &body.razorpay_payment_id,
        &body.razorpay_signature,
        state.gateway.key_secret(),
    )
    .map_err(|_| CheckoutApiError::InvalidSignature)?;

    tracing::info!(
        order = %body.razorpay_order_id,
        payment = %body.razorpay_payment_id,
        "payment signature verified"
    );

    if let Some(graphy) = &state.enrollment {
        match body.course_id.parse::<CourseId>() {
            Ok(course_id) => {
                let graphy = graphy.clone();
                let request = body.clone();
                tokio::spawn(async move {
                    graphy
                        .enroll_after_payment(
                            &request.email,
                            &request.name,
                            &request.phone,
                            &course_id,
                            &request.razorpay_payment_id,
                        )
                        .await;
                });
            }
            Err(e) => {
                tracing::error!(error = %e, "cannot enroll verified payment");
            }
        }
    }

    Ok(Json(VerificationResponse {
        success: true,
        message: Some("Payment verified successfully".to_owned()),
        payment_id: Some(body.razorpay_payment_id),
        order_id: Some(body.razorpay_order_id),
    }))
}

/// `GET /api/razorpay-key` — return the public gateway key id.
async fn razorpay_key(state: State<AppState>) -> impl IntoResponse {
    Json(GatewayKeyResponse {
        key_id: state.gateway.key_id().to_owned(),
    })
}

// ---------------------------------------------------------------------------
// Error handling
// ---------------------------------------------------------------------------

/// Errors that can occur in checkout API handlers.
#[derive(Debug)]
enum CheckoutApiError {
    /// The submitted course id has no catalog entry.
    UnknownCourse,
    /// The submitted payment signature does not match the order.
    InvalidSignature,
    /// The gateway order-creation call failed.
    Gateway(GatewayError),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: &'static str,
}

fn error_response(status: StatusCode, error: &'static str) -> axum::response::Response {
    (
        status,
        Json(ErrorBody {
            success: false,
            error,
        }),
    )
        .into_response()
}

impl IntoResponse for CheckoutApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            CheckoutApiError::UnknownCourse => {
                error_response(StatusCode::BAD_REQUEST, "Invalid course ID")
            }
            CheckoutApiError::InvalidSignature => {
                error_response(StatusCode::BAD_REQUEST, "Invalid payment signature")
            }
            CheckoutApiError::Gateway(e) => {
                tracing::error!(error = %e, "gateway order creation failed");
                error_response(StatusCode::BAD_GATEWAY, "Failed to create order")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roas_core::catalog::CourseCatalog;

    #[test]
    fn order_payload_uses_the_configured_amount() {
        let catalog = CourseCatalog::standard();
        let (id, course) = catalog.resolve("meta-andromeda-base").unwrap();
        let body = CreateOrderRequest {
            course_id: "meta-andromeda-base".to_owned(),
            name: "Asha Rao".to_owned(),
            email: "asha@example.com".to_owned(),
            phone: "+919876543210".to_owned(),
        };

        let request = gateway_order_request(&id, course, &body);

        assert_eq!(request.amount, 1491);
        assert_eq!(request.currency, "INR");
        assert!(request.receipt.starts_with("rcpt_"));
        assert_eq!(request.notes.course_id, "meta-andromeda-base");
        assert_eq!(request.notes.course_name, "Meta Andromeda Base");
        assert_eq!(request.notes.customer_email, "asha@example.com");
    }

    #[test]
    fn error_bodies_fail_closed() {
        let body = ErrorBody {
            success: false,
            error: "Invalid course ID",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Invalid course ID");
    }
}
