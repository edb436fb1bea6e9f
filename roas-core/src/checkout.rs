//! The checkout orchestrator.
//!
//! Drives one course purchase end to end: validate the customer's
//! details, resolve the course, create an order on the backend, collect
//! the payment through the hosted widget, then have the backend verify
//! the payment signature. The flow is strictly sequential with two
//! failure exits (order rejected, verification rejected) and one success
//! exit (redirect to the course's thank-you page).
//!
//! The backend and the widget are injected ports so the sequencing and
//! validation logic is testable without a live gateway.

use async_trait::async_trait;
use roas_sdk::objects::{
    CheckoutOptions, CreateOrderRequest, OrderResponse, PaymentFailure, Theme,
    VerificationResponse, VerifyPaymentRequest, WidgetOutcome,
};

use crate::catalog::CourseCatalog;
use crate::client::ApiError;

/// Merchant display name shown in the payment widget header.
pub const MERCHANT_DISPLAY_NAME: &str = "ROAS School of Marketing";

/// Widget accent color.
pub const THEME_COLOR: &str = "#6366f1";

/// Backend port: the two checkout endpoints.
#[async_trait]
pub trait OrderApi: Send + Sync {
    async fn create_order(&self, request: &CreateOrderRequest) -> Result<OrderResponse, ApiError>;

    async fn verify_payment(
        &self,
        request: &VerifyPaymentRequest,
    ) -> Result<VerificationResponse, ApiError>;
}

/// Payment-widget port.
///
/// The implementation owns all payment-sensitive interaction; checkout
/// only hands it the options and consumes the single terminal outcome.
#[async_trait]
pub trait PaymentWidget: Send + Sync {
    async fn collect(&self, options: CheckoutOptions) -> WidgetOutcome;
}

/// Customer contact details as entered, one set per submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDetails {
    pub full_name: String,
    pub country_code: String,
    pub phone_number: String,
    pub email: String,
}

/// Trimmed, validated contact fields ready for the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Contact {
    name: String,
    email: String,
    phone: String,
}

impl CustomerDetails {
    fn validate(&self) -> Result<Contact, CheckoutError> {
        let name = self.full_name.trim();
        let number = self.phone_number.trim();
        let email = self.email.trim();

        if name.is_empty() || number.is_empty() || email.is_empty() {
            return Err(CheckoutError::MissingFields);
        }
        if !is_valid_email(email) {
            return Err(CheckoutError::InvalidEmail);
        }

        Ok(Contact {
            name: name.to_owned(),
            email: email.to_owned(),
            phone: format!("{}{}", self.country_code.trim(), number),
        })
    }
}

/// Check an email address against the `local@domain.tld` shape: a
/// non-empty run without whitespace or `@`, an `@`, another such run, a
/// `.`, and a non-empty trailing run.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    // The domain needs a dot with at least one character on each side.
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Branding applied to the payment widget.
#[derive(Debug, Clone)]
pub struct Branding {
    pub display_name: String,
    pub theme_color: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            display_name: MERCHANT_DISPLAY_NAME.to_owned(),
            theme_color: THEME_COLOR.to_owned(),
        }
    }
}

/// Success outcomes of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Payment verified; navigate to the course's thank-you page.
    Redirect(String),
    /// The customer closed the widget without paying. Not an error; the
    /// flow simply ends.
    Dismissed,
}

/// Everything that can stop a submission.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("required contact fields are missing")]
    MissingFields,
    #[error("invalid email address")]
    InvalidEmail,
    #[error("unknown course: {0:?}")]
    UnknownCourse(String),
    #[error("order creation rejected by the backend")]
    OrderRejected,
    #[error("payment failed in the gateway widget")]
    PaymentFailed(PaymentFailure),
    #[error("payment signature verification rejected")]
    VerificationRejected,
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl CheckoutError {
    /// The message to surface to the customer, decoupled from how the
    /// UI layer chooses to present it.
    pub fn user_message(&self) -> &'static str {
        match self {
            CheckoutError::MissingFields => "Please fill in all required fields.",
            CheckoutError::InvalidEmail => "Please enter a valid email address.",
            CheckoutError::UnknownCourse(_) => "Invalid course selection.",
            CheckoutError::OrderRejected => "Failed to create order. Please try again.",
            CheckoutError::PaymentFailed(_) => "Payment failed. Please try again.",
            CheckoutError::VerificationRejected => {
                "Payment verification failed. Please contact support."
            }
            CheckoutError::Api(_) => "An error occurred. Please try again.",
        }
    }
}

/// The checkout flow over an injected backend and widget.
pub struct CheckoutFlow<A, W> {
    catalog: CourseCatalog,
    branding: Branding,
    api: A,
    widget: W,
}

impl<A: OrderApi, W: PaymentWidget> CheckoutFlow<A, W> {
    pub fn new(catalog: CourseCatalog, api: A, widget: W) -> Self {
        Self {
            catalog,
            branding: Branding::default(),
            api,
            widget,
        }
    }

    pub fn with_branding(mut self, branding: Branding) -> Self {
        self.branding = branding;
        self
    }

    /// Run one submission to a terminal outcome.
    ///
    /// Validation failures and an unknown course id return before any
    /// network call. A verification rejection after a debited payment is
    /// a deliberate hand-off to human support; nothing is retried.
    pub async fn submit_payment(
        &self,
        course_id: &str,
        details: &CustomerDetails,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        let contact = details.validate()?;

        let (course_id, course) = self
            .catalog
            .resolve(course_id)
            .ok_or_else(|| CheckoutError::UnknownCourse(course_id.to_owned()))?;

        let order = self
            .api
            .create_order(&CreateOrderRequest {
                course_id: course_id.to_string(),
                name: contact.name.clone(),
                email: contact.email.clone(),
                phone: contact.phone.clone(),
            })
            .await?;

        if !order.success {
            return Err(CheckoutError::OrderRejected);
        }

        tracing::info!(course = %course_id, order = %order.order_id, "order created, opening widget");

        let options = CheckoutOptions {
            key: order.key_id,
            amount: order.amount,
            currency: order.currency,
            name: self.branding.display_name.clone(),
            description: order.course_name,
            order_id: order.order_id,
            prefill: order.prefill,
            theme: Theme {
                color: self.branding.theme_color.clone(),
            },
        };

        let completed = match self.widget.collect(options).await {
            WidgetOutcome::Dismissed => {
                tracing::info!(course = %course_id, "payment widget dismissed");
                return Ok(CheckoutOutcome::Dismissed);
            }
            WidgetOutcome::Failed(failure) => {
                tracing::warn!(course = %course_id, error = %failure.error, "payment failed in widget");
                return Err(CheckoutError::PaymentFailed(failure));
            }
            WidgetOutcome::Completed(completed) => completed,
        };

        let verification = self
            .api
            .verify_payment(&VerifyPaymentRequest {
                razorpay_order_id: completed.razorpay_order_id,
                razorpay_payment_id: completed.razorpay_payment_id,
                razorpay_signature: completed.razorpay_signature,
                course_id: course_id.to_string(),
                name: contact.name,
                email: contact.email,
                phone: contact.phone,
            })
            .await?;

        if verification.success {
            Ok(CheckoutOutcome::Redirect(course.thank_you_page.clone()))
        } else {
            Err(CheckoutError::VerificationRejected)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roas_sdk::objects::{PaymentCompleted, Prefill};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct RecordingApi {
        order_success: bool,
        verify_success: bool,
        create_calls: AtomicUsize,
        verify_calls: AtomicUsize,
        last_create: Mutex<Option<CreateOrderRequest>>,
        last_verify: Mutex<Option<VerifyPaymentRequest>>,
    }

    impl RecordingApi {
        fn accepting() -> Self {
            Self {
                order_success: true,
                verify_success: true,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl OrderApi for RecordingApi {
        async fn create_order(
            &self,
            request: &CreateOrderRequest,
        ) -> Result<OrderResponse, ApiError> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_create.lock().unwrap() = Some(request.clone());
            Ok(OrderResponse {
                success: self.order_success,
                order_id: "order_3Eg3H5Tqq0001".to_owned(),
                amount: 1491,
                currency: "INR".to_owned(),
                key_id: "rzp_test_k3y".to_owned(),
                course_name: "Meta Andromeda Base".to_owned(),
                prefill: Prefill {
                    name: request.name.clone(),
                    email: request.email.clone(),
                    contact: request.phone.clone(),
                },
            })
        }

        async fn verify_payment(
            &self,
            request: &VerifyPaymentRequest,
        ) -> Result<VerificationResponse, ApiError> {
            self.verify_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_verify.lock().unwrap() = Some(request.clone());
            Ok(VerificationResponse {
                success: self.verify_success,
                message: None,
                payment_id: Some(request.razorpay_payment_id.clone()),
                order_id: Some(request.razorpay_order_id.clone()),
            })
        }
    }

    struct ScriptedWidget {
        outcome: WidgetOutcome,
        opens: AtomicUsize,
        last_options: Mutex<Option<CheckoutOptions>>,
    }

    impl ScriptedWidget {
        fn new(outcome: WidgetOutcome) -> Self {
            Self {
                outcome,
                opens: AtomicUsize::new(0),
                last_options: Mutex::new(None),
            }
        }

        fn completing() -> Self {
            Self::new(WidgetOutcome::Completed(PaymentCompleted {
                razorpay_order_id: "order_3Eg3H5Tqq0001".to_owned(),
                razorpay_payment_id: "pay_29QQoUBi66xm2f".to_owned(),
                razorpay_signature: "0badc0de".to_owned(),
            }))
        }
    }

    #[async_trait]
    impl PaymentWidget for ScriptedWidget {
        async fn collect(&self, options: CheckoutOptions) -> WidgetOutcome {
            self.opens.fetch_add(1, Ordering::SeqCst);
            *self.last_options.lock().unwrap() = Some(options);
            self.outcome.clone()
        }
    }

    fn details() -> CustomerDetails {
        CustomerDetails {
            full_name: "Asha Rao".to_owned(),
            country_code: "+91".to_owned(),
            phone_number: "9876543210".to_owned(),
            email: "asha@example.com".to_owned(),
        }
    }

    fn flow(api: RecordingApi, widget: ScriptedWidget) -> CheckoutFlow<RecordingApi, ScriptedWidget> {
        CheckoutFlow::new(CourseCatalog::standard(), api, widget)
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a@b.c"));
        assert!(is_valid_email("first.last@mail.example.com"));
        assert!(!is_valid_email("abc"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a@b."));
        assert!(!is_valid_email("a@.c"));
        assert!(!is_valid_email("a@@b.c"));
        assert!(!is_valid_email("a b@c.d"));
    }

    #[tokio::test]
    async fn unknown_course_stops_before_any_network_call() {
        let checkout = flow(RecordingApi::accepting(), ScriptedWidget::completing());

        let err = checkout
            .submit_payment("sales-funnel-masterclass", &details())
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::UnknownCourse(_)));
        assert_eq!(err.user_message(), "Invalid course selection.");
        assert_eq!(checkout.api.create_calls.load(Ordering::SeqCst), 0);
        assert_eq!(checkout.widget.opens.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn blank_fields_block_the_submission() {
        let checkout = flow(RecordingApi::accepting(), ScriptedWidget::completing());
        let blank = CustomerDetails {
            full_name: "   ".to_owned(),
            ..details()
        };

        let err = checkout
            .submit_payment("meta-andromeda-base", &blank)
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::MissingFields));
        assert_eq!(err.user_message(), "Please fill in all required fields.");
        assert_eq!(checkout.api.create_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn malformed_email_blocks_the_submission() {
        let checkout = flow(RecordingApi::accepting(), ScriptedWidget::completing());
        let bad_email = CustomerDetails {
            email: "asha@example".to_owned(),
            ..details()
        };

        let err = checkout
            .submit_payment("meta-andromeda-base", &bad_email)
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::InvalidEmail));
        assert_eq!(err.user_message(), "Please enter a valid email address.");
        assert_eq!(checkout.api.create_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn rejected_order_never_opens_the_widget() {
        let api = RecordingApi {
            order_success: false,
            ..RecordingApi::default()
        };
        let checkout = flow(api, ScriptedWidget::completing());

        let err = checkout
            .submit_payment("meta-andromeda-base", &details())
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::OrderRejected));
        assert_eq!(err.user_message(), "Failed to create order. Please try again.");
        assert_eq!(checkout.api.create_calls.load(Ordering::SeqCst), 1);
        assert_eq!(checkout.widget.opens.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn verified_payment_redirects_to_the_thank_you_page() {
        let checkout = flow(RecordingApi::accepting(), ScriptedWidget::completing());

        let outcome = checkout
            .submit_payment("meta-andromeda-base", &details())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            CheckoutOutcome::Redirect("/master-creative-targeting/base-plan/thankyou".to_owned())
        );

        // The verification request carries both the gateway identifiers
        // and the original submission.
        let verify = checkout.api.last_verify.lock().unwrap().clone().unwrap();
        assert_eq!(verify.razorpay_payment_id, "pay_29QQoUBi66xm2f");
        assert_eq!(verify.course_id, "meta-andromeda-base");
        assert_eq!(verify.name, "Asha Rao");
        assert_eq!(verify.phone, "+919876543210");
    }

    #[tokio::test]
    async fn widget_options_come_from_the_order_response() {
        let checkout = flow(RecordingApi::accepting(), ScriptedWidget::completing());

        checkout
            .submit_payment("meta-andromeda-base", &details())
            .await
            .unwrap();

        let options = checkout.widget.last_options.lock().unwrap().clone().unwrap();
        assert_eq!(options.key, "rzp_test_k3y");
        assert_eq!(options.amount, 1491);
        assert_eq!(options.order_id, "order_3Eg3H5Tqq0001");
        assert_eq!(options.name, MERCHANT_DISPLAY_NAME);
        assert_eq!(options.description, "Meta Andromeda Base");
        assert_eq!(options.theme.color, THEME_COLOR);
        assert_eq!(options.prefill.contact, "+919876543210");
    }

    #[tokio::test]
    async fn rejected_verification_is_a_support_handoff() {
        let api = RecordingApi {
            order_success: true,
            verify_success: false,
            ..RecordingApi::default()
        };
        let checkout = flow(api, ScriptedWidget::completing());

        let err = checkout
            .submit_payment("meta-andromeda-base", &details())
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::VerificationRejected));
        assert_eq!(
            err.user_message(),
            "Payment verification failed. Please contact support."
        );
        assert_eq!(checkout.api.verify_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn dismissed_widget_ends_the_flow_without_error() {
        let checkout = flow(
            RecordingApi::accepting(),
            ScriptedWidget::new(WidgetOutcome::Dismissed),
        );

        let outcome = checkout
            .submit_payment("meta-andromeda-base", &details())
            .await
            .unwrap();

        assert_eq!(outcome, CheckoutOutcome::Dismissed);
        assert_eq!(checkout.api.verify_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn widget_failure_is_not_verified() {
        let checkout = flow(
            RecordingApi::accepting(),
            ScriptedWidget::new(WidgetOutcome::Failed(PaymentFailure {
                error: serde_json::json!({"code": "BAD_REQUEST_ERROR"}),
            })),
        );

        let err = checkout
            .submit_payment("meta-andromeda-base", &details())
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::PaymentFailed(_)));
        assert_eq!(err.user_message(), "Payment failed. Please try again.");
        assert_eq!(checkout.api.verify_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn contact_fields_are_trimmed_onto_the_wire() {
        let checkout = flow(RecordingApi::accepting(), ScriptedWidget::completing());
        let padded = CustomerDetails {
            full_name: "  Asha Rao  ".to_owned(),
            country_code: "+91".to_owned(),
            phone_number: " 9876543210 ".to_owned(),
            email: " asha@example.com ".to_owned(),
        };

        checkout
            .submit_payment("meta-andromeda-base", &padded)
            .await
            .unwrap();

        let create = checkout.api.last_create.lock().unwrap().clone().unwrap();
        assert_eq!(create.name, "Asha Rao");
        assert_eq!(create.email, "asha@example.com");
        assert_eq!(create.phone, "+919876543210");
    }
}
