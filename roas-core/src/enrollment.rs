//! Graphy platform enrollment client.
//!
//! After a verified payment the customer is provisioned on the Graphy
//! learning platform: create a learner account, then enroll it in the
//! purchased course while recording the external payment id. Enrollment
//! failures are an operations concern, never surfaced to the paying
//! customer.

use std::collections::HashMap;
use url::Url;

use crate::catalog::CourseId;

/// Default Graphy public API root.
pub const DEFAULT_API_BASE: &str = "https://api.ongraphy.com/public/v1/";

/// Request timeout for Graphy calls.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Errors produced by the enrollment client.
#[derive(Debug, thiserror::Error)]
pub enum EnrollmentError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Graphy reported an error for the call.
    #[error("graphy {endpoint} error: {message}")]
    Api { endpoint: &'static str, message: String },

    /// The purchased course has no mapped Graphy product id.
    #[error("no graphy product id mapped for course {0}")]
    NoProduct(CourseId),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

impl EnrollmentError {
    /// Whether this failure looks like a phone-number conflict, in which
    /// case learner creation is worth retrying without the phone.
    fn is_phone_conflict(&self) -> bool {
        match self {
            EnrollmentError::Api { message, .. } => {
                let message = message.to_lowercase();
                message.contains("mobile number is already registered")
                    || message.contains("phone")
            }
            _ => false,
        }
    }
}

/// What the post-payment enrollment achieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrollmentReport {
    pub learner_created: bool,
    pub course_assigned: bool,
}

/// Clean a phone number down to a single country-code prefix.
///
/// Handles inputs like `+91+919064292887`; bare 10-digit numbers are
/// assumed to be Indian and get a `+91` prefix.
pub fn sanitize_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return String::new();
    }
    let digits = if digits.starts_with("91") && digits.len() > 10 {
        digits[digits.len() - 10..].to_owned()
    } else {
        digits
    };
    if digits.len() == 10 {
        return format!("+91{digits}");
    }
    if phone.starts_with('+') && digits.len() > 10 {
        return format!("+{digits}");
    }
    format!("+{digits}")
}

/// Authenticated client for the Graphy public API.
#[derive(Debug, Clone)]
pub struct GraphyClient {
    http: reqwest::Client,
    base_url: Url,
    mid: String,
    api_key: String,
    /// Course id → Graphy product id.
    products: HashMap<CourseId, String>,
}

impl GraphyClient {
    pub fn new(
        base_url: Url,
        mid: impl Into<String>,
        api_key: impl Into<String>,
        products: HashMap<CourseId, String>,
    ) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            base_url,
            mid: mid.into(),
            api_key: api_key.into(),
            products,
        }
    }

    /// `POST /learners` — create a learner account.
    ///
    /// Graphy sends the welcome email itself (`sendEmail=true`).
    pub async fn create_learner(
        &self,
        email: &str,
        name: &str,
        phone: Option<&str>,
    ) -> Result<(), EnrollmentError> {
        let mut form: Vec<(&str, String)> = vec![
            ("mid", self.mid.clone()),
            ("key", self.api_key.clone()),
            ("email", email.to_owned()),
            ("name", name.to_owned()),
            ("sendEmail", "true".to_owned()),
        ];
        if let Some(mobile) = phone.map(sanitize_phone).filter(|p| !p.is_empty()) {
            form.push(("mobile", mobile));
        }

        self.post_form("learners", &form).await
    }

    /// `POST /assign` — enroll a learner in a course and record the
    /// external payment.
    pub async fn assign_course(
        &self,
        email: &str,
        course_id: &CourseId,
        payment_id: &str,
        phone: Option<&str>,
    ) -> Result<(), EnrollmentError> {
        let product_id = self
            .products
            .get(course_id)
            .ok_or_else(|| EnrollmentError::NoProduct(course_id.clone()))?;

        let mut form: Vec<(&str, String)> = vec![
            ("mid", self.mid.clone()),
            ("key", self.api_key.clone()),
            ("email", email.to_owned()),
            ("productId", product_id.clone()),
            ("extPG", "razorpay".to_owned()),
            ("extPaymentId", payment_id.to_owned()),
        ];
        if let Some(clean) = phone.map(sanitize_phone).filter(|p| !p.is_empty()) {
            form.push(("phone", clean));
        }

        self.post_form("assign", &form).await
    }

    /// Full post-payment flow: create the learner, then enroll them.
    ///
    /// A phone-conflict on learner creation is retried once without the
    /// phone; any other creation failure still proceeds to enrollment,
    /// since the learner may already exist from a previous purchase.
    pub async fn enroll_after_payment(
        &self,
        email: &str,
        name: &str,
        phone: &str,
        course_id: &CourseId,
        payment_id: &str,
    ) -> EnrollmentReport {
        let learner_created = match self.create_learner(email, name, Some(phone)).await {
            Ok(()) => true,
            Err(e) if e.is_phone_conflict() => {
                tracing::warn!(email, error = %e, "phone conflict, retrying learner creation without phone");
                match self.create_learner(email, name, None).await {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::warn!(email, error = %e, "learner creation failed, attempting enrollment anyway");
                        false
                    }
                }
            }
            Err(e) => {
                tracing::warn!(email, error = %e, "learner creation failed, attempting enrollment anyway");
                false
            }
        };

        let course_assigned = match self
            .assign_course(email, course_id, payment_id, Some(phone))
            .await
        {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(email, course = %course_id, error = %e, "graphy enrollment failed");
                false
            }
        };

        if course_assigned {
            tracing::info!(email, course = %course_id, "graphy enrollment complete");
        }

        EnrollmentReport {
            learner_created,
            course_assigned,
        }
    }

    async fn post_form(
        &self,
        endpoint: &'static str,
        form: &[(&str, String)],
    ) -> Result<(), EnrollmentError> {
        let url = self.base_url.join(endpoint)?;
        let resp = self.http.post(url).form(form).send().await?;

        let status = resp.status();
        let body: serde_json::Value = resp.json().await.unwrap_or_default();

        if status.is_success() && body.get("error").is_none() {
            tracing::info!(endpoint, %status, "graphy call succeeded");
            return Ok(());
        }

        let message = body
            .pointer("/error/message")
            .and_then(|m| m.as_str())
            .map(str::to_owned)
            .unwrap_or_else(|| body.to_string());

        Err(EnrollmentError::Api { endpoint, message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_collapses_duplicate_country_codes() {
        assert_eq!(sanitize_phone("+91+919064292887"), "+919064292887");
    }

    #[test]
    fn sanitize_prefixes_bare_ten_digit_numbers() {
        assert_eq!(sanitize_phone("9064292887"), "+919064292887");
    }

    #[test]
    fn sanitize_keeps_foreign_numbers() {
        assert_eq!(sanitize_phone("+14155552671"), "+14155552671");
    }

    #[test]
    fn sanitize_strips_formatting() {
        assert_eq!(sanitize_phone("+91 90642-92887"), "+919064292887");
    }

    #[test]
    fn sanitize_empty_input() {
        assert_eq!(sanitize_phone(""), "");
        assert_eq!(sanitize_phone("n/a"), "");
    }

    #[test]
    fn phone_conflict_detection() {
        let conflict = EnrollmentError::Api {
            endpoint: "learners",
            message: "This mobile number is already registered".to_owned(),
        };
        assert!(conflict.is_phone_conflict());

        let other = EnrollmentError::Api {
            endpoint: "learners",
            message: "invalid api key".to_owned(),
        };
        assert!(!other.is_phone_conflict());
    }
}
