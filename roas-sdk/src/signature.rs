//! Razorpay payment-signature scheme.
//!
//! After a successful payment the widget hands the client a signature
//! computed by the gateway as:
//!
//! ```text
//! hex(HMAC-SHA256("{order_id}|{payment_id}", key_secret))
//! ```
//!
//! The checkout server recomputes this over the identifiers submitted by
//! the client and accepts the payment only on a match. Verification goes
//! through [`ring::hmac::verify`] so the comparison is constant-time.

/// Errors produced by signature verification.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("invalid hex encoding")]
    InvalidHex,
    #[error("invalid signature")]
    SignatureMismatch,
}

impl From<ring::error::Unspecified> for SignatureError {
    fn from(_: ring::error::Unspecified) -> Self {
        Self::SignatureMismatch
    }
}

/// Compute the payment signature for an `(order_id, payment_id)` pair.
///
/// Returns the lowercase hex digest the gateway would produce.
pub fn payment_signature(order_id: &str, payment_id: &str, key_secret: &[u8]) -> String {
    let data = format!("{order_id}|{payment_id}");
    let tag = ring::hmac::sign(
        &ring::hmac::Key::new(ring::hmac::HMAC_SHA256, key_secret),
        data.as_bytes(),
    );
    hex::encode(tag.as_ref())
}

/// Verify a payment signature submitted by the checkout client.
///
/// `signature` is the hex digest from the widget's success callback.
pub fn verify_payment_signature(
    order_id: &str,
    payment_id: &str,
    signature: &str,
    key_secret: &[u8],
) -> Result<(), SignatureError> {
    let submitted = hex::decode(signature).map_err(|_| SignatureError::InvalidHex)?;
    let data = format!("{order_id}|{payment_id}");
    ring::hmac::verify(
        &ring::hmac::Key::new(ring::hmac::HMAC_SHA256, key_secret),
        data.as_bytes(),
        &submitted,
    )?;
    Ok(())
}
