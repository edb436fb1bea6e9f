//! Checkout flow, course catalog, and upstream API clients for the ROAS
//! School of Marketing.
//!
//! [`checkout::CheckoutFlow`] drives one course purchase over two
//! injected ports: an [`checkout::OrderApi`] backend and a
//! [`checkout::PaymentWidget`]. The concrete clients for the checkout
//! server, the Razorpay orders API, and the Graphy enrollment API live
//! alongside it.

#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod checkout;
pub mod client;
pub mod enrollment;
pub mod gateway;
