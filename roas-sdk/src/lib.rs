//! Shared types for the ROAS School of Marketing checkout.
//!
//! This crate carries the wire objects exchanged between the checkout
//! client, the checkout server, and the hosted payment widget, plus the
//! Razorpay payment-signature scheme. It deliberately contains no I/O so
//! both sides of the flow can depend on it.

#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod objects;
pub mod signature;
