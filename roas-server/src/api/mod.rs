//! HTTP API handlers.

pub mod checkout;
