//! Bazaar
//!
//! Client-side engine for a multi-seller marketplace: a stock-aware shopping
//! cart, an order-submission workflow, a role/session state machine, and a
//! typed client for the marketplace REST API. All persistent state lives
//! behind the remote API; this crate is presentation-side orchestration.

pub mod api;
pub mod cart;
pub mod checkout;
pub mod cli;
pub mod config;
pub mod prelude;
pub mod render;
pub mod session;
