//! Remote marketplace API: typed models, client and errors.

pub mod client;
pub mod error;
pub mod models;

pub use client::MarketClient;
pub use error::ApiError;
