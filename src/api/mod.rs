//! Nutrition backend client
//!
//! Typed access to the REST endpoints of the nutrition backend. Responses are
//! validated here before anything reaches the aggregator.

pub mod client;
pub mod error;
pub mod types;

pub use client::ApiClient;
pub use error::{ApiError, ApiResult};
pub use types::{FoodAnalysis, RemoteDay, ScannedProduct, Tip};
