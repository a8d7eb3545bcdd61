//! Eversense API
//!
//! Session client, credential store, and error types for the vendor cloud
//! API, plus the development-mode fixtures.

pub mod client;
pub mod error;
pub mod mock;
pub mod session;
pub mod storage;

pub use client::{ApiClient, LatestReading, UserState};
pub use error::ApiError;
