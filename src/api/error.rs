//! API error types
//!
//! Failure classes for the Eversense session client. Storage failures are
//! not represented here: the credential store swallows and logs them.

use thiserror::Error;

/// Errors surfaced by the session client
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Login rejected or unreachable (non-2xx on the token endpoint,
    /// or a network failure during the credential exchange)
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// A token refresh was needed but neither in-memory nor persisted
    /// credentials were available
    #[error("No stored credentials available to refresh the session")]
    NoCredentials,

    /// A data endpoint returned non-2xx, an unparseable body, or the
    /// request never completed
    #[error("Request failed: {0}")]
    Fetch(String),
}
