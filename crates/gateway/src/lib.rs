//! Remote boundaries of the Upchaarak client: the chat-completion endpoint
//! and the read-only hospital directory.
//!
//! Both clients are stateless request/response wrappers.  Neither retries;
//! retry/backoff policy and user-facing messaging belong to the caller.

pub mod chat;
pub mod hospitals;

use thiserror::Error;

/// A remote call failed or returned unusable data.
///
/// Client-side timeouts surface through the `Http` variant
/// (`reqwest::Error::is_timeout`); callers treat every variant the same way —
/// the operation failed and local state is unchanged.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request to the remote service failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("remote service returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("remote service returned an unusable response body")]
    MalformedResponse,
}
