//! Unified error type.

/// The error type returned by webapputil's fallible operations.
///
/// Only response *production* can fail. A missing request id is not an
/// `Error`: it is a wiring bug and [`request_id`](crate::middleware::request_id::request_id)
/// panics instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The problem value could not be encoded as JSON.
    #[error("failed to serialize problem detail: {0}")]
    Serialization(#[from] serde_json::Error),
}
