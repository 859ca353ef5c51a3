//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`BridgeError`]
//! at port boundaries.

/// Boxed source error carried across port boundaries.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error for bridge operations.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The messaging transport rejected or failed to accept a publish.
    #[error("publish failed")]
    Publish(#[source] BoxError),

    /// A discovery payload could not be encoded as JSON.
    #[error("failed to serialize discovery payload")]
    Serialize(#[from] serde_json::Error),
}
