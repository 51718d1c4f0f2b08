use thiserror::Error;

/// Error type for JWT operations.
///
/// Decoding distinguishes the three ways a presented token can be rejected.
/// Callers at a trust boundary are expected to collapse them into a single
/// outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is expired")]
    Expired,
}
