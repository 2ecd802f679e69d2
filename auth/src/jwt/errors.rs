use thiserror::Error;

/// Error type for JWT operations.
///
/// Decoding failures are classified so callers can decide how much to reveal;
/// `Malformed` keeps the library detail for logging only.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Missing required claim: {0}")]
    MissingClaim(String),
}

impl JwtError {
    /// Short, client-safe label for the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            JwtError::EncodingFailed(_) => "encoding failed",
            JwtError::TokenExpired => "token expired",
            JwtError::InvalidSignature => "invalid signature",
            JwtError::Malformed(_) => "malformed token",
            JwtError::MissingClaim(_) => "missing claim",
        }
    }
}
