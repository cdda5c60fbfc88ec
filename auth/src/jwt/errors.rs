use thiserror::Error;

/// Error type for token operations.
///
/// The three rejection kinds stay distinguishable for logging. Callers that
/// answer an untrusted client should collapse them into a single response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is malformed: {0}")]
    MalformedToken(String),

    #[error("Token signature does not match")]
    BadSignature,

    #[error("Token is expired")]
    Expired,
}

impl TokenError {
    /// Short reason label for structured logs.
    pub fn reason(&self) -> &'static str {
        match self {
            TokenError::EncodingFailed(_) => "encoding_failed",
            TokenError::MalformedToken(_) => "malformed",
            TokenError::BadSignature => "bad_signature",
            TokenError::Expired => "expired",
        }
    }
}
