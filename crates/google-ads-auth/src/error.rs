//! Error types for Google OAuth operations

/// Errors from token grants and redirect capture.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The token endpoint rejected the grant. `body` is kept verbatim so the
    /// provider's OAuth error code (`invalid_grant`, ...) can be inspected.
    #[error("token endpoint returned {status}: {body}")]
    TokenEndpoint { status: u16, body: String },

    #[error("invalid token response: {0}")]
    InvalidResponse(String),

    #[error("oauth2: token expired and refresh token is not set")]
    RefreshTokenNotSet,

    #[error("authorization code is empty")]
    MissingCode,

    #[error("consent was not granted: {0}")]
    ConsentDenied(String),

    #[error("redirect state does not match the consent request")]
    StateMismatch,

    #[error("no authorization redirect received within {0}s")]
    CaptureTimeout(u64),

    #[error("redirect capture failed: {0}")]
    Capture(String),
}

/// Result alias for auth operations.
pub type Result<T> = std::result::Result<T, Error>;
