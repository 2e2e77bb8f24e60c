//! Error types for the diagnostic engine
//!
//! These are failures of the doctor itself. Failures of the OAuth flow
//! under diagnosis are `RawError`s and end up as a `DiagnosticCode`.

/// Errors that abort a diagnostic pass.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("credential store I/O error: {0}")]
    StoreIo(String),

    #[error("credential store parse error: {0}")]
    StoreParse(String),

    #[error("credential field {0} is read-only")]
    ReadOnlyField(&'static str),

    #[error("operator input error: {0}")]
    Operator(String),

    #[error("unknown OAuth type {0:?}, expected \"web\" or \"installed_app\"")]
    UnknownFlow(String),

    #[error("the installed_app flow needs a redirect listener")]
    MissingCapture,

    #[error("invalid flow transition: {0}")]
    InvalidTransition(&'static str),
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
