//! Error classification
//!
//! Reduces any failure of the flow under diagnosis to a single
//! `DiagnosticCode` by scanning the error text against an ordered rule
//! table. The first matching rule wins, so the table order is part of the
//! contract: refresh-token rules sit ahead of the generic
//! `"PERMISSION_DENIED"` status.

use std::fmt;

use crate::code::DiagnosticCode;

/// A failure from the token exchanger or the account probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawError {
    /// Network, DNS, TLS or local OAuth transport failure
    Transport(String),
    /// Token endpoint rejection; body kept verbatim
    OAuth(String),
    /// Account endpoint rejection; full response body
    Api(String),
}

impl RawError {
    /// The text rules are matched against.
    pub fn text(&self) -> &str {
        match self {
            Self::Transport(text) | Self::OAuth(text) | Self::Api(text) => text,
        }
    }
}

impl fmt::Display for RawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(text) => write!(f, "transport error: {text}"),
            Self::OAuth(text) => write!(f, "token endpoint error: {text}"),
            Self::Api(text) => write!(f, "account endpoint error: {text}"),
        }
    }
}

impl From<google_ads_auth::Error> for RawError {
    fn from(err: google_ads_auth::Error) -> Self {
        use google_ads_auth::Error as Auth;
        match err {
            Auth::TokenEndpoint { body, .. } => Self::OAuth(body),
            Auth::ConsentDenied(reason) => Self::OAuth(reason),
            e @ (Auth::InvalidResponse(_) | Auth::MissingCode | Auth::StateMismatch) => {
                Self::OAuth(e.to_string())
            }
            e @ (Auth::Http(_)
            | Auth::RefreshTokenNotSet
            | Auth::CaptureTimeout(_)
            | Auth::Capture(_)) => Self::Transport(e.to_string()),
        }
    }
}

struct Rule {
    needle: &'static str,
    code: DiagnosticCode,
}

const RULES: &[Rule] = &[
    Rule {
        needle: "invalid_client",
        code: DiagnosticCode::InvalidClientInfo,
    },
    Rule {
        needle: "unauthorized_client",
        code: DiagnosticCode::Unauthorized,
    },
    Rule {
        needle: "invalid_grant",
        code: DiagnosticCode::InvalidRefreshToken,
    },
    Rule {
        needle: "refresh token is not set",
        code: DiagnosticCode::InvalidRefreshToken,
    },
    Rule {
        needle: "USER_PERMISSION_DENIED",
        code: DiagnosticCode::InvalidRefreshToken,
    },
    Rule {
        needle: "\"PERMISSION_DENIED\"",
        code: DiagnosticCode::GoogleAdsApiDisabled,
    },
    Rule {
        needle: "UNAUTHENTICATED",
        code: DiagnosticCode::Unauthenticated,
    },
    Rule {
        needle: "CANNOT_BE_EXECUTED_BY_MANAGER_ACCOUNT",
        code: DiagnosticCode::AccessNotPermittedForManagerAccount,
    },
    Rule {
        needle: "DEVELOPER_TOKEN_PARAMETER_MISSING",
        code: DiagnosticCode::MissingDevToken,
    },
    Rule {
        needle: "INVALID_CUSTOMER_ID",
        code: DiagnosticCode::InvalidCustomerId,
    },
];

/// Map a raw failure to its diagnostic code. Never fails.
pub fn classify(err: &RawError) -> DiagnosticCode {
    let text = err.text();
    RULES
        .iter()
        .find(|rule| text.contains(rule.needle))
        .map_or(DiagnosticCode::UnknownError, |rule| rule.code)
}

/// The provider's human-readable `error.message`, when the text is a JSON
/// body of the shape `{"error": {"message": "..."}}`.
pub fn surfaced_message(err: &RawError) -> Option<String> {
    let body: serde_json::Value = serde_json::from_str(err.text()).ok()?;
    body.get("error")?
        .get("message")?
        .as_str()
        .map(str::to_owned)
}
