//! Diagnostic codes and flow kinds

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::Error;

/// Root cause of a failed OAuth flow. Exactly one is produced per failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCode {
    /// The request targets an operation a manager account cannot perform
    AccessNotPermittedForManagerAccount,
    /// Google Ads API is not enabled in the Cloud project
    GoogleAdsApiDisabled,
    /// Client ID and/or client secret are wrong
    InvalidClientInfo,
    /// Refresh token is revoked, malformed, missing or for another user
    InvalidRefreshToken,
    InvalidCustomerId,
    MissingDevToken,
    /// Login identity has no access to the target account
    Unauthenticated,
    /// Refresh token was not issued to this client ID
    Unauthorized,
    UnknownError,
}

impl DiagnosticCode {
    pub const ALL: [DiagnosticCode; 9] = [
        Self::AccessNotPermittedForManagerAccount,
        Self::GoogleAdsApiDisabled,
        Self::InvalidClientInfo,
        Self::InvalidRefreshToken,
        Self::InvalidCustomerId,
        Self::MissingDevToken,
        Self::Unauthenticated,
        Self::Unauthorized,
        Self::UnknownError,
    ];

    /// Stable identifier used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessNotPermittedForManagerAccount => "access_not_permitted_for_manager_account",
            Self::GoogleAdsApiDisabled => "google_ads_api_disabled",
            Self::InvalidClientInfo => "invalid_client_info",
            Self::InvalidRefreshToken => "invalid_refresh_token",
            Self::InvalidCustomerId => "invalid_customer_id",
            Self::MissingDevToken => "missing_dev_token",
            Self::Unauthenticated => "unauthenticated",
            Self::Unauthorized => "unauthorized",
            Self::UnknownError => "unknown_error",
        }
    }

    /// Whether remediating this code rewrites stored credentials.
    pub fn mutates_credentials(&self) -> bool {
        matches!(self, Self::InvalidClientInfo | Self::MissingDevToken)
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which OAuth2 flow the client library is configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    /// Web application client; the refresh token is already stored
    Web,
    /// Installed (desktop) client; consent happens in a local browser
    InstalledApp,
}

impl FlowKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::InstalledApp => "installed_app",
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlowKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "web" => Ok(Self::Web),
            "installed_app" => Ok(Self::InstalledApp),
            other => Err(Error::UnknownFlow(other.to_owned())),
        }
    }
}
