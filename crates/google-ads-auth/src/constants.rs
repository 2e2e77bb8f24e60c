//! Google OAuth2 and Google Ads API constants
//!
//! The doctor supports exactly one provider and one scope. `Endpoints`
//! bundles the URLs so tests can point the flows at local servers.

/// Google's OAuth2 consent page
pub const AUTHORIZE_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Token endpoint for code exchange and token refresh
pub const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// The only scope the Google Ads API accepts
pub const SCOPE: &str = "https://www.googleapis.com/auth/adwords";

/// Google Ads API REST host
pub const ADS_API_BASE: &str = "https://googleads.googleapis.com";

/// Google Ads API version used for the account probe
pub const ADS_API_VERSION: &str = "v19";

/// Resolved endpoint URLs for one diagnostic session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub authorize_url: String,
    pub token_url: String,
    pub ads_api_base: String,
    pub ads_api_version: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            authorize_url: AUTHORIZE_ENDPOINT.into(),
            token_url: TOKEN_ENDPOINT.into(),
            ads_api_base: ADS_API_BASE.into(),
            ads_api_version: ADS_API_VERSION.into(),
        }
    }
}

impl Endpoints {
    /// URL of the customer resource for `customer_id`.
    pub fn customer_url(&self, customer_id: &str) -> String {
        format!(
            "{}/{}/customers/{}",
            self.ads_api_base.trim_end_matches('/'),
            self.ads_api_version,
            customer_id
        )
    }
}
