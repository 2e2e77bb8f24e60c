//! OAuth token grants against Google's token endpoint
//!
//! Handles the two token endpoint interactions:
//! 1. Authorization code exchange (installed-app flow)
//! 2. Refresh token grant (web flow, using the stored refresh token)
//!
//! Both POST form-encoded bodies with the client ID and secret. Provider
//! rejections keep the response body verbatim in `Error::TokenEndpoint`.

use common::Secret;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{Error, Result};

/// OAuth client identity from the client library configuration.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: Secret<String>,
}

/// Response from the token endpoint for both grants.
///
/// Google omits `refresh_token` on refresh grants unless it rotated the
/// token, and on code exchanges when consent was not re-prompted.
#[derive(Debug, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Seconds until the access token expires (delta, not absolute)
    #[serde(default)]
    pub expires_in: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

/// HTTP client that attaches a bearer access token to every request.
pub struct AuthorizedClient {
    http: reqwest::Client,
    access_token: Secret<String>,
}

impl AuthorizedClient {
    pub fn new(http: reqwest::Client, access_token: Secret<String>) -> Self {
        Self { http, access_token }
    }

    /// Start a GET request carrying the `Authorization: Bearer` header.
    pub fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.http.get(url).bearer_auth(self.access_token.expose())
    }
}

/// Exchange an authorization code for tokens (installed-app flow).
#[instrument(skip_all, fields(client_id = %client.client_id))]
pub async fn exchange_code(
    http: &reqwest::Client,
    token_url: &str,
    client: &ClientCredentials,
    code: &str,
    verifier: &str,
    redirect_uri: &str,
) -> Result<TokenResponse> {
    if code.trim().is_empty() {
        return Err(Error::MissingCode);
    }

    let response = http
        .post(token_url)
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("code_verifier", verifier),
            ("client_id", client.client_id.as_str()),
            ("client_secret", client.client_secret.expose().as_str()),
            ("redirect_uri", redirect_uri),
        ])
        .send()
        .await
        .map_err(|e| Error::Http(format!("token exchange request failed: {e}")))?;

    read_token_response(response).await
}

/// Obtain a fresh access token from a stored refresh token (web flow).
///
/// An empty refresh token never reaches the network: it fails with
/// `Error::RefreshTokenNotSet`, matching what an OAuth2 transport reports
/// when asked to refresh without one.
#[instrument(skip_all, fields(client_id = %client.client_id))]
pub async fn refresh_access_token(
    http: &reqwest::Client,
    token_url: &str,
    client: &ClientCredentials,
    refresh: &Secret<String>,
) -> Result<TokenResponse> {
    if refresh.is_blank() {
        return Err(Error::RefreshTokenNotSet);
    }

    let response = http
        .post(token_url)
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh.expose().as_str()),
            ("client_id", client.client_id.as_str()),
            ("client_secret", client.client_secret.expose().as_str()),
        ])
        .send()
        .await
        .map_err(|e| Error::Http(format!("token refresh request failed: {e}")))?;

    read_token_response(response).await
}

async fn read_token_response(response: reqwest::Response) -> Result<TokenResponse> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("<no body>"));
        debug!(status = status.as_u16(), "token endpoint rejected grant");
        return Err(Error::TokenEndpoint {
            status: status.as_u16(),
            body,
        });
    }

    response
        .json::<TokenResponse>()
        .await
        .map_err(|e| Error::InvalidResponse(e.to_string()))
}
