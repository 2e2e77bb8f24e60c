//! Google Ads account probe
//!
//! A token can be issued and still be useless for the Google Ads API
//! (wrong account, missing developer token, API disabled). One GET against
//! the customer resource proves the credentials work end to end.

use google_ads_auth::{AuthorizedClient, Endpoints};
use tracing::{debug, instrument};

use crate::classifier::RawError;

/// Fetch `customers/{customer_id}` and return the raw body on success.
///
/// A body with a top-level `error` field, a non-2xx status, or a transport
/// failure all yield an error carrying the full body text.
#[instrument(skip_all, fields(customer_id = %customer_id))]
pub async fn probe_account(
    client: &AuthorizedClient,
    endpoints: &Endpoints,
    customer_id: &str,
    developer_token: Option<&str>,
    login_customer_id: Option<&str>,
) -> Result<String, RawError> {
    let mut request = client.get(&endpoints.customer_url(customer_id));
    // Absent token: the API answers DEVELOPER_TOKEN_PARAMETER_MISSING.
    if let Some(token) = developer_token {
        request = request.header("developer-token", token);
    }
    if let Some(login) = login_customer_id {
        request = request.header("login-customer-id", login.replace('-', ""));
    }

    let response = request
        .send()
        .await
        .map_err(|e| RawError::Transport(e.to_string()))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| RawError::Transport(format!("reading account response: {e}")))?;
    debug!(status = status.as_u16(), bytes = body.len(), "account probe response");

    let has_error_field = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .is_some_and(|json| json.get("error").is_some());
    if has_error_field {
        return Err(RawError::Api(body));
    }
    if !status.is_success() {
        return Err(RawError::Api(format!("{status}: {body}")));
    }
    Ok(body)
}
