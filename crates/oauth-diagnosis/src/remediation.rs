//! Remediation policies
//!
//! One policy per `DiagnosticCode`. Every policy tells the operator what is
//! wrong; two of them also collect replacement credentials and write them
//! through the store. A pass never runs more than one policy.

use tracing::info;

use crate::code::DiagnosticCode;
use crate::error::Result;
use crate::operator::Operator;
use crate::store::{CredentialField, CredentialStore};

const CLOUD_CREDENTIALS_GUIDE: &str =
    "https://developers.google.com/google-ads/api/docs/oauth/cloud-project";
const DEVELOPER_TOKEN_GUIDE: &str =
    "https://developers.google.com/google-ads/api/docs/get-started/dev-token";
const ENABLE_API_GUIDE: &str =
    "https://console.cloud.google.com/apis/library/googleads.googleapis.com";

/// What a remediation policy did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Remediation {
    /// Messages only
    Reported,
    /// Operator confirmed a manual fix
    Acknowledged,
    /// These fields were replaced in the store, in this order
    Replaced(Vec<CredentialField>),
}

/// The message shown for `code`.
pub fn message(code: DiagnosticCode) -> &'static str {
    match code {
        DiagnosticCode::AccessNotPermittedForManagerAccount => {
            "ERROR: Your credentials are not sufficient to access a manager account.\n\
             Please log in with a Google Ads account with manager access."
        }
        DiagnosticCode::GoogleAdsApiDisabled => {
            "ERROR: The Google Ads API is not enabled for the Google Cloud project of your OAuth client."
        }
        DiagnosticCode::InvalidClientInfo => "ERROR: Your client ID and/or secret may be invalid.",
        DiagnosticCode::InvalidRefreshToken | DiagnosticCode::Unauthorized => {
            "ERROR: Your refresh token may be invalid."
        }
        DiagnosticCode::MissingDevToken => {
            "ERROR: Your developer token is missing in the configuration file."
        }
        DiagnosticCode::Unauthenticated => {
            "ERROR: The login email may not have access to the given account."
        }
        DiagnosticCode::InvalidCustomerId => "ERROR: Your customer ID is invalid.",
        DiagnosticCode::UnknownError => {
            "ERROR: Your credentials are invalid but we cannot determine the exact error. \
             Please verify your developer token, client ID, client secret and refresh token."
        }
    }
}

/// Run the policy for `code`.
///
/// Replacement values are collected before anything is written, so a
/// failed prompt leaves the store untouched. A failed write aborts the
/// pass with the store error.
pub fn remediate(
    code: DiagnosticCode,
    store: &mut dyn CredentialStore,
    operator: &mut dyn Operator,
) -> Result<Remediation> {
    info!(code = %code, "applying remediation");
    operator.inform(message(code));

    match code {
        DiagnosticCode::GoogleAdsApiDisabled => {
            operator.inform(&format!("Enable it here: {ENABLE_API_GUIDE}"));
            operator.acknowledge("Press <Enter> to continue after you enable Google Ads API")?;
            Ok(Remediation::Acknowledged)
        }
        DiagnosticCode::InvalidClientInfo => replace_cloud_credentials(store, operator),
        DiagnosticCode::MissingDevToken => replace_developer_token(store, operator),
        DiagnosticCode::InvalidRefreshToken | DiagnosticCode::Unauthorized => {
            operator.inform("Run the doctor again to generate a new refresh token.");
            Ok(Remediation::Reported)
        }
        DiagnosticCode::AccessNotPermittedForManagerAccount
        | DiagnosticCode::Unauthenticated
        | DiagnosticCode::InvalidCustomerId
        | DiagnosticCode::UnknownError => Ok(Remediation::Reported),
    }
}

fn replace_cloud_credentials(
    store: &mut dyn CredentialStore,
    operator: &mut dyn Operator,
) -> Result<Remediation> {
    operator.inform(&format!(
        "Follow this guide to set up your OAuth2 client ID and client secret: {CLOUD_CREDENTIALS_GUIDE}"
    ));
    let client_id = operator.read_line("New Client ID >> ")?;
    let client_secret = operator.read_line("New Client Secret >> ")?;

    store.replace_many(&[
        (CredentialField::ClientId, client_id.as_str()),
        (CredentialField::ClientSecret, client_secret.as_str()),
    ])?;
    operator.inform(&format!(
        "Client ID and client secret replaced in {}",
        store.location()
    ));
    Ok(Remediation::Replaced(vec![
        CredentialField::ClientId,
        CredentialField::ClientSecret,
    ]))
}

fn replace_developer_token(
    store: &mut dyn CredentialStore,
    operator: &mut dyn Operator,
) -> Result<Remediation> {
    operator.inform(&format!(
        "Please follow this guide to retrieve your developer token: {DEVELOPER_TOKEN_GUIDE}"
    ));
    operator.inform(
        "Please enter a new developer token here and it will replace the one in your client library configuration file",
    );
    let developer_token = operator.read_line("New Developer Token >> ")?;

    store.replace(CredentialField::DeveloperToken, &developer_token)?;
    operator.inform(&format!("Developer token replaced in {}", store.location()));
    Ok(Remediation::Replaced(vec![CredentialField::DeveloperToken]))
}
