//! Diagnostic flow orchestration
//!
//! Pure state machine: `handle_event` receives events and returns
//! `(new_state, action)`. `Doctor::run` executes the I/O implied by each
//! action and feeds the result back as the next event.
//!
//! ```text
//! Start -> Exchanging -> Probing -> Success
//!                    \-> Failed  \-> Failed
//! ```

use common::Secret;
use google_ads_auth::{
    AuthorizedClient, ClientCredentials, Endpoints, RedirectCapture, build_authorization_url,
    compute_challenge, exchange_code, generate_state, generate_verifier, refresh_access_token,
};
use tracing::{debug, info, warn};

use crate::classifier::{RawError, classify, surfaced_message};
use crate::code::{DiagnosticCode, FlowKind};
use crate::error::{Error, Result};
use crate::operator::Operator;
use crate::probe::probe_account;
use crate::remediation::{Remediation, remediate};
use crate::store::{CredentialField, CredentialStore};

/// Session parameters chosen before the pass starts.
#[derive(Debug, Clone)]
pub struct DiagnosticConfig {
    /// Digits only
    pub customer_id: String,
    pub flow: FlowKind,
    /// Show raw response bodies and error text to the operator
    pub verbose: bool,
}

#[derive(Debug)]
pub enum FlowState {
    Start,
    /// Obtaining an access token
    Exchanging { flow: FlowKind },
    /// Access token obtained; `refresh_token` is set when it is new
    Probing {
        refresh_token: Option<Secret<String>>,
    },
    /// Terminal
    Success {
        refresh_token: Option<Secret<String>>,
    },
    /// Terminal
    Failed { code: DiagnosticCode },
}

impl FlowState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Exchanging { .. } => "exchanging",
            Self::Probing { .. } => "probing",
            Self::Success { .. } => "success",
            Self::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug)]
pub enum FlowEvent {
    Begin(FlowKind),
    /// Token step finished
    Authorized {
        refresh_token: Option<Secret<String>>,
    },
    ExchangeFailed(RawError),
    ProbeSucceeded,
    ProbeFailed(RawError),
}

/// Actions the driver executes after a transition.
#[derive(Debug)]
pub enum FlowAction {
    /// Consent in the browser, then exchange the code
    CaptureAndExchange,
    /// Refresh grant with the stored refresh token
    RefreshAccess,
    ProbeAccount,
    OfferPersist {
        refresh_token: Secret<String>,
    },
    /// `message` is the provider's own `error.message`, if any
    Remediate {
        code: DiagnosticCode,
        message: Option<String>,
    },
    None,
}

/// Handle a state transition. Pure function: no I/O.
pub fn handle_event(state: FlowState, event: FlowEvent) -> (FlowState, FlowAction) {
    match (state, event) {
        // --- Start ---
        (FlowState::Start, FlowEvent::Begin(flow)) => {
            let action = match flow {
                FlowKind::InstalledApp => FlowAction::CaptureAndExchange,
                FlowKind::Web => FlowAction::RefreshAccess,
            };
            (FlowState::Exchanging { flow }, action)
        }

        // --- Exchanging ---
        (FlowState::Exchanging { .. }, FlowEvent::Authorized { refresh_token }) => (
            FlowState::Probing { refresh_token },
            FlowAction::ProbeAccount,
        ),

        (FlowState::Exchanging { .. }, FlowEvent::ExchangeFailed(err))
        | (FlowState::Probing { .. }, FlowEvent::ProbeFailed(err)) => {
            let code = classify(&err);
            (
                FlowState::Failed { code },
                FlowAction::Remediate {
                    code,
                    message: surfaced_message(&err),
                },
            )
        }

        // --- Probing ---
        (FlowState::Probing { refresh_token }, FlowEvent::ProbeSucceeded) => {
            let action = match &refresh_token {
                Some(token) => FlowAction::OfferPersist {
                    refresh_token: token.clone(),
                },
                None => FlowAction::None,
            };
            (FlowState::Success { refresh_token }, action)
        }

        // --- Invalid/unhandled transition: stay in current state ---
        (state, _event) => (state, FlowAction::None),
    }
}

/// How a diagnostic pass ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Healthy { refresh_token_persisted: bool },
    Diagnosed {
        code: DiagnosticCode,
        remediation: Remediation,
    },
}

/// Runs one diagnostic pass against a credential store.
pub struct Doctor<'a> {
    http: reqwest::Client,
    endpoints: Endpoints,
    config: DiagnosticConfig,
    store: &'a mut dyn CredentialStore,
    operator: &'a mut dyn Operator,
    capture: Option<&'a mut dyn RedirectCapture>,
}

impl<'a> Doctor<'a> {
    /// `http` carries the per-request timeout for every network call.
    pub fn new(
        http: reqwest::Client,
        config: DiagnosticConfig,
        store: &'a mut dyn CredentialStore,
        operator: &'a mut dyn Operator,
    ) -> Self {
        Self {
            http,
            endpoints: Endpoints::default(),
            config,
            store,
            operator,
            capture: None,
        }
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Required for `FlowKind::InstalledApp`.
    pub fn with_capture(mut self, capture: &'a mut dyn RedirectCapture) -> Self {
        self.capture = Some(capture);
        self
    }

    /// Run one pass: token, probe, then classify and remediate on failure.
    pub async fn run(mut self) -> Result<SessionOutcome> {
        if self.config.flow == FlowKind::InstalledApp && self.capture.is_none() {
            return Err(Error::MissingCapture);
        }
        info!(flow = %self.config.flow, customer_id = %self.config.customer_id, "starting diagnostic pass");

        let mut state = FlowState::Start;
        let mut event = FlowEvent::Begin(self.config.flow);
        let mut authorized: Option<AuthorizedClient> = None;

        loop {
            let (next, action) = handle_event(state, event);
            state = next;
            debug!(state = state.name(), "flow transition");

            event = match action {
                FlowAction::CaptureAndExchange => match self.installed_app_token().await {
                    Ok((client, refresh_token)) => {
                        authorized = Some(client);
                        FlowEvent::Authorized { refresh_token }
                    }
                    Err(err) => self.failed(err, FlowEvent::ExchangeFailed),
                },
                FlowAction::RefreshAccess => match self.web_token().await {
                    Ok((client, refresh_token)) => {
                        authorized = Some(client);
                        FlowEvent::Authorized { refresh_token }
                    }
                    Err(err) => self.failed(err, FlowEvent::ExchangeFailed),
                },
                FlowAction::ProbeAccount => {
                    let client = authorized
                        .as_ref()
                        .ok_or(Error::InvalidTransition("probe without an access token"))?;
                    match self.probe(client).await {
                        Ok(()) => FlowEvent::ProbeSucceeded,
                        Err(err) => self.failed(err, FlowEvent::ProbeFailed),
                    }
                }
                FlowAction::OfferPersist { refresh_token } => {
                    let persisted = self.offer_persist(&refresh_token)?;
                    return Ok(SessionOutcome::Healthy {
                        refresh_token_persisted: persisted,
                    });
                }
                FlowAction::Remediate { code, message } => {
                    if let Some(message) = message {
                        self.operator
                            .inform(&format!("JSON response error: {message}"));
                    }
                    warn!(code = %code, "diagnosed OAuth failure");
                    let remediation = remediate(code, &mut *self.store, &mut *self.operator)?;
                    return Ok(SessionOutcome::Diagnosed { code, remediation });
                }
                FlowAction::None => {
                    return match state {
                        FlowState::Success { .. } => Ok(SessionOutcome::Healthy {
                            refresh_token_persisted: false,
                        }),
                        other => Err(Error::InvalidTransition(other.name())),
                    };
                }
            };
        }
    }

    fn client_credentials(&self) -> ClientCredentials {
        ClientCredentials {
            client_id: self.store.get(CredentialField::ClientId).unwrap_or_default(),
            client_secret: Secret::new(
                self.store
                    .get(CredentialField::ClientSecret)
                    .unwrap_or_default(),
            ),
        }
    }

    async fn installed_app_token(
        &mut self,
    ) -> std::result::Result<(AuthorizedClient, Option<Secret<String>>), RawError> {
        let client = self.client_credentials();
        let Some(capture) = self.capture.as_deref_mut() else {
            return Err(RawError::Transport("no redirect listener".into()));
        };

        let verifier = generate_verifier();
        let state = generate_state();
        let redirect_uri = capture.redirect_uri();
        let url = build_authorization_url(
            &self.endpoints.authorize_url,
            &client.client_id,
            &redirect_uri,
            &state,
            &compute_challenge(&verifier),
        );
        self.operator
            .inform("Log into the Google account you use for Google Ads and visit the following URL:");
        self.operator.inform(&url);

        let code = capture.wait_for_code(&state).await?;
        let token = exchange_code(
            &self.http,
            &self.endpoints.token_url,
            &client,
            &code,
            &verifier,
            &redirect_uri,
        )
        .await?;

        let refresh_token = token
            .refresh_token
            .filter(|rt| !rt.is_empty())
            .map(Secret::new);
        let access = AuthorizedClient::new(self.http.clone(), Secret::new(token.access_token));
        Ok((access, refresh_token))
    }

    async fn web_token(
        &mut self,
    ) -> std::result::Result<(AuthorizedClient, Option<Secret<String>>), RawError> {
        let client = self.client_credentials();
        let stored = Secret::new(
            self.store
                .get(CredentialField::RefreshToken)
                .unwrap_or_default(),
        );

        let token =
            refresh_access_token(&self.http, &self.endpoints.token_url, &client, &stored).await?;

        // Google only returns a refresh token here when it rotated it.
        let rotated = token
            .refresh_token
            .filter(|rt| !rt.is_empty() && rt != stored.expose())
            .map(Secret::new);
        let access = AuthorizedClient::new(self.http.clone(), Secret::new(token.access_token));
        Ok((access, rotated))
    }

    async fn probe(&mut self, client: &AuthorizedClient) -> std::result::Result<(), RawError> {
        let developer_token = self.store.get(CredentialField::DeveloperToken);
        let login_customer_id = self.store.get(CredentialField::LoginCustomerId);
        let body = probe_account(
            client,
            &self.endpoints,
            &self.config.customer_id,
            developer_token.as_deref(),
            login_customer_id.as_deref(),
        )
        .await?;

        if self.config.verbose {
            self.operator.inform(&body);
        }
        self.operator
            .inform("SUCCESS: OAuth2 flow completed successfully and the account is accessible.");
        Ok(())
    }

    fn failed(&mut self, err: RawError, event: fn(RawError) -> FlowEvent) -> FlowEvent {
        debug!(error = %err, "flow step failed");
        if self.config.verbose {
            self.operator.inform(&err.to_string());
        }
        event(err)
    }

    fn offer_persist(&mut self, refresh_token: &Secret<String>) -> Result<bool> {
        self.operator.inform(
            "Would you like to replace your refresh token in the client library config file with the new one generated?",
        );
        if self
            .operator
            .confirm("Enter Y for Yes [Anything else is No] >> ")?
        {
            self.store
                .replace(CredentialField::RefreshToken, refresh_token.expose())?;
            self.operator.inform(&format!(
                "Refresh token replaced in {}",
                self.store.location()
            ));
            Ok(true)
        } else {
            self.operator.inform("Refresh token is NOT replaced");
            Ok(false)
        }
    }
}
