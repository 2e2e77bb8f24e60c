//! Loopback capture of the OAuth authorization redirect
//!
//! The installed-app flow sends the operator's browser to Google's consent
//! page with `redirect_uri=http://127.0.0.1:<port>`. After consent Google
//! redirects back with `?code=...&state=...` (or `?error=...`). The listener
//! answers the first such request, hands the parameters to the waiting
//! caller, and shuts down.

use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// How long to wait for the operator to finish consent.
pub const DEFAULT_CAPTURE_TIMEOUT: Duration = Duration::from_secs(300);

/// Source of an authorization code for the installed-app flow.
///
/// Uses `Pin<Box<dyn Future>>` so it stays usable as `&mut dyn RedirectCapture`.
pub trait RedirectCapture: Send {
    /// Redirect URI to register in the consent URL.
    fn redirect_uri(&self) -> String;

    /// Wait for the redirect and return the authorization code.
    ///
    /// Fails when the redirect carries a different `state`, an `error`
    /// parameter, or no code at all.
    fn wait_for_code<'a>(
        &'a mut self,
        expected_state: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;
}

/// Query parameters Google appends to the redirect URI.
#[derive(Debug, Clone, Deserialize)]
struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// One-shot HTTP listener on the loopback interface.
pub struct LoopbackCapture {
    listener: Option<TcpListener>,
    addr: SocketAddr,
    timeout: Duration,
}

impl LoopbackCapture {
    /// Bind `127.0.0.1:<port>`. Port 0 picks an ephemeral port.
    pub async fn bind(port: u16) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", port))
            .await
            .map_err(|e| Error::Capture(format!("binding loopback listener: {e}")))?;
        let addr = listener
            .local_addr()
            .map_err(|e| Error::Capture(format!("reading listener address: {e}")))?;
        debug!(%addr, "redirect listener bound");
        Ok(Self {
            listener: Some(listener),
            addr,
            timeout: DEFAULT_CAPTURE_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn capture(&mut self, expected_state: &str) -> Result<String> {
        let listener = self
            .listener
            .take()
            .ok_or_else(|| Error::Capture("listener already consumed".into()))?;

        let (tx, mut rx) = mpsc::channel::<CallbackParams>(1);
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let app = axum::Router::new()
            .route("/", get(callback_handler))
            .with_state(tx);

        tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
        });

        info!(redirect_uri = %self.redirect_uri(), "waiting for authorization redirect");
        let received = tokio::time::timeout(self.timeout, rx.recv()).await;
        let _ = shutdown_tx.send(());

        let params = match received {
            Ok(Some(params)) => params,
            Ok(None) => return Err(Error::Capture("redirect listener stopped".into())),
            Err(_) => return Err(Error::CaptureTimeout(self.timeout.as_secs())),
        };

        if let Some(error) = params.error {
            return Err(Error::ConsentDenied(error));
        }
        if params.state.as_deref() != Some(expected_state) {
            return Err(Error::StateMismatch);
        }
        match params.code {
            Some(code) if !code.is_empty() => Ok(code),
            _ => Err(Error::MissingCode),
        }
    }
}

impl RedirectCapture for LoopbackCapture {
    fn redirect_uri(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn wait_for_code<'a>(
        &'a mut self,
        expected_state: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(self.capture(expected_state))
    }
}

async fn callback_handler(
    State(tx): State<mpsc::Sender<CallbackParams>>,
    Query(params): Query<CallbackParams>,
) -> (StatusCode, &'static str) {
    if params.code.is_none() && params.error.is_none() {
        return (
            StatusCode::BAD_REQUEST,
            "Missing authorization code in redirect.",
        );
    }
    let denied = params.error.is_some();
    // Only the first redirect counts; later ones find the channel full.
    let _ = tx.try_send(params);
    if denied {
        (
            StatusCode::OK,
            "Authorization was not granted. Return to the terminal for details.",
        )
    } else {
        (
            StatusCode::OK,
            "Authorization code received. You may close this window and return to the terminal.",
        )
    }
}
