//! Google Ads OAuth2 doctor
//!
//! Single-binary CLI that:
//! 1. Loads the client library configuration (client ID/secret, developer
//!    token, refresh token)
//! 2. Runs the configured OAuth2 flow (web or installed_app)
//! 3. Probes the Google Ads customer endpoint with the resulting token
//! 4. Classifies any failure and walks the operator through the fix

mod config;
mod console;

use std::process::ExitCode;

use anyhow::{Context, Result};
use google_ads_auth::LoopbackCapture;
use oauth_diagnosis::{
    DiagnosticConfig, Doctor, FileCredentialStore, FlowKind, SessionOutcome,
    normalize_customer_id, read_customer_id,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Command, Settings, USAGE};
use crate::console::ConsoleOperator;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let settings = match Settings::from_args(&args) {
        Ok(Command::Run(settings)) => settings,
        Ok(Command::Help) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{e}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    init_tracing(settings.verbose);

    match run(settings).await {
        Ok(SessionOutcome::Healthy { .. }) => ExitCode::SUCCESS,
        Ok(SessionOutcome::Diagnosed { .. }) => ExitCode::from(1),
        Err(e) => {
            error!(error = %format!("{e:#}"), "diagnostic pass aborted");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

/// Logs go to stderr so they never mix into operator prompts on stdout.
/// LOG_LEVEL / RUST_LOG override the default filter; LOG_FORMAT=json
/// switches to JSON lines.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("LOG_LEVEL")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    let registry = tracing_subscriber::registry().with(filter);

    if std::env::var("LOG_FORMAT").is_ok_and(|f| f == "json") {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(settings: Settings) -> Result<SessionOutcome> {
    info!(path = %settings.config_path.display(), flow = %settings.flow, "loading client library configuration");
    let mut store = FileCredentialStore::load(settings.config_path.clone()).with_context(|| {
        format!(
            "failed to load client library configuration from {}",
            settings.config_path.display()
        )
    })?;
    let mut operator = ConsoleOperator::stdio();

    let customer_id = match settings
        .customer_id
        .as_deref()
        .map(normalize_customer_id)
        .filter(|id| !id.is_empty())
    {
        Some(id) => id,
        None => read_customer_id(&mut operator).context("reading customer ID")?,
    };

    let http = reqwest::Client::builder()
        .timeout(settings.timeout)
        .build()
        .context("building HTTP client")?;

    let config = DiagnosticConfig {
        customer_id,
        flow: settings.flow,
        verbose: settings.verbose,
    };

    let outcome = match settings.flow {
        FlowKind::InstalledApp => {
            let mut capture = LoopbackCapture::bind(settings.redirect_port)
                .await
                .context("starting redirect listener")?;
            Doctor::new(http, config, &mut store, &mut operator)
                .with_capture(&mut capture)
                .run()
                .await?
        }
        FlowKind::Web => {
            Doctor::new(http, config, &mut store, &mut operator)
                .run()
                .await?
        }
    };

    info!(?outcome, "diagnostic pass finished");
    Ok(outcome)
}
