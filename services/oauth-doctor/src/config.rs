//! Command-line settings
//!
//! Precedence: CLI args > env vars > defaults. The credential file itself is
//! loaded by `oauth_diagnosis::FileCredentialStore`; this module only decides
//! where it is and how the pass runs.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use oauth_diagnosis::FlowKind;

/// Default per-request network timeout
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const DEFAULT_CONFIG_FILE: &str = "google-ads.toml";

pub const USAGE: &str = "\
Usage: oauth-doctor [OPTIONS]

Diagnose the OAuth2 setup of a Google Ads API client library configuration.

Options:
  --config <PATH>         Client library configuration (env GOOGLE_ADS_CONFIG_PATH, default google-ads.toml)
  --customer-id <ID>      Google Ads account to probe (prompted when omitted)
  --oauth-type <TYPE>     web | installed_app (default web)
  --timeout-secs <N>      Network timeout per request (env OAUTH_DOCTOR_TIMEOUT_SECS, default 30)
  --redirect-port <PORT>  Loopback port for installed_app consent (default: any free port)
  --verbose               Show raw responses and debug logs
  --help                  Show this message";

/// Flags that take a value
const VALUE_FLAGS: &[&str] = &[
    "--config",
    "--customer-id",
    "--oauth-type",
    "--timeout-secs",
    "--redirect-port",
];

/// Resolved settings for one run.
#[derive(Debug)]
pub struct Settings {
    pub config_path: PathBuf,
    pub customer_id: Option<String>,
    pub flow: FlowKind,
    pub verbose: bool,
    pub timeout: Duration,
    pub redirect_port: u16,
}

#[derive(Debug)]
pub enum Command {
    Run(Settings),
    Help,
}

impl Settings {
    /// Parse process arguments (without the program name).
    ///
    /// A value flag given more than once keeps its last value.
    pub fn from_args(args: &[String]) -> common::Result<Command> {
        let mut verbose = false;
        let mut values: HashMap<&str, &str> = HashMap::new();
        let mut rest = args.iter().map(String::as_str);
        while let Some(arg) = rest.next() {
            match arg {
                "--help" | "-h" => return Ok(Command::Help),
                "--verbose" | "-v" => verbose = true,
                flag if VALUE_FLAGS.contains(&flag) => match rest.next() {
                    Some(value) if !value.starts_with("--") => {
                        values.insert(flag, value);
                    }
                    _ => {
                        return Err(common::Error::Config(format!("{flag} requires a value")));
                    }
                },
                other => {
                    return Err(common::Error::Config(format!(
                        "unknown argument: {other}"
                    )));
                }
            }
        }

        let flow = match values.get("--oauth-type") {
            Some(raw) => raw
                .parse::<FlowKind>()
                .map_err(|e| common::Error::Config(e.to_string()))?,
            None => FlowKind::Web,
        };

        let redirect_port = match values.get("--redirect-port") {
            Some(raw) => raw.parse::<u16>().map_err(|e| {
                common::Error::Config(format!("invalid --redirect-port {raw:?}: {e}"))
            })?,
            None => 0,
        };

        Ok(Command::Run(Settings {
            config_path: Self::resolve_path(values.get("--config").copied()),
            customer_id: values.get("--customer-id").map(|id| (*id).to_owned()),
            flow,
            verbose,
            timeout: resolve_timeout(values.get("--timeout-secs").copied())?,
            redirect_port,
        }))
    }

    /// Resolve config file path from CLI arg or GOOGLE_ADS_CONFIG_PATH env var.
    pub fn resolve_path(cli_path: Option<&str>) -> PathBuf {
        if let Some(p) = cli_path {
            return PathBuf::from(p);
        }
        if let Ok(p) = std::env::var("GOOGLE_ADS_CONFIG_PATH") {
            return PathBuf::from(p);
        }
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }
}

fn resolve_timeout(cli: Option<&str>) -> common::Result<Duration> {
    let env = std::env::var("OAUTH_DOCTOR_TIMEOUT_SECS").ok();
    let secs = match cli.or(env.as_deref()) {
        Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
            common::Error::Config(format!("invalid timeout {raw:?}: {e}"))
        })?,
        None => DEFAULT_TIMEOUT_SECS,
    };
    if secs == 0 {
        return Err(common::Error::Config(
            "timeout_secs must be greater than 0".into(),
        ));
    }
    Ok(Duration::from_secs(secs))
}
