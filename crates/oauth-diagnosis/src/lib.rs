//! OAuth2 diagnostic engine for Google Ads API client configurations
//!
//! One diagnostic pass runs the configured flow end to end:
//! 1. `flow::Doctor` obtains an access token (installed-app code exchange or
//!    web refresh grant) using fields read from a `store::CredentialStore`
//! 2. `probe::probe_account()` calls the customer endpoint with that token
//! 3. On failure, `classifier::classify()` reduces the error to one
//!    `DiagnosticCode`
//! 4. `remediation::remediate()` reports, waits for the operator, or
//!    replaces credentials through the store
//!
//! Operator interaction goes through the `operator::Operator` trait so the
//! engine runs the same against a terminal or a scripted test double.

pub mod classifier;
pub mod code;
pub mod error;
pub mod flow;
pub mod operator;
pub mod probe;
pub mod remediation;
pub mod store;

#[cfg(test)]
mod testing;

pub use classifier::{RawError, classify, surfaced_message};
pub use code::{DiagnosticCode, FlowKind};
pub use error::{Error, Result};
pub use flow::{DiagnosticConfig, Doctor, SessionOutcome};
pub use operator::{Operator, is_affirmative, normalize_customer_id, read_customer_id};
pub use remediation::{Remediation, remediate};
pub use store::{CredentialField, CredentialStore, FileCredentialStore};
