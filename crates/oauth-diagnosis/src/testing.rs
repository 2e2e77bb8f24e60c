//! Test doubles shared by the engine's unit tests

use std::collections::{BTreeMap, VecDeque};
use std::future::Future;
use std::pin::Pin;

use axum::http::StatusCode;
use google_ads_auth::{Endpoints, RedirectCapture};
use tokio::net::TcpListener;

use crate::error::{Error, Result};
use crate::operator::{Operator, strip_newline};
use crate::store::{CredentialField, CredentialStore};

/// In-memory store that records every replacement.
#[derive(Debug, Default)]
pub struct MemoryStore {
    fields: BTreeMap<CredentialField, String>,
    pub writes: Vec<(CredentialField, String)>,
    /// Successful writes left before every later write fails
    write_budget: Option<usize>,
}

impl MemoryStore {
    pub fn with(mut self, field: CredentialField, value: &str) -> Self {
        self.fields.insert(field, value.to_owned());
        self
    }

    pub fn without(mut self, field: CredentialField) -> Self {
        self.fields.remove(&field);
        self
    }

    /// A full store whose writes always fail.
    pub fn failing() -> Self {
        full_store().failing_after(0)
    }

    /// Accept `writes` successful writes, then fail every later one.
    pub fn failing_after(mut self, writes: usize) -> Self {
        self.write_budget = Some(writes);
        self
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, field: CredentialField) -> Option<String> {
        self.fields.get(&field).filter(|v| !v.trim().is_empty()).cloned()
    }

    fn replace_many(&mut self, updates: &[(CredentialField, &str)]) -> Result<()> {
        if let Some((field, _)) = updates.iter().find(|(field, _)| !field.is_writable()) {
            return Err(Error::ReadOnlyField(field.key()));
        }
        match self.write_budget {
            Some(0) => return Err(Error::StoreIo("disk full".into())),
            Some(ref mut left) => *left -= 1,
            None => {}
        }
        for (field, value) in updates {
            self.fields.insert(*field, (*value).to_owned());
            self.writes.push((*field, (*value).to_owned()));
        }
        Ok(())
    }

    fn location(&self) -> String {
        "memory".into()
    }
}

/// Store with every field populated.
pub fn full_store() -> MemoryStore {
    MemoryStore::default()
        .with(CredentialField::ClientId, "123-abc.apps.googleusercontent.com")
        .with(CredentialField::ClientSecret, "secretXYZ")
        .with(CredentialField::DeveloperToken, "dev-token")
        .with(CredentialField::LoginCustomerId, "1112223333")
        .with(CredentialField::RefreshToken, "1//stored")
}

/// Operator that replays canned answers and records what it was shown.
#[derive(Debug, Default)]
pub struct ScriptedOperator {
    answers: VecDeque<String>,
    pub messages: Vec<String>,
    pub prompts: Vec<String>,
}

impl ScriptedOperator {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| (*a).to_owned()).collect(),
            ..Self::default()
        }
    }

    pub fn transcript(&self) -> String {
        self.messages.join("\n")
    }
}

impl Operator for ScriptedOperator {
    fn inform(&mut self, message: &str) {
        self.messages.push(message.to_owned());
    }

    fn read_line(&mut self, prompt: &str) -> Result<String> {
        self.prompts.push(prompt.to_owned());
        let answer = self
            .answers
            .pop_front()
            .ok_or_else(|| Error::Operator("input closed".into()))?;
        Ok(strip_newline(&answer).to_owned())
    }
}

/// Redirect capture that hands back a fixed code without a browser.
pub struct FixedCapture {
    pub code: String,
    pub seen_state: Option<String>,
}

impl FixedCapture {
    pub fn new(code: &str) -> Self {
        Self {
            code: code.to_owned(),
            seen_state: None,
        }
    }
}

impl RedirectCapture for FixedCapture {
    fn redirect_uri(&self) -> String {
        "http://127.0.0.1:8085".into()
    }

    fn wait_for_code<'a>(
        &'a mut self,
        expected_state: &'a str,
    ) -> Pin<Box<dyn Future<Output = google_ads_auth::Result<String>> + Send + 'a>> {
        self.seen_state = Some(expected_state.to_owned());
        let code = self.code.clone();
        Box::pin(async move { Ok(code) })
    }
}

/// Serve `app` on an ephemeral loopback port and return its base URL.
pub async fn serve(app: axum::Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Router answering every request with `status` and a JSON `body`.
pub fn fixed_response(status: StatusCode, body: &'static str) -> axum::Router {
    axum::Router::new().fallback(move || async move {
        (status, [("content-type", "application/json")], body)
    })
}

/// Endpoints with the token URL under `token_base` and the API under `ads_base`.
pub fn local_endpoints(token_base: &str, ads_base: &str) -> Endpoints {
    Endpoints {
        authorize_url: format!("{token_base}/auth"),
        token_url: format!("{token_base}/token"),
        ads_api_base: ads_base.to_owned(),
        ..Endpoints::default()
    }
}
