//! PKCE (RFC 7636) and consent URL construction for the installed-app flow
//!
//! Google accepts S256 challenges on installed-app clients. The verifier
//! stays in memory for the duration of one diagnostic pass and is sent with
//! the code exchange; the challenge and a random `state` go into the
//! consent URL.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngExt;
use sha2::{Digest, Sha256};

use crate::constants::SCOPE;

/// Generate a cryptographically random PKCE code verifier.
///
/// 64 random bytes encode to 86 URL-safe base64 characters, inside the
/// 43-128 character window Google enforces.
pub fn generate_verifier() -> String {
    let mut bytes = [0u8; 64];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Generate an opaque `state` value for CSRF protection on the redirect.
pub fn generate_state() -> String {
    let mut bytes = [0u8; 16];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Compute the S256 code challenge from a verifier.
///
/// `challenge = BASE64URL(SHA256(verifier))`
pub fn compute_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Build the consent URL for the installed-app flow.
///
/// `access_type=offline` and `prompt=consent` make Google return a refresh
/// token even when the user already granted the scope to this client.
pub fn build_authorization_url(
    authorize_endpoint: &str,
    client_id: &str,
    redirect_uri: &str,
    state: &str,
    challenge: &str,
) -> String {
    format!(
        "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&prompt=consent&code_challenge={}&code_challenge_method=S256&state={}",
        authorize_endpoint,
        urlencoded(client_id),
        urlencoded(redirect_uri),
        urlencoded(SCOPE),
        challenge,
        state,
    )
}

/// Minimal URL encoding for parameter values.
/// Only encodes characters that would break URL parameter parsing.
fn urlencoded(s: &str) -> String {
    s.replace('%', "%25")
        .replace(' ', "%20")
        .replace(':', "%3A")
        .replace('/', "%2F")
        .replace('?', "%3F")
        .replace('&', "%26")
        .replace('=', "%3D")
        .replace('+', "%2B")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::AUTHORIZE_ENDPOINT;

    #[test]
    fn verifier_length_is_within_google_limits() {
        let verifier = generate_verifier();
        assert_eq!(verifier.len(), 86);
        assert!(
            verifier
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
            "verifier must be URL-safe base64 (no padding): {verifier}"
        );
    }

    #[test]
    fn states_are_unique() {
        assert_ne!(generate_state(), generate_state());
    }

    #[test]
    fn challenge_matches_known_value() {
        // SHA256("hello") base64url-encoded without padding
        let challenge = compute_challenge("hello");
        assert_eq!(challenge, "LPJNul-wow4m6DsqxbninhsWHlwfp0JecwQzYpOLmCQ");
    }

    #[test]
    fn authorization_url_requests_offline_adwords_access() {
        let challenge = compute_challenge("test-verifier");
        let url = build_authorization_url(
            AUTHORIZE_ENDPOINT,
            "abc.apps.googleusercontent.com",
            "http://127.0.0.1:8085",
            "state-123",
            &challenge,
        );

        assert!(url.starts_with(AUTHORIZE_ENDPOINT));
        assert!(url.contains("client_id=abc.apps.googleusercontent.com"));
        assert!(url.contains("redirect_uri=http%3A%2F%2F127.0.0.1%3A8085"));
        assert!(url.contains("scope=https%3A%2F%2Fwww.googleapis.com%2Fauth%2Fadwords"));
        assert!(url.contains("access_type=offline"));
        assert!(url.contains("prompt=consent"));
        assert!(url.contains(&format!("code_challenge={challenge}")));
        assert!(url.contains("state=state-123"));
    }
}
