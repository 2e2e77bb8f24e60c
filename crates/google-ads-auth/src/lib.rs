//! Google Ads OAuth2 authentication library
//!
//! Provides the pieces the doctor needs to obtain a usable access token for
//! the Google Ads API: PKCE/state generation and the consent URL, the
//! authorization-code and refresh-token grants against Google's token
//! endpoint, an authorized HTTP client, and a loopback listener that
//! captures the authorization code after consent.
//!
//! Installed-app flow:
//! 1. Doctor binds a `redirect::LoopbackCapture` and builds the consent URL
//!    with `pkce::build_authorization_url()`
//! 2. Operator consents in the browser; the listener receives `?code=&state=`
//! 3. `token::exchange_code()` trades the code for access + refresh tokens
//! 4. `token::AuthorizedClient` attaches the bearer token to API calls
//!
//! Web flow skips steps 1-3 and calls `token::refresh_access_token()` with
//! the refresh token already stored in the client library configuration.

pub mod constants;
pub mod error;
pub mod pkce;
pub mod redirect;
pub mod token;

pub use constants::*;
pub use error::{Error, Result};
pub use pkce::{build_authorization_url, compute_challenge, generate_state, generate_verifier};
pub use redirect::{LoopbackCapture, RedirectCapture};
pub use token::{
    AuthorizedClient, ClientCredentials, TokenResponse, exchange_code, refresh_access_token,
};
