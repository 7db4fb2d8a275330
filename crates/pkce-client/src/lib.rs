//! OAuth 2.0 authorization code flow client with PKCE (RFC 7636)
//!
//! Client-side half of the PKCE flow plus token lifecycle operations
//! (refresh, revoke) and CSRF state verification. No server component:
//! one client session produces the authorization request, correlates the
//! redirect back to it, and exchanges the code for tokens without ever
//! holding a long-lived secret.
//!
//! Flow:
//! 1. `PkceClient::authorize_url()` creates and persists the verifier and
//!    state, then returns the URL to send the user to
//! 2. The provider redirects back with `code` and `state`
//! 3. `exchange_for_access_token()` rejects provider errors and forged
//!    state, then trades the code (plus the stored verifier) for tokens
//! 4. `refresh_access_token()` / `revoke_token()` manage the tokens after
//!
//! Storage and transport are injected capabilities (`Storage`, `Fetcher`)
//! so the same flow logic runs against session storage and browser fetch,
//! a file-backed store and reqwest, or in-memory fakes in tests.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod pkce;
pub mod storage;

pub use client::{AuthResponse, PkceClient, TokenResponse};
pub use config::Config;
pub use error::{Error, Result};
pub use http::{
    CorsOptions, Credentials, FetchResponse, Fetcher, FormRequest, Mode, ReqwestFetcher,
};
pub use pkce::{derive_challenge, generate_secret};
pub use storage::{MemoryStorage, Storage, STATE_KEY, VERIFIER_KEY};
