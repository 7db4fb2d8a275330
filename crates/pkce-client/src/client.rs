//! Authorization code flow controller
//!
//! One [`PkceClient`] drives a single authorization attempt end to end:
//! build the authorize URL (persisting verifier and state), validate the
//! redirect and exchange the code for tokens, then refresh or revoke
//! those tokens later. The verifier and state live in the injected
//! [`Storage`] scope, not in the instance, so the exchange still works
//! after a page navigation recreates the client.
//!
//! Callers must not run two overlapping authorization starts against the
//! same storage scope; the second would overwrite the first's secrets.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::http::{CorsOptions, Credentials, Fetcher, FormRequest, Mode, ReqwestFetcher};
use crate::pkce;
use crate::storage::{MemoryStorage, SessionBinder, Storage, STATE_KEY, VERIFIER_KEY};

const ACCEPT_JSON: (&str, &str) = ("Accept", "application/json");
const CONTENT_TYPE_FORM_UTF8: (&str, &str) = (
    "Content-Type",
    "application/x-www-form-urlencoded;charset=UTF-8",
);
const CONTENT_TYPE_FORM: (&str, &str) = ("Content-Type", "application/x-www-form-urlencoded");

/// Token endpoint response body.
///
/// The shape is the provider's business: commonly-present fields get
/// typed access and everything else passes through in `extra` verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    /// Seconds until the access token expires (delta, not absolute)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Query parameters parsed from the provider's redirect back to us.
#[derive(Debug, Clone)]
pub struct AuthResponse {
    pub error: Option<String>,
    pub state: Option<String>,
    pub code: Option<String>,
}

impl AuthResponse {
    /// Parse the redirect URL's query string. Values are percent-decoded
    /// with `+` treated as space, per application/x-www-form-urlencoded.
    pub fn from_redirect_url(redirect_url: &str) -> Result<Self> {
        let url = Url::parse(redirect_url)
            .map_err(|e| Error::Parse(format!("invalid redirect URL: {e}")))?;

        let mut response = Self {
            error: None,
            state: None,
            code: None,
        };
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "error" => response.error = Some(value.into_owned()),
                "state" => response.state = Some(value.into_owned()),
                "code" => response.code = Some(value.into_owned()),
                _ => {}
            }
        }
        Ok(response)
    }
}

/// OAuth 2.0 authorization code flow client with PKCE.
pub struct PkceClient {
    config: Config,
    session: SessionBinder,
    fetcher: Arc<dyn Fetcher>,
    cors: CorsOptions,
}

impl std::fmt::Debug for PkceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PkceClient")
            .field("config", &self.config)
            .field("cors", &self.cors)
            .finish_non_exhaustive()
    }
}

impl PkceClient {
    /// Create a client with in-memory storage and the reqwest transport.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_parts(
            config,
            Arc::new(MemoryStorage::new()),
            Arc::new(ReqwestFetcher::new()),
        )
    }

    /// Create a client over a caller-supplied storage scope.
    pub fn with_storage(config: Config, storage: Arc<dyn Storage>) -> Result<Self> {
        Self::with_parts(config, storage, Arc::new(ReqwestFetcher::new()))
    }

    /// Create a client with both storage and transport injected.
    pub fn with_parts(
        config: Config,
        storage: Arc<dyn Storage>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            session: SessionBinder::new(storage),
            fetcher,
            cors: CorsOptions::default(),
        })
    }

    /// The stored CSRF state for the current authorization attempt.
    ///
    /// Fails with [`Error::NotInitialized`] before the first
    /// [`authorize_url`](Self::authorize_url) call.
    pub fn state(&self) -> Result<String> {
        self.session.require(STATE_KEY)
    }

    /// The stored code verifier for the current authorization attempt.
    pub fn code_verifier(&self) -> Result<String> {
        self.session.require(VERIFIER_KEY)
    }

    /// Toggle CORS credentials on the code-exchange request.
    ///
    /// Enabled sets `credentials=include, mode=cors`; disabled clears
    /// both. Only the exchange carries these options — refresh and revoke
    /// never need cross-origin cookies. Returns the resulting record.
    pub fn enable_cors_credentials(&mut self, enable: bool) -> CorsOptions {
        self.cors = if enable {
            CorsOptions {
                credentials: Some(Credentials::Include),
                mode: Some(Mode::Cors),
            }
        } else {
            CorsOptions::default()
        };
        self.cors
    }

    /// Build the authorization redirect URL, creating and persisting the
    /// verifier and state as needed.
    ///
    /// A caller-supplied `state` in `additional_params` is persisted and
    /// used as-is; any other caller parameter overrides the base set on
    /// key collision. The verifier is created before the challenge is
    /// derived from it, and both survive in storage for the exchange.
    pub fn authorize_url(&self, additional_params: &[(&str, &str)]) -> Result<String> {
        let verifier = self.session.get_or_create(VERIFIER_KEY);

        let state = match last_value(additional_params, "state") {
            Some(pinned) => {
                self.session.set(STATE_KEY, pinned);
                pinned.to_string()
            }
            None => self.session.get_or_create(STATE_KEY),
        };

        let challenge = pkce::derive_challenge(&verifier);

        let params = merge_params(
            vec![
                ("response_type".into(), "code".into()),
                ("client_id".into(), self.config.client_id.clone()),
                ("state".into(), state),
                ("scope".into(), self.config.requested_scopes.clone()),
                ("redirect_uri".into(), self.config.redirect_uri.clone()),
                ("code_challenge".into(), challenge),
                ("code_challenge_method".into(), "S256".into()),
            ],
            additional_params,
            &["state"],
        );

        let mut url = Url::parse(&self.config.authorization_endpoint)
            .map_err(|e| Error::Config(format!("invalid authorization_endpoint: {e}")))?;
        url.query_pairs_mut().extend_pairs(params);
        Ok(url.into())
    }

    /// Validate the redirect and exchange its authorization code for
    /// tokens.
    ///
    /// A provider `error` or a state mismatch fails before any network
    /// I/O. Transport and parse failures propagate; the token endpoint's
    /// JSON body is returned whatever its shape, success or not.
    pub async fn exchange_for_access_token(
        &self,
        redirect_url: &str,
        additional_params: &[(&str, &str)],
    ) -> Result<TokenResponse> {
        let auth = AuthResponse::from_redirect_url(redirect_url)?;

        if let Some(error) = auth.error {
            return Err(Error::Authorization(error));
        }

        let expected_state = self.session.require(STATE_KEY)?;
        if auth.state.as_deref() != Some(expected_state.as_str()) {
            return Err(Error::StateMismatch);
        }

        let verifier = self.session.require(VERIFIER_KEY)?;
        let code = auth.code.unwrap_or_default();
        debug!(endpoint = %self.config.token_endpoint, "exchanging authorization code");

        let form = merge_params(
            vec![
                ("grant_type".into(), "authorization_code".into()),
                ("code".into(), code),
                ("client_id".into(), self.config.client_id.clone()),
                ("redirect_uri".into(), self.config.redirect_uri.clone()),
                ("code_verifier".into(), verifier),
            ],
            additional_params,
            &[],
        );

        let response = self
            .fetcher
            .post_form(FormRequest {
                url: self.config.token_endpoint.clone(),
                headers: vec![ACCEPT_JSON, CONTENT_TYPE_FORM_UTF8],
                form,
                cors: self.cors,
            })
            .await?;

        serde_json::from_str(&response.body)
            .map_err(|e| Error::Parse(format!("token response: {e}")))
    }

    /// Trade a refresh token for a fresh token response.
    ///
    /// No verifier or state involved, and CORS options are never applied.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<TokenResponse> {
        debug!(endpoint = %self.config.token_endpoint, "refreshing access token");
        let response = self
            .fetcher
            .post_form(FormRequest {
                url: self.config.token_endpoint.clone(),
                headers: vec![ACCEPT_JSON, CONTENT_TYPE_FORM_UTF8],
                form: vec![
                    ("grant_type".into(), "refresh_token".into()),
                    ("client_id".into(), self.config.client_id.clone()),
                    ("refresh_token".into(), refresh_token.into()),
                ],
                cors: CorsOptions::default(),
            })
            .await?;

        serde_json::from_str(&response.body)
            .map_err(|e| Error::Parse(format!("refresh response: {e}")))
    }

    /// Best-effort token revocation (RFC 7009).
    ///
    /// Misconfiguration (no endpoint, insecure scheme) fails immediately.
    /// Ordinary failure does not: a non-2xx response or a transport error
    /// yields `Ok(false)`, since the caller can do nothing better than
    /// drop the token either way.
    pub async fn revoke_token(&self, token: &str, hint: &str) -> Result<bool> {
        let endpoint = self
            .config
            .revoke_endpoint
            .as_deref()
            .ok_or_else(|| Error::Config("revoke_endpoint is not configured".into()))?;

        let url = Url::parse(endpoint)
            .map_err(|e| Error::Config(format!("invalid revoke_endpoint: {e}")))?;
        let local = matches!(url.host_str(), Some("localhost") | Some("127.0.0.1"));
        if url.scheme() != "https" && !local {
            return Err(Error::InsecureEndpoint(url.scheme().to_string()));
        }

        let mut form = vec![
            ("token".to_string(), token.to_string()),
            ("client_id".to_string(), self.config.client_id.clone()),
        ];
        if !hint.is_empty() {
            form.push(("token_type_hint".to_string(), hint.to_string()));
        }

        debug!(endpoint, "revoking token");
        match self
            .fetcher
            .post_form(FormRequest {
                url: endpoint.to_string(),
                headers: vec![CONTENT_TYPE_FORM],
                form,
                cors: CorsOptions::default(),
            })
            .await
        {
            Ok(response) => Ok(response.is_success()),
            Err(e) => {
                warn!(error = %e, "token revocation request failed");
                Ok(false)
            }
        }
    }
}

/// Overlay caller parameters onto a base set, in order. A caller value
/// replaces a base value in place on key collision; keys in `skip` are
/// ignored because they were already folded into the base set.
fn merge_params(
    base: Vec<(String, String)>,
    overrides: &[(&str, &str)],
    skip: &[&str],
) -> Vec<(String, String)> {
    let mut merged = base;
    for (key, value) in overrides {
        if skip.contains(key) {
            continue;
        }
        match merged.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = (*value).to_string(),
            None => merged.push(((*key).to_string(), (*value).to_string())),
        }
    }
    merged
}

fn last_value<'a>(params: &'a [(&str, &str)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .rev()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
}
