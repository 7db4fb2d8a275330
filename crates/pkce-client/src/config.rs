//! Client configuration

use crate::error::{Error, Result};

/// Immutable configuration for one OAuth client.
///
/// Required fields must be non-empty; [`crate::PkceClient`] validates
/// them at construction. The revoke endpoint is optional because many
/// providers do not implement RFC 7009.
#[derive(Debug, Clone)]
pub struct Config {
    /// OAuth client ID (public, not a secret)
    pub client_id: String,
    /// Redirect URI registered with the provider
    pub redirect_uri: String,
    /// Authorization endpoint the user is sent to
    pub authorization_endpoint: String,
    /// Token endpoint for code exchange and refresh
    pub token_endpoint: String,
    /// Scopes to request, space-separated
    pub requested_scopes: String,
    /// Token revocation endpoint, if the provider has one
    pub revoke_endpoint: Option<String>,
}

impl Config {
    pub fn new(
        client_id: impl Into<String>,
        redirect_uri: impl Into<String>,
        authorization_endpoint: impl Into<String>,
        token_endpoint: impl Into<String>,
        requested_scopes: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            redirect_uri: redirect_uri.into(),
            authorization_endpoint: authorization_endpoint.into(),
            token_endpoint: token_endpoint.into(),
            requested_scopes: requested_scopes.into(),
            revoke_endpoint: None,
        }
    }

    pub fn with_revoke_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.revoke_endpoint = Some(endpoint.into());
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let required = [
            ("client_id", &self.client_id),
            ("redirect_uri", &self.redirect_uri),
            ("authorization_endpoint", &self.authorization_endpoint),
            ("token_endpoint", &self.token_endpoint),
            ("requested_scopes", &self.requested_scopes),
        ];
        for (name, value) in required {
            if value.is_empty() {
                return Err(Error::Config(format!("{name} must not be empty")));
            }
        }
        Ok(())
    }
}
