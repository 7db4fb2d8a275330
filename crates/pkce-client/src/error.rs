//! Error types for PKCE flow operations

use thiserror::Error;

/// Errors from the authorization flow and token lifecycle operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A required configuration field is missing or empty.
    #[error("configuration error: {0}")]
    Config(String),

    /// The revoke endpoint does not use secure transport.
    ///
    /// Message format is stable; callers match on it.
    #[error("Protocol {0}: not allowed with this action.")]
    InsecureEndpoint(String),

    /// Verifier or state was read before any authorization flow stored it.
    #[error("{0} has not been initialized")]
    NotInitialized(&'static str),

    /// The authorization server returned an `error` parameter on redirect.
    /// Carries the provider-supplied error code verbatim.
    #[error("{0}")]
    Authorization(String),

    /// The redirect `state` did not match the stored state.
    #[error("Invalid State")]
    StateMismatch,

    /// HTTP transport failure.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Response body could not be parsed.
    #[error("invalid response body: {0}")]
    Parse(String),
}

/// Result alias for flow operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insecure_endpoint_message_is_stable() {
        let err = Error::InsecureEndpoint("http".into());
        assert_eq!(err.to_string(), "Protocol http: not allowed with this action.");
    }

    #[test]
    fn state_mismatch_message_is_stable() {
        assert_eq!(Error::StateMismatch.to_string(), "Invalid State");
    }

    #[test]
    fn authorization_error_carries_provider_code() {
        let err = Error::Authorization("access_denied".into());
        assert_eq!(err.to_string(), "access_denied");
    }
}
