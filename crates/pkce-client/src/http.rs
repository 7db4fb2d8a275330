//! HTTP transport seam for token endpoint calls
//!
//! Every network operation in the flow is a form-encoded POST, so the
//! transport contract is a single [`Fetcher::post_form`]. The default
//! implementation uses reqwest; tests and embedded environments supply
//! their own.

use async_trait::async_trait;

use crate::error::{Error, Result};

/// Fetch-API credentials mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credentials {
    Omit,
    SameOrigin,
    Include,
}

/// Fetch-API request mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Cors,
    NoCors,
    SameOrigin,
    Navigate,
}

/// CORS toggles attached to an outbound request.
///
/// Both fields default to unset (same-origin behavior). These are
/// fetch-API concepts: the native reqwest transport carries them through
/// unenforced, and transports that sit on a browser fetch honor them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorsOptions {
    pub credentials: Option<Credentials>,
    pub mode: Option<Mode>,
}

/// One outbound form-encoded POST.
#[derive(Debug, Clone)]
pub struct FormRequest {
    pub url: String,
    pub headers: Vec<(&'static str, &'static str)>,
    pub form: Vec<(String, String)>,
    pub cors: CorsOptions,
}

/// Transport-level response: status plus raw body.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The fetch capability the flow client depends on.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn post_form(&self, request: FormRequest) -> Result<FetchResponse>;
}

/// Default [`Fetcher`] backed by a shared reqwest client.
#[derive(Default)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Fetcher for ReqwestFetcher {
    async fn post_form(&self, request: FormRequest) -> Result<FetchResponse> {
        // Explicit headers land after .form() so the charset-qualified
        // Content-Type wins over reqwest's default.
        let mut builder = self.client.post(&request.url).form(&request.form);
        for (name, value) in &request.headers {
            builder = builder.header(*name, *value);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Http(format!("request to {} failed: {e}", request.url)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Http(format!("reading response body: {e}")))?;

        Ok(FetchResponse { status, body })
    }
}
