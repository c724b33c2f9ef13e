use contrib_core::{Result, SyncError};
use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION, USER_AGENT};
use serde_json::Value;
use tracing::{debug, warn};

use crate::authorizer::{ApiRequest, ApiResponse, Authorizer, Method, PROVIDER};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const SCOPES_HEADER: &str = "x-oauth-scopes";

/// Token-based authorizer talking to the GitHub REST/GraphQL API.
///
/// "Connected" means a non-empty token is configured.
#[derive(Clone)]
pub struct HttpAuthorizer {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpAuthorizer {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    /// Token from `GITHUB_TOKEN`, default API URL.
    pub fn from_env() -> Self {
        Self::new(DEFAULT_API_URL, std::env::var("GITHUB_TOKEN").ok())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn check_provider(provider: &str) -> Result<()> {
        if provider == PROVIDER {
            Ok(())
        } else {
            Err(SyncError::Authorization(format!("unsupported provider: {provider}")))
        }
    }

    fn build(&self, path: &str, request: &ApiRequest) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        builder = builder.header(USER_AGENT, concat!("contrib-graph/", env!("CARGO_PKG_VERSION")));
        if let Some(token) = &self.token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        for (name, value) in &request.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(n), Ok(v)) => builder = builder.header(n, v),
                _ => warn!(target: "contrib::github", header = %name, "skipping invalid header"),
            }
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        builder
    }
}

#[async_trait::async_trait]
impl Authorizer for HttpAuthorizer {
    async fn is_connected(&self, provider: &str) -> Result<bool> {
        Self::check_provider(provider)?;
        Ok(self.token.is_some())
    }

    /// Classic tokens list their grants in `X-OAuth-Scopes`; fine-grained
    /// tokens send no such header and are assumed sufficient.
    async fn has_scope(&self, provider: &str, scope: &str) -> Result<bool> {
        Self::check_provider(provider)?;
        let response = self
            .build("/user", &ApiRequest::get())
            .send()
            .await
            .map_err(|e| SyncError::Authorization(format!("scope check failed: {e}")))?;
        let Some(header) = response.headers().get(SCOPES_HEADER) else {
            return Ok(true);
        };
        let granted = header.to_str().unwrap_or_default();
        // `user` implies `read:user`.
        let parent = scope.split(':').nth(1).unwrap_or(scope);
        Ok(granted
            .split(',')
            .map(str::trim)
            .any(|s| s == scope || s == parent))
    }

    async fn request(&self, provider: &str, path: &str, request: ApiRequest) -> Result<ApiResponse> {
        Self::check_provider(provider)?;
        debug!(target: "contrib::github", path, method = ?request.method, "request");
        let response = match self.build(path, &request).send().await {
            Ok(r) => r,
            Err(e) => return Ok(ApiResponse::failed(e.to_string())),
        };
        let status = response.status().as_u16();
        let data = match response.json::<Value>().await {
            Ok(v) => v,
            Err(e) => {
                debug!(target: "contrib::github", path, status, error = %e, "response body is not JSON");
                Value::Null
            }
        };
        debug!(target: "contrib::github", path, status, "response");
        Ok(ApiResponse {
            status,
            data,
            error: None,
        })
    }
}
