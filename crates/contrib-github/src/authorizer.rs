use contrib_core::Result;
use serde_json::Value;

/// Provider name passed to every [`Authorizer`] call.
pub const PROVIDER: &str = "github";

/// Grant needed to read the profile and contribution calendar.
pub const REQUIRED_SCOPE: &str = "read:user";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
}

/// An API call relative to the provider's base URL.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApiRequest {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post_json(body: Value) -> Self {
        Self {
            method: Method::Post,
            headers: Vec::new(),
            body: Some(body),
        }
        .header("Content-Type", "application/json")
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// What came back. `error` is set when the call failed before a usable
/// response existed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApiResponse {
    pub status: u16,
    pub data: Value,
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            status: 200,
            data,
            error: None,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            data: Value::Null,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: 0,
            data: Value::Null,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none() && (200..300).contains(&self.status)
    }
}

/// Credential gate and request channel for a provider.
#[async_trait::async_trait]
pub trait Authorizer: Send + Sync {
    async fn is_connected(&self, provider: &str) -> Result<bool>;

    /// Providers that cannot report grants are assumed to have them.
    async fn has_scope(&self, _provider: &str, _scope: &str) -> Result<bool> {
        Ok(true)
    }

    async fn request(&self, provider: &str, path: &str, request: ApiRequest) -> Result<ApiResponse>;
}
