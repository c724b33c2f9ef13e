use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use contrib_core::{Result, SyncError};

use crate::authorizer::{ApiRequest, ApiResponse, Authorizer};

/// One recorded `request` call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub provider: String,
    pub path: String,
    pub request: ApiRequest,
}

/// Scripted authorizer for testing. Pops responses per path on each call.
/// If none are queued (or they are exhausted), returns a 404.
pub struct MockAuthorizer {
    connected: AtomicBool,
    scope_granted: AtomicBool,
    connectivity_fails: AtomicBool,
    connectivity_checks: AtomicUsize,
    responses: Mutex<HashMap<String, VecDeque<ApiResponse>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl Default for MockAuthorizer {
    fn default() -> Self {
        Self::connected()
    }
}

impl MockAuthorizer {
    pub fn connected() -> Self {
        Self {
            connected: AtomicBool::new(true),
            scope_granted: AtomicBool::new(true),
            connectivity_fails: AtomicBool::new(false),
            connectivity_checks: AtomicUsize::new(0),
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn disconnected() -> Self {
        let auth = Self::connected();
        auth.set_connected(false);
        auth
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    pub fn set_scope_granted(&self, granted: bool) {
        self.scope_granted.store(granted, Ordering::SeqCst);
    }

    /// Make `is_connected` itself fail.
    pub fn set_connectivity_fails(&self, fails: bool) {
        self.connectivity_fails.store(fails, Ordering::SeqCst);
    }

    pub fn push_response(&self, path: &str, response: ApiResponse) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(path.to_string())
            .or_default()
            .push_back(response);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Network calls made so far. Connectivity checks are not counted.
    pub fn request_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn connectivity_checks(&self) -> usize {
        self.connectivity_checks.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Authorizer for MockAuthorizer {
    async fn is_connected(&self, _provider: &str) -> Result<bool> {
        self.connectivity_checks.fetch_add(1, Ordering::SeqCst);
        if self.connectivity_fails.load(Ordering::SeqCst) {
            return Err(SyncError::Authorization("connectivity check failed".into()));
        }
        Ok(self.connected.load(Ordering::SeqCst))
    }

    async fn has_scope(&self, _provider: &str, _scope: &str) -> Result<bool> {
        Ok(self.scope_granted.load(Ordering::SeqCst))
    }

    async fn request(&self, provider: &str, path: &str, request: ApiRequest) -> Result<ApiResponse> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RecordedCall {
                provider: provider.to_string(),
                path: path.to_string(),
                request,
            });
        let mut map = self.responses.lock().unwrap_or_else(|e| e.into_inner());
        Ok(map
            .get_mut(path)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| ApiResponse::status(404)))
    }
}
