//! Remote access layer: one shared HTTP contract, thin resource accessors
//!
//! Every backend interaction goes through [`ApiClient::call`], which resolves
//! the path against the configured base URL, attaches the persisted session
//! token when present and maps non-2xx responses to [`SyncError::Api`]. The
//! resource accessors add fixed paths and typed shapes, nothing else.

mod auth;
mod boards;
mod lists;
mod priorities;
mod tasks;

pub use auth::{AuthApi, SessionPayload};
pub use boards::BoardsApi;
pub use lists::ListsApi;
pub use priorities::PrioritiesApi;
pub use tasks::TasksApi;

use std::sync::Arc;

use reqwest::{Client, Method, Response};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::ApiConfig;
use crate::error::{Result, SyncError};
use crate::persist::{KeyValueStore, TOKEN_KEY};

/// Extract a human-readable message from a JSON error body.
///
/// Tries `msg`, then `message`, then falls back to the raw body.
fn extract_error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        if let Some(msg) = json.get("msg").and_then(|v| v.as_str()) {
            return msg.to_string();
        }
        if let Some(msg) = json.get("message").and_then(|v| v.as_str()) {
            return msg.to_string();
        }
    }
    body.to_string()
}

/// HTTP client for the board backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    persist: Arc<dyn KeyValueStore>,
}

impl ApiClient {
    /// Create a client from a config and the persistence port
    pub fn new(config: &ApiConfig, persist: Arc<dyn KeyValueStore>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            persist,
        })
    }

    /// The persistence port this client reads its token from
    pub fn persist(&self) -> &Arc<dyn KeyValueStore> {
        &self.persist
    }

    /// Issue a request against the backend
    ///
    /// The session token is read from the persistence port at call time, so a
    /// login that lands between two calls is picked up by the second one.
    #[instrument(skip(self, params))]
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        params: Option<Value>,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!("issuing request");

        let mut request = self.client.request(method, &url);

        if let Some(token) = self.persist.get(TOKEN_KEY) {
            request = request.header("token", token);
        }

        if let Some(params) = params {
            request = request.json(&params);
        }

        let response = request.send().await?;
        self.check_response(response).await
    }

    /// Map a non-2xx response to `SyncError::Api` carrying status and body message
    async fn check_response(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(SyncError::api(status.as_u16(), extract_error_message(&body)))
    }

    /// Board endpoints
    pub fn boards(&self) -> BoardsApi<'_> {
        BoardsApi { client: self }
    }

    /// List endpoints
    pub fn lists(&self) -> ListsApi<'_> {
        ListsApi { client: self }
    }

    /// Task endpoints
    pub fn tasks(&self) -> TasksApi<'_> {
        TasksApi { client: self }
    }

    /// Priority endpoints
    pub fn priorities(&self) -> PrioritiesApi<'_> {
        PrioritiesApi { client: self }
    }

    /// Auth and OAuth endpoints
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi { client: self }
    }
}
