//! Auth and OAuth endpoints

use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

use super::ApiClient;
use crate::error::Result;
use crate::types::UserId;

/// Token exchange response shared by login, signup, reconnect and OAuth
#[derive(Debug, Clone, Deserialize)]
pub struct SessionPayload {
    pub token: String,
    pub id: UserId,
    pub username: String,
}

/// Accessor for `/auth` and `/oauth` endpoints
pub struct AuthApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl AuthApi<'_> {
    /// POST /auth/login
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionPayload> {
        self.credential_call("/auth/login", username, password).await
    }

    /// POST /auth/signup
    pub async fn signup(&self, username: &str, password: &str) -> Result<SessionPayload> {
        self.credential_call("/auth/signup", username, password)
            .await
    }

    /// POST /auth/reconnect
    ///
    /// Credentials are empty; the persisted token attached by the client is
    /// what the backend validates.
    pub async fn reconnect(&self) -> Result<SessionPayload> {
        self.credential_call("/auth/reconnect", "", "").await
    }

    /// POST /oauth/github, exchanging the provider code for a session
    pub async fn oauth_github(&self, code: &str, state: &str) -> Result<SessionPayload> {
        let response = self
            .client
            .call(
                Method::POST,
                "/oauth/github",
                Some(json!({ "code": code, "state": state })),
            )
            .await?;
        Ok(response.json().await?)
    }

    async fn credential_call(
        &self,
        path: &str,
        username: &str,
        password: &str,
    ) -> Result<SessionPayload> {
        let response = self
            .client
            .call(
                Method::POST,
                path,
                Some(json!({ "username": username, "password": password })),
            )
            .await?;
        Ok(response.json().await?)
    }
}
