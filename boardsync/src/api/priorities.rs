//! Priority endpoints

use reqwest::Method;
use serde::Deserialize;

use super::ApiClient;
use crate::error::Result;
use crate::types::Priority;

/// Envelope for the priority lookup set
#[derive(Debug, Deserialize)]
struct PriorityListEnvelope {
    result: Vec<Priority>,
}

/// Accessor for the `/priorities` endpoint
pub struct PrioritiesApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl PrioritiesApi<'_> {
    /// GET /priorities
    pub async fn fetch_priorities(&self) -> Result<Vec<Priority>> {
        let response = self.client.call(Method::GET, "/priorities", None).await?;
        let envelope: PriorityListEnvelope = response.json().await?;
        Ok(envelope.result)
    }
}
