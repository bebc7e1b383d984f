//! Client settings: `GET /api/config`.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::config::ClientConfig;
use crate::http::server::AppState;

/// Non-secret values the browser needs to build its queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSettings {
    pub semantic_configuration: String,
    pub storage_account_url: String,
}

impl From<&ClientConfig> for ClientSettings {
    fn from(config: &ClientConfig) -> Self {
        Self {
            semantic_configuration: config.semantic_configuration.clone(),
            storage_account_url: config.storage_account_url.clone(),
        }
    }
}

pub async fn config_handler(State(state): State<AppState>) -> Json<ClientSettings> {
    Json(state.client_settings.as_ref().clone())
}
