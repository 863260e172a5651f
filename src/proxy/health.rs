use super::error::{timestamp, TransportFailure};
use super::AppState;
use crate::config::ProxyConfig;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Corps renvoyé par `GET /api/health-check`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HealthReport {
    #[serde(rename_all = "camelCase")]
    Reachable {
        status: String,
        external_api_status: u16,
        external_api_status_text: String,
        timestamp: String,
        reachable: bool,
    },
    #[serde(rename_all = "camelCase")]
    Unreachable {
        status: String,
        error: String,
        error_name: String,
        timestamp: String,
        reachable: bool,
    },
}

impl HealthReport {
    pub fn is_reachable(&self) -> bool {
        matches!(self, HealthReport::Reachable { reachable: true, .. })
    }
}

/// Sonde HEAD sans corps ; tout statut reçu compte comme joignable.
pub async fn probe(http: &reqwest::Client, config: &ProxyConfig) -> HealthReport {
    info!(target_url = %config.external_url, "health check started");
    match http
        .head(config.external_url.clone())
        .timeout(config.health_timeout)
        .send()
        .await
    {
        Ok(response) => {
            let status = response.status();
            info!(status = status.as_u16(), "health check response");
            HealthReport::Reachable {
                status: "success".to_string(),
                external_api_status: status.as_u16(),
                external_api_status_text: status.canonical_reason().unwrap_or("").to_string(),
                timestamp: timestamp(),
                reachable: true,
            }
        }
        Err(e) => {
            let failure = TransportFailure::classify(&e);
            error!(kind = failure.kind.error_name(), detail = %failure.detail, "health check failed");
            HealthReport::Unreachable {
                status: "error".to_string(),
                error: failure.message(),
                error_name: failure.kind.error_name().to_string(),
                timestamp: timestamp(),
                reachable: false,
            }
        }
    }
}

pub(super) async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let report = probe(&state.http, &state.config).await;
    let status = if report.is_reachable() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(report))
}
