use crate::model::{ScheduleRequest, ScheduleResponse};
use crate::proxy::{HealthReport, HEALTH_PATH, SCHEDULE_PATH};
use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Au-dessus du délai du proxy, pour que ce soit lui qui tranche.
pub const DEFAULT_CLIENT_TIMEOUT: Duration = Duration::from_secs(35);

pub const GENERIC_FAILURE_MESSAGE: &str = "근무표 생성 중 오류가 발생했습니다.";
const UNPARSEABLE_ERROR_MESSAGE: &str = "응답을 파싱할 수 없습니다.";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid proxy url {0}")]
    InvalidUrl(String),
    #[error("proxy rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid schedule payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// Message affiché dans le formulaire.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Rejected { message, .. } if !message.trim().is_empty() => message.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

/// Point de passage entre le formulaire et le proxy.
#[async_trait]
pub trait ScheduleClient: Send + Sync {
    async fn submit(&self, request: &ScheduleRequest) -> Result<ScheduleResponse, ClientError>;
}

/// Message extrait d'une réponse d'erreur du proxy.
pub fn rejection_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(data) => data
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| format!("HTTP {status} 오류가 발생했습니다.")),
        Err(_) => UNPARSEABLE_ERROR_MESSAGE.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct HttpScheduleClient {
    base: Url,
    http: reqwest::Client,
}

impl HttpScheduleClient {
    pub fn new(proxy_base: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base = Url::parse(proxy_base.trim())
            .map_err(|_| ClientError::InvalidUrl(proxy_base.to_string()))?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base, http })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base
            .join(path)
            .map_err(|_| ClientError::InvalidUrl(format!("{}{path}", self.base)))
    }

    /// Interroge `GET /api/health-check` ; un 500 porte aussi un rapport.
    pub async fn health(&self) -> Result<HealthReport, ClientError> {
        let response = self.http.get(self.endpoint(HEALTH_PATH)?).send().await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl ScheduleClient for HttpScheduleClient {
    async fn submit(&self, request: &ScheduleRequest) -> Result<ScheduleResponse, ClientError> {
        let url = self.endpoint(SCHEDULE_PATH)?;
        debug!(%url, nurses = request.nurse_list.len(), "submitting schedule request");
        let response = self.http.post(url).json(request).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = rejection_message(status.as_u16(), &body);
            warn!(status = status.as_u16(), %message, "schedule request rejected");
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        Ok(serde_json::from_str(&body)?)
    }
}
