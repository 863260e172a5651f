use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use std::error::Error as StdError;
use thiserror::Error;

pub const PARSE_FAILURE_MESSAGE: &str = "서버 응답을 파싱할 수 없습니다.";

/// Classe d'échec réseau vers le service externe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Timeout,
    Connect,
    Certificate,
    Network,
}

impl TransportKind {
    pub fn error_name(self) -> &'static str {
        match self {
            TransportKind::Timeout => "TimeoutError",
            TransportKind::Connect => "ConnectError",
            TransportKind::Certificate => "CertificateError",
            TransportKind::Network => "NetworkError",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    pub kind: TransportKind,
    pub detail: String,
}

impl TransportFailure {
    pub fn classify(err: &reqwest::Error) -> Self {
        let causes = source_chain(err);
        let kind = if err.is_timeout() {
            TransportKind::Timeout
        } else if mentions_tls(&causes) {
            // les échecs de poignée de main TLS remontent aussi en `is_connect`
            TransportKind::Certificate
        } else if err.is_connect() {
            TransportKind::Connect
        } else {
            TransportKind::Network
        };
        let detail = if causes.is_empty() {
            err.to_string()
        } else {
            format!("{err}: {causes}")
        };
        Self { kind, detail }
    }

    pub fn message(&self) -> String {
        match self.kind {
            TransportKind::Timeout => {
                "요청 시간이 초과되었습니다. 스케줄링 서비스가 응답하지 않습니다.".to_string()
            }
            TransportKind::Connect => {
                "네트워크 연결에 실패했습니다. DNS 해석 또는 연결 문제일 수 있습니다.".to_string()
            }
            TransportKind::Certificate => "SSL/TLS 인증서 문제가 발생했습니다.".to_string(),
            TransportKind::Network => format!("네트워크 오류: {}", self.detail),
        }
    }
}

/// Causes sous-jacentes, sans le message de tête qui contient l'URL.
fn source_chain(err: &reqwest::Error) -> String {
    let mut parts = Vec::new();
    let mut source = err.source();
    while let Some(cause) = source {
        parts.push(cause.to_string());
        source = cause.source();
    }
    parts.join(": ")
}

fn mentions_tls(causes: &str) -> bool {
    let lowered = causes.to_lowercase();
    ["certificate", "ssl", "tls", "handshake"]
        .iter()
        .any(|needle| lowered.contains(needle))
}

/// Réponse non-2xx du service externe.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamRejection {
    pub status: StatusCode,
    pub raw: String,
    pub parsed: Option<Value>,
}

impl UpstreamRejection {
    /// Le corps est lu en texte puis tenté en JSON.
    pub fn new(status: StatusCode, raw: String) -> Self {
        let parsed = if raw.trim().is_empty() {
            None
        } else {
            serde_json::from_str(&raw).ok()
        };
        Self { status, raw, parsed }
    }

    pub fn status_text(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("")
    }

    pub fn details(&self) -> Value {
        match &self.parsed {
            Some(v) => v.clone(),
            None if self.raw.trim().is_empty() => json!({
                "message": format!("HTTP {}: {}", self.status.as_u16(), self.status_text())
            }),
            None => json!({ "message": self.raw }),
        }
    }

    /// Message du service s'il en fournit un en JSON, sinon le libellé du statut.
    pub fn message(&self) -> String {
        self.parsed
            .as_ref()
            .and_then(|v| v.get("message"))
            .and_then(Value::as_str)
            .filter(|m| !m.trim().is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| status_message(self.status))
    }
}

/// Libellé utilisateur pour un statut HTTP en échec.
pub fn status_message(status: StatusCode) -> String {
    match status.as_u16() {
        400 => "잘못된 요청입니다. 입력 데이터를 확인해주세요.".to_string(),
        401 => "인증이 필요합니다.".to_string(),
        403 => "접근이 거부되었습니다.".to_string(),
        404 => "API 엔드포인트를 찾을 수 없습니다.".to_string(),
        429 => "요청이 너무 많습니다. 잠시 후 다시 시도해주세요.".to_string(),
        500 => "서버 내부 오류가 발생했습니다.".to_string(),
        502 => "게이트웨이 오류가 발생했습니다.".to_string(),
        503 => "서비스를 사용할 수 없습니다.".to_string(),
        504 => "게이트웨이 시간 초과가 발생했습니다.".to_string(),
        code => format!(
            "서버 오류 ({code}): {}",
            status.canonical_reason().unwrap_or("")
        ),
    }
}

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("invalid request body: {0}")]
    InvalidRequest(String),
    #[error("transport failure ({}): {}", .0.kind.error_name(), .0.detail)]
    Transport(TransportFailure),
    #[error("upstream rejected request with status {}", .0.status)]
    Upstream(UpstreamRejection),
    #[error("unparseable upstream response: {0}")]
    Parse(String),
}

pub(crate) fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ProxyError::InvalidRequest(detail) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "message": format!("요청 형식이 올바르지 않습니다: {detail}"),
                    "error": "InvalidRequest",
                    "timestamp": timestamp(),
                }),
            ),
            ProxyError::Transport(failure) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "message": failure.message(),
                    "error": failure.kind.error_name(),
                    "timestamp": timestamp(),
                }),
            ),
            ProxyError::Upstream(rejection) => (
                rejection.status,
                json!({
                    "message": rejection.message(),
                    "status": rejection.status.as_u16(),
                    "statusText": rejection.status_text(),
                    "details": rejection.details(),
                    "rawResponse": rejection.raw,
                }),
            ),
            ProxyError::Parse(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "message": PARSE_FAILURE_MESSAGE,
                    "error": "ParseError",
                    "timestamp": timestamp(),
                }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
