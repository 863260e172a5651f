use super::error::{ProxyError, TransportFailure, UpstreamRejection};
use super::AppState;
use crate::config::ProxyConfig;
use crate::model::ScheduleRequest;
use axum::{body::Bytes, extract::State, Json};
use reqwest::header::USER_AGENT;
use serde_json::Value;
use tracing::{debug, error, info, warn};

pub const UPSTREAM_USER_AGENT: &str = "NurseScheduler/1.0";
const PREVIEW_CHARS: usize = 500;

pub(super) async fn schedule_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ProxyError> {
    let request: ScheduleRequest =
        serde_json::from_slice(&body).map_err(|e| ProxyError::InvalidRequest(e.to_string()))?;
    request
        .validate()
        .map_err(|e| ProxyError::InvalidRequest(e.to_string()))?;

    let data = forward_schedule(&state.http, &state.config, &request).await?;
    Ok(Json(data))
}

/// Transmet la demande au service externe et normalise la réponse.
pub async fn forward_schedule(
    http: &reqwest::Client,
    config: &ProxyConfig,
    request: &ScheduleRequest,
) -> Result<Value, ProxyError> {
    info!(
        target_url = %config.external_url,
        start = %request.start,
        end = %request.end,
        nurses = request.nurse_list.len(),
        "forwarding schedule request"
    );

    let response = http
        .post(config.external_url.clone())
        .header(USER_AGENT, UPSTREAM_USER_AGENT)
        .timeout(config.schedule_timeout)
        .json(request)
        .send()
        .await
        .map_err(|e| {
            let failure = TransportFailure::classify(&e);
            error!(kind = failure.kind.error_name(), detail = %failure.detail, "upstream request failed");
            ProxyError::Transport(failure)
        })?;

    let status = response.status();
    info!(status = status.as_u16(), "upstream responded");

    if !status.is_success() {
        let raw = response.text().await.unwrap_or_else(|e| {
            warn!(error = %e, "failed to read upstream error body");
            String::new()
        });
        error!(status = status.as_u16(), body = %raw, "upstream rejected schedule request");
        return Err(ProxyError::Upstream(UpstreamRejection::new(status, raw)));
    }

    let text = response.text().await.map_err(|e| {
        error!(error = %e, "failed to read upstream body");
        ProxyError::Parse(e.to_string())
    })?;
    parse_success_body(&text)
}

pub(crate) fn parse_success_body(text: &str) -> Result<Value, ProxyError> {
    debug!(
        length = text.len(),
        preview = %text.chars().take(PREVIEW_CHARS).collect::<String>(),
        "upstream body"
    );
    if text.trim().is_empty() {
        error!("empty response from upstream");
        return Err(ProxyError::Parse("empty response from server".to_string()));
    }
    let data: Value = serde_json::from_str(text).map_err(|e| {
        error!(error = %e, "upstream body is not JSON");
        ProxyError::Parse(e.to_string())
    })?;
    if let Some(days) = data.as_array() {
        debug!(days = days.len(), "parsed schedule");
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_body_is_a_parse_failure() {
        assert!(matches!(parse_success_body(""), Err(ProxyError::Parse(_))));
        assert!(matches!(parse_success_body(" \n"), Err(ProxyError::Parse(_))));
    }

    #[test]
    fn non_json_body_is_a_parse_failure() {
        assert!(matches!(parse_success_body("<html>"), Err(ProxyError::Parse(_))));
    }

    #[test]
    fn relayed_body_keeps_key_order() {
        let raw = r#"[{"date":"2025-03-01","nurses":{"이가람":"day","김하나":"off"}}]"#;
        let value = parse_success_body(raw).unwrap();
        assert_eq!(serde_json::to_string(&value).unwrap(), raw);
    }

    #[test]
    fn json_body_is_relayed_as_is() {
        let raw = r#"[{"date":"2025-03-01","nurses":{"a":"off"}}]"#;
        let value = parse_success_body(raw).unwrap();
        assert_eq!(value, serde_json::from_str::<Value>(raw).unwrap());
    }
}
