#![allow(dead_code)]
use axum::{
    http::{
        header::{CONTENT_TYPE, USER_AGENT},
        HeaderMap, StatusCode,
    },
    routing::post,
    Json, Router,
};
use nurse_roster::{dates_in_range, AppState, ProxyConfig, ScheduleRequest};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;

/// Sert `app` sur un port éphémère et renvoie son adresse.
pub async fn spawn(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Réponse brute dont les noms ne sont pas dans l'ordre lexicographique.
pub const UNSORTED_SCHEDULE: &str = r#"[
    {"date":"2025-03-01","nurses":{"이가람":"day","김하나":"night"}},
    {"date":"2025-03-02","nurses":{"이가람":"off","김하나":"evening"}}
]"#;

/// Service de planification factice.
pub fn fake_scheduler() -> Router {
    Router::new()
        .route("/schedule", post(echo_schedule))
        .route("/empty", post(|| async { (StatusCode::OK, "") }))
        .route(
            "/reject",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "message": "nurse_list must not be empty" })),
                )
            }),
        )
        .route(
            "/text-error",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
        )
        .route(
            "/unsorted",
            post(|| async {
                (
                    [(CONTENT_TYPE, "application/json")],
                    UNSORTED_SCHEDULE,
                )
            }),
        )
        .route(
            "/slow",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(json!([]))
            }),
        )
}

/// Un jour par date demandée ; tout le monde de jour, ou de nuit si l'UA manque.
async fn echo_schedule(headers: HeaderMap, Json(request): Json<ScheduleRequest>) -> Json<Value> {
    let shift = match headers.get(USER_AGENT).and_then(|v| v.to_str().ok()) {
        Some("NurseScheduler/1.0") => "day",
        _ => "night",
    };
    let days: Vec<Value> = dates_in_range(request.start, request.end)
        .into_iter()
        .map(|d| {
            let nurses: serde_json::Map<String, Value> = request
                .nurse_list
                .iter()
                .map(|n| (n.name.clone(), json!(shift)))
                .collect();
            json!({ "date": d.format("%Y-%m-%d").to_string(), "nurses": nurses })
        })
        .collect();
    Json(Value::Array(days))
}

pub async fn spawn_proxy(config: ProxyConfig) -> SocketAddr {
    let state = AppState::new(config).unwrap();
    spawn(nurse_roster::router(state)).await
}

/// Proxy branché sur `path` du service factice.
pub async fn proxy_to(path: &str) -> SocketAddr {
    let upstream = spawn(fake_scheduler()).await;
    let config = ProxyConfig::new(&format!("http://{upstream}{path}")).unwrap();
    spawn_proxy(config).await
}

/// Adresse sur laquelle plus personne n'écoute.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/schedule")
}

pub fn sample_request() -> Value {
    json!({
        "start": "2025-03-01",
        "end": "2025-03-03",
        "nurse_list": [
            { "name": "김하나", "position": 0, "off": [1] },
            { "name": "이가람", "position": 3, "off": [] }
        ]
    })
}
