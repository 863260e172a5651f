//! Service HTTP : proxy vers le service de planification et sonde de santé.

mod error;
mod health;
mod schedule;

pub use error::{
    status_message, ProxyError, TransportFailure, TransportKind, UpstreamRejection,
    PARSE_FAILURE_MESSAGE,
};
pub use health::{probe, HealthReport};
pub use schedule::{forward_schedule, UPSTREAM_USER_AGENT};

use crate::config::ProxyConfig;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub const SCHEDULE_PATH: &str = "/api/schedule";
pub const HEALTH_PATH: &str = "/api/health-check";

/// État partagé : configuration figée et client HTTP, sans donnée de session.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProxyConfig>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: ProxyConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            config: Arc::new(config),
            http,
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(SCHEDULE_PATH, post(schedule::schedule_handler))
        .route(HEALTH_PATH, get(health::health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Sert le routeur sur un listener déjà lié.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, external_url = %state.config.external_url, "nurse-roster proxy listening");
    }
    axum::serve(listener, router(state)).await
}
