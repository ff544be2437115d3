use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use tracing::{error, info};

#[derive(Clone)]
pub struct HealthState {
    transport_mode: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub transport: HealthCheck,
    pub checked_at: String,
}

pub fn router(transport_mode: &'static str) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { transport_mode })
}

pub async fn spawn(
    bind_address: &str,
    port: u16,
    transport_mode: &'static str,
) -> std::io::Result<()> {
    let address = format!("{bind_address}:{port}");
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!(
        event_name = "system.health.start",
        correlation_id = "bootstrap",
        bind_address = %address,
        "health endpoint started"
    );

    tokio::spawn(async move {
        if let Err(serve_error) = axum::serve(listener, router(transport_mode)).await {
            error!(
                event_name = "system.health.error",
                correlation_id = "bootstrap",
                error = %serve_error,
                "health endpoint server terminated unexpectedly"
            );
        }
    });

    Ok(())
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let payload = HealthResponse {
        status: "ready",
        service: HealthCheck {
            status: "ready",
            detail: "suplo-server runtime initialized".to_string(),
        },
        transport: HealthCheck {
            status: "ready",
            detail: format!("slack transport mode: {}", state.transport_mode),
        },
        checked_at: Utc::now().to_rfc3339(),
    };

    (StatusCode::OK, Json(payload))
}
