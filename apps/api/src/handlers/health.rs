use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::{HealthDependencyStatus, HealthResponse};
use crate::state::AppState;

mod checks;

pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let postgres = checks::check_postgres(&state.postgres_pool).await;

    let ready = postgres.status == "ok";
    let (status, http_status) = if ready {
        ("ok", StatusCode::OK)
    } else {
        ("degraded", StatusCode::SERVICE_UNAVAILABLE)
    };

    (
        http_status,
        Json(HealthResponse {
            status,
            ready,
            postgres,
        }),
    )
}

fn dependency_status(result: Result<(), String>) -> HealthDependencyStatus {
    match result {
        Ok(()) => HealthDependencyStatus {
            status: "ok",
            detail: None,
        },
        Err(detail) => HealthDependencyStatus {
            status: "error",
            detail: Some(detail),
        },
    }
}
