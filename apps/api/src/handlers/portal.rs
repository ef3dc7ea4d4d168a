use axum::Json;
use axum::extract::{Extension, State};
use brandflow_core::UserIdentity;

use crate::dto::DashboardResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/portal/dashboard - Metrics for the caller's organisation.
pub async fn dashboard_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<DashboardResponse>> {
    let dashboard = state.portal_service.dashboard(&user).await?;
    Ok(Json(DashboardResponse::from(dashboard)))
}
