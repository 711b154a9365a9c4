use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct PingResponse {
    pub status: String,
    pub message: String,
}

#[utoipa::path(
    get,
    path = "/api/ping",
    tag = "health",
    responses((status = 200, description = "API is reachable", body = PingResponse))
)]
pub(crate) async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        status: "ok".to_string(),
        message: "API is running".to_string(),
    })
}

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/ping", get(ping))
}
