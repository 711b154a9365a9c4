use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::error::{ApiError, ApiResult};
use crate::model::{ObjectSummary, PortSummary};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/objects",
    tag = "objects",
    responses(
        (status = 200, description = "Distinct object identifiers, ascending", body = Vec<ObjectSummary>),
        (status = 500, description = "Storage failure", body = crate::error::ErrorBody)
    )
)]
pub(crate) async fn list_objects(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ObjectSummary>>> {
    let objects = state
        .service
        .list_objects()
        .await
        .map_err(|err| ApiError::storage("Failed to list objects", err))?;
    Ok(Json(objects))
}

#[utoipa::path(
    get,
    path = "/api/ports/{objectId}",
    tag = "objects",
    params(("objectId" = String, Path, description = "Numeric object identifier")),
    responses(
        (status = 200, description = "Distinct ports for the object", body = Vec<PortSummary>),
        (status = 400, description = "objectId is not numeric", body = crate::error::ErrorBody),
        (status = 500, description = "Storage failure", body = crate::error::ErrorBody)
    )
)]
pub(crate) async fn list_ports(
    State(state): State<AppState>,
    Path(object_id): Path<String>,
) -> ApiResult<Json<Vec<PortSummary>>> {
    // Validated before any database call.
    let object_id: i64 = object_id
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid objectId", "objectId must be a number"))?;
    let ports = state
        .service
        .list_ports(object_id as f64)
        .await
        .map_err(|err| ApiError::storage("Failed to list ports", err))?;
    Ok(Json(ports))
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/objects", get(list_objects))
        .route("/ports/{objectId}", get(list_ports))
}
