use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::error::{ApiError, ApiResult};
use crate::model::ReadingsPage;
use crate::state::AppState;

#[derive(Debug, Clone, serde::Deserialize, utoipa::IntoParams)]
pub(crate) struct ReadingsQuery {
    /// Optional port number to narrow the result set.
    port_num: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/data/{objectId}",
    tag = "readings",
    params(
        ("objectId" = String, Path, description = "Numeric object identifier"),
        ReadingsQuery
    ),
    responses(
        (status = 200, description = "Readings plus total match count", body = ReadingsPage),
        (status = 400, description = "objectId or port_num is not numeric", body = crate::error::ErrorBody),
        (status = 500, description = "Storage failure", body = crate::error::ErrorBody)
    )
)]
pub(crate) async fn get_readings(
    State(state): State<AppState>,
    Path(object_id): Path<String>,
    Query(query): Query<ReadingsQuery>,
) -> ApiResult<Json<ReadingsPage>> {
    let object_id: f64 = object_id
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid objectId", "objectId must be a number"))?;
    let port_num: Option<f64> = query
        .port_num
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|raw| raw.parse::<f64>())
        .transpose()
        .map_err(|_| ApiError::bad_request("Invalid port_num", "port_num must be a number"))?;

    let page = state
        .service
        .readings(object_id, port_num)
        .await
        .map_err(|err| ApiError::storage("Failed to fetch readings", err))?;
    Ok(Json(page))
}

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/data/{objectId}", get(get_readings))
}
