use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(title = "sensorviz", description = "Sensor telemetry API"),
    paths(
        crate::routes::health::ping,
        crate::routes::objects::list_objects,
        crate::routes::objects::list_ports,
        crate::routes::readings::get_readings,
        crate::routes::upload::upload_csv,
    ),
    components(schemas(
        crate::model::SensorReading,
        crate::model::ObjectSummary,
        crate::model::PortSummary,
        crate::model::ReadingsPage,
        crate::error::ErrorBody,
        crate::routes::health::PingResponse,
        crate::routes::upload::UploadResponse,
    ))
)]
pub struct ApiDoc;

pub fn openapi_json() -> serde_json::Value {
    serde_json::to_value(ApiDoc::openapi()).unwrap_or_default()
}

pub(crate) async fn openapi_handler() -> Json<serde_json::Value> {
    Json(openapi_json())
}

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_handler))
}
