use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};

use crate::error::{ApiError, ApiResult};
use crate::ingest;
use crate::state::AppState;

/// Requests above this fail multipart parsing before any CSV work starts.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "text/csv",
    "application/csv",
    "application/vnd.ms-excel",
    "text/plain",
    "application/octet-stream",
];

#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub count: usize,
}

fn is_csv_upload(content_type: &str, file_name: &str) -> bool {
    ALLOWED_CONTENT_TYPES.contains(&content_type) || file_name.ends_with(".csv")
}

#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "upload",
    responses(
        (status = 200, description = "Readings ingested", body = UploadResponse),
        (status = 400, description = "Malformed upload or CSV payload", body = crate::error::ErrorBody),
        (status = 500, description = "Storage failure", body = crate::error::ErrorBody)
    )
)]
pub(crate) async fn upload_csv(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<UploadResponse>> {
    let mut multipart = multipart
        .map_err(|err| ApiError::bad_request("Failed to parse form data", err.to_string()))?;

    // The multipart `Field` borrows from `Multipart`, so pull everything we
    // need out of the matching field before leaving the loop.
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::bad_request("Failed to parse form data", err.to_string()))?
    {
        if field.name() == Some("file") {
            let content_type = field.content_type().unwrap_or_default().to_string();
            let file_name = field.file_name().unwrap_or_default().to_string();
            if !is_csv_upload(&content_type, &file_name) {
                return Err(ApiError::bad_request(
                    "Invalid file type",
                    format!("Only CSV files are allowed. Received: {content_type}"),
                ));
            }
            let bytes = field.bytes().await.map_err(|err| {
                ApiError::bad_request("Failed to read uploaded file", err.to_string())
            })?;
            file = Some((content_type, file_name, bytes));
            break;
        }
    }
    let (content_type, file_name, bytes) = file.ok_or_else(|| {
        ApiError::bad_request(
            "Could not get file from request",
            "multipart field \"file\" is required",
        )
    })?;
    tracing::info!(
        file = %file_name,
        size = bytes.len(),
        content_type = %content_type,
        "received CSV upload"
    );

    let readings = ingest::parse_readings(&bytes)?;
    let count = readings.len();

    // One bulk write; a storage failure fails the whole request.
    state
        .service
        .save_readings(&readings)
        .await
        .map_err(|err| ApiError::storage("Failed to save sensor data", err))?;

    Ok(Json(UploadResponse {
        success: true,
        message: format!("Successfully uploaded {count} sensor data records"),
        count,
    }))
}

/// Explicit preflight answer; the CORS layer fills in the response headers.
pub(crate) async fn upload_preflight() -> StatusCode {
    StatusCode::OK
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload_csv).options(upload_preflight))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

#[cfg(test)]
mod tests {
    use super::is_csv_upload;

    #[test]
    fn accepts_allow_listed_content_types() {
        assert!(is_csv_upload("text/csv", "data.bin"));
        assert!(is_csv_upload("application/vnd.ms-excel", ""));
        assert!(is_csv_upload("application/octet-stream", ""));
    }

    #[test]
    fn falls_back_to_csv_extension() {
        assert!(is_csv_upload("application/json", "data.csv"));
        assert!(!is_csv_upload("application/json", "data.json"));
        assert!(!is_csv_upload("", ""));
    }
}
