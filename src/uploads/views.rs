use super::models::{PresignQuery, PresignResponse};
use crate::common::errors::AppError;
use crate::common::models::ErrorResponse;
use crate::common::state::AppState;
use crate::external::s3::{presign_put_url, upload_key};
use axum::{
    Json,
    extract::{Query, State},
    http::header::ACCESS_CONTROL_ALLOW_ORIGIN,
    response::IntoResponse,
};
use chrono::Utc;
use std::time::Duration;
use utoipa_axum::{router::OpenApiRouter, routes};

pub fn router(state: &AppState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(presign_upload))
        .with_state(state.clone())
}

/// Create a short-lived URL the browser can `PUT` a file to
#[utoipa::path(
    get,
    path = "/presign",
    params(PresignQuery),
    responses(
        (status = OK, description = "Presigned upload URL", body = PresignResponse),
        (status = BAD_REQUEST, description = "fileName or fileType missing", body = ErrorResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Bucket not configured or presigning failed", body = ErrorResponse)
    ),
    tag = "uploads"
)]
pub async fn presign_upload(
    State(state): State<AppState>,
    Query(query): Query<PresignQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (file_name, file_type) = query.required()?;
    let bucket = state
        .config
        .upload_bucket
        .as_deref()
        .ok_or_else(|| AppError::Config("UPLOAD_BUCKET is not set".to_string()))?;

    let key = upload_key(
        &state.config.upload_prefix,
        Utc::now().timestamp_millis(),
        file_name,
    );
    let upload_url = presign_put_url(
        &state.s3,
        bucket,
        &key,
        file_type,
        Duration::from_secs(state.config.presign_expiry_secs),
    )
    .await?;

    tracing::info!(bucket, key = %key, "Presigned upload URL");

    Ok((
        [(ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
        Json(PresignResponse { upload_url, key }),
    ))
}
