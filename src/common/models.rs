use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Deserialize, Serialize)]
pub struct HealthCheck {
    pub status: String,
}

#[derive(ToSchema, Deserialize, Serialize, Debug)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// Body of every failed request
#[derive(ToSchema, Deserialize, Serialize, Debug)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}
