use super::models::HealthCheck;
use axum::Json;
use utoipa_axum::{router::OpenApiRouter, routes};

pub fn router() -> OpenApiRouter {
    OpenApiRouter::new().routes(routes!(ping))
}

#[utoipa::path(
    get,
    path = "/pingTest",
    responses(
        (status = OK, description = "The function is reachable", body = HealthCheck)
    ),
    tag = "health"
)]
pub async fn ping() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
    })
}
