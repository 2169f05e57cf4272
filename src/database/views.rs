use super::models::{ConnectivityResponse, InitResponse, MigrationSummary};
use super::services;
use crate::common::errors::AppError;
use crate::common::models::ErrorResponse;
use crate::common::state::AppState;
use axum::{Json, extract::State};
use utoipa_axum::{router::OpenApiRouter, routes};

pub fn router(state: &AppState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(init_database))
        .routes(routes!(test_database))
        .with_state(state.clone())
}

/// Create the databases and tables from the bundled migration files
#[utoipa::path(
    method(get, post),
    path = "/init",
    responses(
        (status = OK, description = "All migration files applied", body = InitResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Credentials, connection or migration failure", body = ErrorResponse)
    ),
    tag = "database"
)]
pub async fn init_database(State(state): State<AppState>) -> Result<Json<InitResponse>, AppError> {
    let reports = services::initialize_database(&state).await?;
    tracing::info!(files = reports.len(), "Database initialization complete");

    Ok(Json(InitResponse {
        success: true,
        message: "Database initialization complete".to_string(),
        migrations: reports.into_iter().map(MigrationSummary::from).collect(),
    }))
}

/// Check that the application database answers a trivial query
#[utoipa::path(
    get,
    path = "/test",
    responses(
        (status = OK, description = "Database reachable", body = ConnectivityResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Credentials, connection or query failure", body = ErrorResponse)
    ),
    tag = "database"
)]
pub async fn test_database(
    State(state): State<AppState>,
) -> Result<Json<ConnectivityResponse>, AppError> {
    let result = services::test_database(&state).await?;

    Ok(Json(ConnectivityResponse {
        success: true,
        result,
    }))
}
