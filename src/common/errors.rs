use super::models::{ErrorDetail, ErrorResponse};
use crate::external::secrets::SecretError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use migration::MigrationError;
use sea_orm::DbErr;

/// Failures surfaced by the request handlers.
///
/// The full error (file, statement, driver message) is logged; the response
/// only carries a stable code and a fixed message for the category.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Invalid client input (400 Bad Request)
    #[error("{0}")]
    BadRequest(String),
    /// Missing or unusable service configuration
    #[error("Configuration error: {0}")]
    Config(String),
    /// The database secret could not be loaded
    #[error("Failed to load secrets: {0}")]
    SecretLoad(#[source] SecretError),
    #[error("Failed to connect to the database: {0}")]
    Connection(#[source] DbErr),
    #[error("Migration failed: {0}")]
    Migration(#[from] MigrationError),
    #[error("Database query failed: {0}")]
    Query(#[source] DbErr),
    #[error("Failed to presign upload: {0}")]
    Presign(String),
}

impl From<SecretError> for AppError {
    fn from(err: SecretError) -> Self {
        match err {
            SecretError::NotConfigured => AppError::Config(err.to_string()),
            other => AppError::SecretLoad(other),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Config(_) => "CONFIGURATION_ERROR",
            AppError::SecretLoad(_) => "SECRET_LOAD_FAILED",
            AppError::Connection(_) => "DATABASE_CONNECTION_FAILED",
            AppError::Migration(_) => "MIGRATION_FAILED",
            AppError::Query(_) => "QUERY_FAILED",
            AppError::Presign(_) => "PRESIGN_FAILED",
        }
    }

    /// Message safe to show to callers
    pub fn public_message(&self) -> String {
        match self {
            AppError::BadRequest(message) => message.clone(),
            AppError::Config(_) => "Service is not configured correctly".to_string(),
            AppError::SecretLoad(_) => "Failed to load database credentials".to_string(),
            AppError::Connection(_) => "Failed to connect to the database".to_string(),
            AppError::Migration(_) => "Failed to initialize database".to_string(),
            AppError::Query(_) => "Database query failed".to_string(),
            AppError::Presign(_) => "Failed to create upload URL".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        if status.is_server_error() {
            tracing::error!(code, error = %self, "Request failed");
        } else {
            tracing::warn!(code, error = %self, "Request rejected");
        }

        let body = Json(ErrorResponse {
            success: false,
            error: ErrorDetail {
                code: code.to_string(),
                message: self.public_message(),
            },
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;
    use std::path::PathBuf;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_bad_request_message_is_returned_verbatim() {
        let (status, body) =
            render(AppError::BadRequest("Missing fileName or fileType".to_string())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
        assert_eq!(body["error"]["message"], "Missing fileName or fileType");
    }

    #[tokio::test]
    async fn test_migration_failure_hides_statement_and_driver_text() {
        let err = AppError::from(MigrationError::Execution {
            file: "07_11_2025_create_core_tables_up.sql".to_string(),
            position: 3,
            statement: "CREATE TABLE STAGING.secret_table (id INT)".to_string(),
            source: DbErr::Custom("Access denied for user 'dbadmin'".to_string()),
        });
        assert!(err.to_string().contains("secret_table"));

        let (status, body) = render(err).await;
        let text = body.to_string();

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "MIGRATION_FAILED");
        assert_eq!(body["error"]["message"], "Failed to initialize database");
        assert!(!text.contains("secret_table"));
        assert!(!text.contains("dbadmin"));
        assert!(!text.contains("create_core_tables"));
    }

    #[tokio::test]
    async fn test_file_read_failure_is_a_migration_error() {
        let err = AppError::from(MigrationError::FileRead {
            path: PathBuf::from("migrations/missing.sql"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        });

        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "MIGRATION_FAILED");
        assert!(!body.to_string().contains("missing.sql"));
    }

    #[test]
    fn test_missing_secret_id_maps_to_configuration_error() {
        let err = AppError::from(SecretError::NotConfigured);
        assert!(matches!(err, AppError::Config(_)));
        assert_eq!(err.code(), "CONFIGURATION_ERROR");

        let err = AppError::from(SecretError::Fetch("timeout".to_string()));
        assert!(matches!(err, AppError::SecretLoad(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_every_server_error_uses_generic_message() {
        let errors = vec![
            (
                AppError::Config("DB_SECRET_ARN environment variable not set".to_string()),
                "DB_SECRET_ARN",
            ),
            (
                AppError::Connection(DbErr::Custom("tcp 10.0.0.5:3306 refused".to_string())),
                "10.0.0.5",
            ),
            (
                AppError::Query(DbErr::Custom("syntax error near 'SELEC'".to_string())),
                "SELEC",
            ),
            (
                AppError::Presign("InvalidAccessKeyId AKIA123".to_string()),
                "AKIA123",
            ),
        ];

        for (err, leak) in errors {
            assert!(err.to_string().contains(leak));
            let (status, body) = render(err).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert!(!body.to_string().contains(leak), "response leaked: {body}");
        }
    }
}
