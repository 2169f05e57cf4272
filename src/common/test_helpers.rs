/// Shared test fixtures: a scripted secret store, an offline S3 client and
/// helpers to drive the router without a network.
use crate::common::state::AppState;
use crate::config::Config;
use crate::external::secrets::{SecretCache, SecretError, SecretSource};
use crate::routes::build_router;
use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use serde_json::{Value, json};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tower::ServiceExt;

/// Secret store that answers every request with the same scripted result
pub struct FakeSecretSource {
    response: Result<String, String>,
    calls: AtomicUsize,
    last_secret_id: Mutex<Option<String>>,
}

impl FakeSecretSource {
    pub fn returning(payload: &str) -> Self {
        Self {
            response: Ok(payload.to_string()),
            calls: AtomicUsize::new(0),
            last_secret_id: Mutex::new(None),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            calls: AtomicUsize::new(0),
            last_secret_id: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_secret_id(&self) -> Option<String> {
        self.last_secret_id.lock().unwrap().clone()
    }
}

#[async_trait]
impl SecretSource for FakeSecretSource {
    async fn secret_string(&self, secret_id: &str) -> Result<String, SecretError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_secret_id.lock().unwrap() = Some(secret_id.to_string());
        self.response.clone().map_err(SecretError::Fetch)
    }
}

/// S3 client with static credentials. Presigning is computed locally, so
/// this never talks to AWS.
pub fn offline_s3_client() -> S3Client {
    let config = aws_sdk_s3::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(Credentials::new(
            "AKIDEXAMPLE",
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            None,
            None,
            "tests",
        ))
        .build();

    S3Client::from_conf(config)
}

pub fn test_state(config: Config, source: Arc<dyn SecretSource>) -> AppState {
    let secrets = Arc::new(SecretCache::new(source, config.db_secret_arn.clone()));
    AppState::new(config, secrets, Arc::new(offline_s3_client()))
}

pub fn setup_test_app(config: Config) -> Router {
    let source = Arc::new(FakeSecretSource::failing("no secret store in tests"));
    build_router(test_state(config, source))
}

/// Test config that talks to a fresh in-memory SQLite database instead of
/// resolving MySQL credentials
pub fn sqlite_config(migrations_dir: &Path) -> Config {
    let mut config = Config::for_tests();
    config.db_url = Some("sqlite::memory:".to_string());
    config.migrations_dir = migrations_dir.to_path_buf();
    config
}

pub fn write_migrations(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    for (name, sql) in files {
        std::fs::write(dir.path().join(name), sql).expect("Failed to write migration file");
    }
    dir
}

pub async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Extract response body as JSON for testing
pub async fn extract_response_body(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    let body: Value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| json!({"error": "Invalid JSON response"}));
    (status, body)
}
