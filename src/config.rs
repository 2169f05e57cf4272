use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_DB_INIT_FILE: &str = "07_11_2025_create_databases_up.sql";
pub const DEFAULT_DB_TABLE_FILES: [&str; 2] = [
    "07_11_2025_create_core_tables_up.sql",
    "07_11_2025_create_member_form_migration_table_up.sql",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub app_name: String,
    pub deployment: String,
    pub port: u16,
    pub db_url: Option<String>,
    pub db_secret_arn: Option<String>,
    pub db_host: Option<String>,
    pub db_port: Option<u16>,
    pub db_name: Option<String>,
    pub db_tls: bool,
    pub db_connect_timeout_secs: u64,
    pub migrations_dir: PathBuf,
    pub db_init_file: String,
    pub db_table_files: Vec<String>,
    pub migration_transactional: bool,
    pub upload_bucket: Option<String>,
    pub upload_prefix: String,
    pub presign_expiry_secs: u64,
    pub s3_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok(); // Load from .env file if available

        Config {
            app_name: var("APP_NAME").unwrap_or_else(|| "club-event-api".to_string()),
            deployment: var("DEPLOYMENT").unwrap_or_else(|| "local".to_string()),
            port: parsed("PORT", 3000),
            db_url: var("DB_URL"),
            db_secret_arn: var("DB_SECRET_ARN"),
            db_host: var("DB_HOST"),
            db_port: optional_parsed("DB_PORT"),
            db_name: var("DB_NAME"),
            db_tls: var("DB_TLS").is_some_and(|value| parse_flag(&value)),
            db_connect_timeout_secs: parsed("DB_CONNECT_TIMEOUT_SECS", 10),
            migrations_dir: var("MIGRATIONS_DIR")
                .map_or_else(|| PathBuf::from(migration::DEFAULT_MIGRATIONS_DIR), PathBuf::from),
            db_init_file: var("DB_INIT_FILE").unwrap_or_else(|| DEFAULT_DB_INIT_FILE.to_string()),
            db_table_files: var("DB_TABLE_FILES").map_or_else(
                || DEFAULT_DB_TABLE_FILES.map(String::from).to_vec(),
                |files| parse_file_list(&files),
            ),
            migration_transactional: var("MIGRATION_TRANSACTIONAL")
                .is_some_and(|value| parse_flag(&value)),
            upload_bucket: var("UPLOAD_BUCKET"),
            upload_prefix: var("UPLOAD_PREFIX").unwrap_or_else(|| "uploads".to_string()),
            presign_expiry_secs: parsed("PRESIGN_EXPIRY_SECS", 60),
            s3_url: var("S3_URL"),
        }
    }

    /// The Lambda runtime sets this variable for every function it starts
    pub fn running_in_lambda() -> bool {
        env::var("AWS_LAMBDA_RUNTIME_API").is_ok()
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            app_name: "club-event-api-test".to_string(),
            deployment: "test".to_string(),
            port: 3000,
            db_url: None,
            db_secret_arn: Some(
                "arn:aws:secretsmanager:us-east-1:000000000000:secret:test-db".to_string(),
            ),
            db_host: None,
            db_port: None,
            db_name: None,
            db_tls: false,
            db_connect_timeout_secs: 2,
            migrations_dir: PathBuf::from("migrations"),
            db_init_file: DEFAULT_DB_INIT_FILE.to_string(),
            db_table_files: DEFAULT_DB_TABLE_FILES.map(String::from).to_vec(),
            migration_transactional: false,
            upload_bucket: Some("test-bucket".to_string()),
            upload_prefix: "uploads".to_string(),
            presign_expiry_secs: 60,
            s3_url: None,
        }
    }
}

/// Environment variable, treating blank values as unset
fn var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parsed<T: FromStr + std::fmt::Display>(key: &str, default: T) -> T {
    match var(key) {
        Some(value) => value.parse().unwrap_or_else(|_| {
            tracing::warn!(key, %value, %default, "Ignoring unparsable setting");
            default
        }),
        None => default,
    }
}

/// Like [`parsed`] for settings without a default
fn optional_parsed<T: FromStr>(key: &str) -> Option<T> {
    let value = var(key)?;
    let parsed = value.parse().ok();
    if parsed.is_none() {
        tracing::warn!(key, %value, "Ignoring unparsable setting");
    }
    parsed
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_file_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|file| !file.is_empty())
        .map(String::from)
        .collect()
}
