use async_trait::async_trait;
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::OnceCell;

#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("DB_SECRET_ARN environment variable not set")]
    NotConfigured,
    #[error("Secret store request failed: {0}")]
    Fetch(String),
    #[error("Secret {0} has no string value")]
    Empty(String),
    #[error("Secret is not valid credential JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Anything that can hand back the raw string value of a secret
#[async_trait]
pub trait SecretSource: Send + Sync {
    async fn secret_string(&self, secret_id: &str) -> Result<String, SecretError>;
}

#[async_trait]
impl SecretSource for aws_sdk_secretsmanager::Client {
    async fn secret_string(&self, secret_id: &str) -> Result<String, SecretError> {
        let output = self
            .get_secret_value()
            .secret_id(secret_id)
            .send()
            .await
            .map_err(|err| SecretError::Fetch(DisplayErrorContext(&err).to_string()))?;

        output
            .secret_string()
            .map(str::to_owned)
            .ok_or_else(|| SecretError::Empty(secret_id.to_string()))
    }
}

/// Database credentials as stored by RDS in the secret store
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct DatabaseCredentials {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub dbname: Option<String>,
}

impl fmt::Debug for DatabaseCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("dbname", &self.dbname)
            .finish()
    }
}

/// Fetches the database secret at most once per process.
///
/// A Lambda execution environment is reused across invocations, so the
/// cache lives in the application state and survives between requests.
/// Only a successful load is kept; after a failure the next call asks the
/// secret store again.
pub struct SecretCache {
    source: Arc<dyn SecretSource>,
    secret_id: Option<String>,
    credentials: OnceCell<DatabaseCredentials>,
}

impl SecretCache {
    pub fn new(source: Arc<dyn SecretSource>, secret_id: Option<String>) -> Self {
        Self {
            source,
            secret_id,
            credentials: OnceCell::new(),
        }
    }

    pub async fn credentials(&self) -> Result<&DatabaseCredentials, SecretError> {
        let secret_id = self
            .secret_id
            .as_deref()
            .ok_or(SecretError::NotConfigured)?;

        self.credentials
            .get_or_try_init(|| async {
                tracing::info!(secret_id, "Loading database credentials from the secret store");
                let raw = self.source.secret_string(secret_id).await?;
                let credentials: DatabaseCredentials = serde_json::from_str(&raw)?;
                Ok::<_, SecretError>(credentials)
            })
            .await
    }

    pub fn is_loaded(&self) -> bool {
        self.credentials.initialized()
    }
}
