use crate::common::errors::AppError;
use crate::common::state::AppState;
use crate::config::Config;
use crate::external::secrets::DatabaseCredentials;
use migration::{MigrationReport, Migrator};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use std::time::Duration;
use url::Url;

pub const DEFAULT_MYSQL_PORT: u16 = 3306;
pub const CONNECTIVITY_QUERY: &str = "SELECT 1 + 1 AS result";

/// Which database a connection should select
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// No default database, for statements such as `CREATE DATABASE`
    Server,
    /// The application database from `DB_NAME` or the secret
    Application,
}

/// Build a MySQL DSN from the secret, with `DB_HOST`/`DB_PORT`/`DB_NAME`
/// taking precedence over what the secret holds
pub fn mysql_url(
    credentials: &DatabaseCredentials,
    config: &Config,
    target: Target,
) -> Result<String, AppError> {
    let host = config
        .db_host
        .as_deref()
        .or(credentials.host.as_deref())
        .ok_or_else(|| {
            AppError::Config("No database host in DB_HOST or the secret".to_string())
        })?;
    let port = config
        .db_port
        .or(credentials.port)
        .unwrap_or(DEFAULT_MYSQL_PORT);

    let mut url = Url::parse(&format!("mysql://{host}:{port}"))
        .map_err(|e| AppError::Config(format!("Invalid database host {host}: {e}")))?;
    url.set_username(&credentials.username)
        .and_then(|()| url.set_password(Some(&credentials.password)))
        .map_err(|()| AppError::Config("Database URL cannot carry credentials".to_string()))?;

    if target == Target::Application {
        if let Some(name) = config.db_name.as_deref().or(credentials.dbname.as_deref()) {
            url.set_path(&format!("/{name}"));
        }
    }
    if config.db_tls {
        url.query_pairs_mut().append_pair("ssl-mode", "required");
    }

    Ok(url.into())
}

/// `DB_URL` when set, otherwise a DSN built from the cached secret
pub async fn connection_url(state: &AppState, target: Target) -> Result<String, AppError> {
    if let Some(url) = &state.config.db_url {
        return Ok(url.clone());
    }

    let credentials = state.secrets.credentials().await?;
    mysql_url(credentials, &state.config, target)
}

/// Open a single-connection pool and make sure the server answers.
///
/// One connection means every statement of a run shares a session.
pub async fn connect(url: &str, config: &Config) -> Result<DatabaseConnection, AppError> {
    let timeout = Duration::from_secs(config.db_connect_timeout_secs);
    let mut options = ConnectOptions::new(url.to_owned());
    options
        .max_connections(1)
        .min_connections(1)
        .connect_timeout(timeout)
        .acquire_timeout(timeout)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .map_err(AppError::Connection)?;
    db.ping().await.map_err(AppError::Connection)?;

    tracing::info!(backend = ?db.get_database_backend(), "Connected to the database");
    Ok(db)
}

async fn close(db: DatabaseConnection) {
    if let Err(err) = db.close().await {
        tracing::warn!(error = %err, "Failed to close database connection");
    }
}

/// Create the databases, then the tables, on one server-level connection
pub async fn initialize_database(state: &AppState) -> Result<Vec<MigrationReport>, AppError> {
    let url = connection_url(state, Target::Server).await?;
    let db = connect(&url, &state.config).await?;

    let migrator = Migrator::new(&state.config.migrations_dir)
        .transactional(state.config.migration_transactional);
    let result = run_init_migrations(&db, &migrator, &state.config).await;
    close(db).await;

    result
}

async fn run_init_migrations(
    db: &DatabaseConnection,
    migrator: &Migrator,
    config: &Config,
) -> Result<Vec<MigrationReport>, AppError> {
    let databases = migrator.run(db, &config.db_init_file).await?;
    tracing::info!(
        file = %databases.file,
        statements = databases.statements,
        "Databases initialized"
    );

    let mut reports = vec![databases];
    reports.extend(migrator.run_all(db, config.db_table_files.as_slice()).await?);

    Ok(reports)
}

/// Run the connectivity query and return its single value
pub async fn connectivity_check<C>(db: &C) -> Result<i64, AppError>
where
    C: ConnectionTrait,
{
    let row = db
        .query_one(Statement::from_string(
            db.get_database_backend(),
            CONNECTIVITY_QUERY,
        ))
        .await
        .map_err(AppError::Query)?
        .ok_or_else(|| {
            AppError::Query(DbErr::RecordNotFound(
                "Connectivity query returned no rows".to_string(),
            ))
        })?;

    row.try_get::<i64>("", "result").map_err(AppError::Query)
}

pub async fn test_database(state: &AppState) -> Result<i64, AppError> {
    let url = connection_url(state, Target::Application).await?;
    let db = connect(&url, &state.config).await?;

    let result = connectivity_check(&db).await;
    close(db).await;

    result
}
