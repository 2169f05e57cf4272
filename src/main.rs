mod common;
mod config;
mod database;
mod external;
mod routes;
mod uploads;

use crate::common::state::AppState;
use crate::config::Config;
use crate::external::secrets::SecretCache;
use aws_config::BehaviorVersion;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // CloudWatch already stamps the function name, so keep lines short there
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_current_span(false)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), lambda_http::Error> {
    let in_lambda = Config::running_in_lambda();
    init_tracing(in_lambda);

    // Load configuration and environment variables to pass to the application
    let config = Config::from_env();
    tracing::info!(
        app = %config.app_name,
        deployment = %config.deployment.to_uppercase(),
        lambda = in_lambda,
        "Starting"
    );

    let shared_config = aws_config::defaults(BehaviorVersion::latest()).load().await;
    let s3 = external::s3::get_client(&shared_config, &config);
    let secrets = Arc::new(SecretCache::new(
        Arc::new(aws_sdk_secretsmanager::Client::new(&shared_config)),
        config.db_secret_arn.clone(),
    ));

    let port = config.port;
    let router = routes::build_router(AppState::new(config, secrets, s3));

    if in_lambda {
        return lambda_http::run(router).await;
    }

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, router.into_make_service()).await?;
    Ok(())
}
