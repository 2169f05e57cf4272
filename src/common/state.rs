use crate::config::Config;
use crate::external::secrets::SecretCache;
use aws_sdk_s3::Client as S3Client;
use std::sync::Arc;

/// Shared by every request. Cloning only bumps reference counts, so the
/// secret cache and the AWS clients outlive single invocations.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub secrets: Arc<SecretCache>,
    pub s3: Arc<S3Client>,
}

impl AppState {
    pub fn new(config: Config, secrets: Arc<SecretCache>, s3: Arc<S3Client>) -> Self {
        Self {
            config,
            secrets,
            s3,
        }
    }
}
