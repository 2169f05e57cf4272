use crate::common::errors::AppError;
use crate::config::Config;
use aws_config::SdkConfig;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use std::sync::Arc;
use std::time::Duration;

pub fn get_client(shared_config: &SdkConfig, config: &Config) -> Arc<S3Client> {
    let mut builder = aws_sdk_s3::config::Builder::from(shared_config);
    if let Some(url) = &config.s3_url {
        // Local S3 stand-ins (MinIO, LocalStack) only serve path-style URLs
        builder = builder.endpoint_url(url).force_path_style(true);
    }

    Arc::new(S3Client::from_conf(builder.build()))
}

/// Object key for a browser upload: `<prefix>/<unix millis>-<file name>`
pub fn upload_key(prefix: &str, timestamp_millis: i64, file_name: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        format!("{timestamp_millis}-{file_name}")
    } else {
        format!("{prefix}/{timestamp_millis}-{file_name}")
    }
}

/// Presigned `PUT` URL that lets a browser upload one object directly
pub async fn presign_put_url(
    client: &S3Client,
    bucket: &str,
    key: &str,
    content_type: &str,
    expires_in: Duration,
) -> Result<String, AppError> {
    let presigning =
        PresigningConfig::expires_in(expires_in).map_err(|e| AppError::Presign(e.to_string()))?;

    let request = client
        .put_object()
        .bucket(bucket)
        .key(key)
        .content_type(content_type)
        .presigned(presigning)
        .await
        .map_err(|e| AppError::Presign(DisplayErrorContext(&e).to_string()))?;

    Ok(request.uri().to_string())
}
