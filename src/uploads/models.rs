use crate::common::errors::AppError;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PresignQuery {
    /// Name of the file being uploaded
    #[serde(rename = "fileName")]
    pub file_name: Option<String>,
    /// MIME type the browser will send with the upload
    #[serde(rename = "fileType")]
    pub file_type: Option<String>,
}

impl PresignQuery {
    /// Both parameters, or the 400 the presign function answers with
    pub fn required(&self) -> Result<(&str, &str), AppError> {
        let file_name = self.file_name.as_deref().map(str::trim).unwrap_or_default();
        let file_type = self.file_type.as_deref().map(str::trim).unwrap_or_default();
        if file_name.is_empty() || file_type.is_empty() {
            return Err(AppError::BadRequest(
                "Missing fileName or fileType".to_string(),
            ));
        }
        Ok((file_name, file_type))
    }
}

#[derive(Debug, ToSchema, Serialize, Deserialize)]
pub struct PresignResponse {
    #[serde(rename = "uploadUrl")]
    pub upload_url: String,
    pub key: String,
}
