use migration::MigrationReport;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, ToSchema, Serialize, Deserialize, PartialEq, Eq)]
pub struct MigrationSummary {
    pub file: String,
    pub statements: usize,
}

impl From<MigrationReport> for MigrationSummary {
    fn from(report: MigrationReport) -> Self {
        Self {
            file: report.file,
            statements: report.statements,
        }
    }
}

#[derive(Debug, ToSchema, Serialize, Deserialize)]
pub struct InitResponse {
    pub success: bool,
    pub message: String,
    pub migrations: Vec<MigrationSummary>,
}

#[derive(Debug, ToSchema, Serialize, Deserialize)]
pub struct ConnectivityResponse {
    pub success: bool,
    pub result: i64,
}
