use sea_orm::DbErr;
use std::path::PathBuf;

/// Errors raised while applying a migration file
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// The migration file is missing or unreadable. Nothing was executed.
    #[error("Failed to read migration file {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A statement failed. Statements before it stay applied unless the run
    /// was transactional.
    #[error("Statement {position} in {file} failed: {source}\n  {statement}")]
    Execution {
        file: String,
        position: usize,
        statement: String,
        #[source]
        source: DbErr,
    },
    /// Opening or committing the wrapping transaction failed
    #[error("Transaction for {file} failed: {source}")]
    Transaction {
        file: String,
        #[source]
        source: DbErr,
    },
}

impl MigrationError {
    /// Name of the migration file the error belongs to
    pub fn file(&self) -> String {
        match self {
            MigrationError::FileRead { path, .. } => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            MigrationError::Execution { file, .. } | MigrationError::Transaction { file, .. } => {
                file.clone()
            }
        }
    }
}
