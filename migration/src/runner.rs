use crate::error::MigrationError;
use crate::splitter::split_statements;
use sea_orm::{ConnectionTrait, TransactionTrait};
use std::path::{Path, PathBuf};

pub const DEFAULT_MIGRATIONS_DIR: &str = "migrations";

/// Outcome of applying one migration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub file: String,
    pub statements: usize,
}

/// Applies plain SQL files from a migrations directory.
///
/// Nothing about applied migrations is recorded: every call reads the file
/// again and executes all of its statements. Callers decide which files run
/// and in what order.
#[derive(Debug, Clone)]
pub struct Migrator {
    migrations_dir: PathBuf,
    transactional: bool,
}

impl Default for Migrator {
    fn default() -> Self {
        Self::new(DEFAULT_MIGRATIONS_DIR)
    }
}

impl Migrator {
    pub fn new(migrations_dir: impl AsRef<Path>) -> Self {
        Self {
            migrations_dir: migrations_dir.as_ref().to_path_buf(),
            transactional: false,
        }
    }

    /// Wrap each file in a single transaction, committed only when every
    /// statement succeeds. Engines that auto-commit DDL (MySQL) still keep
    /// DDL applied before a failure.
    #[must_use]
    pub fn transactional(mut self, transactional: bool) -> Self {
        self.transactional = transactional;
        self
    }

    pub fn migrations_dir(&self) -> &Path {
        &self.migrations_dir
    }

    /// Read a migration file and split it into statements
    pub async fn load(&self, filename: &str) -> Result<Vec<String>, MigrationError> {
        let path = self.migrations_dir.join(filename);
        let sql = tokio::fs::read_to_string(&path).await.map_err(|source| {
            tracing::error!(file = filename, error = %source, "Failed to read migration file");
            MigrationError::FileRead { path, source }
        })?;

        Ok(split_statements(&sql))
    }

    /// Execute every statement of `filename` on `conn`, in file order.
    ///
    /// Stops at the first failing statement; the remaining ones are never
    /// sent. Without [`Migrator::transactional`] the statements that already
    /// ran stay applied.
    pub async fn run<C>(&self, conn: &C, filename: &str) -> Result<MigrationReport, MigrationError>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let statements = self.load(filename).await?;

        if self.transactional {
            let txn = conn
                .begin()
                .await
                .map_err(|source| MigrationError::Transaction {
                    file: filename.to_string(),
                    source,
                })?;

            if let Err(err) = execute_statements(&txn, filename, &statements).await {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!(file = filename, error = %rollback_err, "Rollback failed");
                }
                return Err(err);
            }

            txn.commit()
                .await
                .map_err(|source| MigrationError::Transaction {
                    file: filename.to_string(),
                    source,
                })?;
        } else {
            execute_statements(conn, filename, &statements).await?;
        }

        Ok(MigrationReport {
            file: filename.to_string(),
            statements: statements.len(),
        })
    }

    /// Run several files in the given order, stopping at the first failure
    pub async fn run_all<C, S>(
        &self,
        conn: &C,
        files: &[S],
    ) -> Result<Vec<MigrationReport>, MigrationError>
    where
        C: ConnectionTrait + TransactionTrait,
        S: AsRef<str>,
    {
        let mut reports = Vec::with_capacity(files.len());
        for file in files {
            let report = self.run(conn, file.as_ref()).await?;
            tracing::info!(
                file = %report.file,
                statements = report.statements,
                "Migration completed successfully"
            );
            reports.push(report);
        }

        Ok(reports)
    }
}

async fn execute_statements<C>(
    conn: &C,
    file: &str,
    statements: &[String],
) -> Result<(), MigrationError>
where
    C: ConnectionTrait,
{
    for (index, statement) in statements.iter().enumerate() {
        let position = index + 1;
        conn.execute_unprepared(statement)
            .await
            .map_err(|source| {
                tracing::error!(file, position, error = %source, "Failed to execute statement");
                MigrationError::Execution {
                    file: file.to_string(),
                    position,
                    statement: statement.clone(),
                    source,
                }
            })?;
        tracing::debug!(file, position, statement = statement.as_str(), "Executed statement");
    }

    Ok(())
}
