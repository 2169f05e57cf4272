//! Plain SQL migration runner.
//!
//! Files live in a `migrations` directory and hold `;`-separated statements.
//! [`Migrator`] reads a file, splits it with [`split_statements`] and executes
//! the statements one after the other on any sea-orm connection, stopping at
//! the first error.

mod error;
mod runner;
mod splitter;

pub use error::MigrationError;
pub use runner::{DEFAULT_MIGRATIONS_DIR, MigrationReport, Migrator};
pub use splitter::split_statements;
