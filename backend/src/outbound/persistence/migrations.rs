//! Embedded database migrations applied at startup.
//!
//! Migrations run over a short-lived synchronous connection on the blocking
//! thread pool; the async pool is only built once the schema is current.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

/// Migrations compiled into the binary from the `migrations/` directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while applying migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// Could not open the migration connection.
    #[error("failed to connect for migrations: {0}")]
    Connection(#[from] diesel::ConnectionError),
    /// A migration failed to apply.
    #[error("failed to apply migrations: {message}")]
    Apply {
        /// Description of the migration failure.
        message: String,
    },
    /// The blocking migration task did not complete.
    #[error("migration task was cancelled or panicked")]
    Join,
}

/// Apply any pending migrations against the given database.
pub async fn run_pending_migrations(database_url: &str) -> Result<(), MigrationError> {
    let database_url = database_url.to_owned();
    tokio::task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&database_url)?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| MigrationError::Apply {
                message: err.to_string(),
            })?;
        info!(count = applied.len(), "database migrations applied");
        Ok(())
    })
    .await
    .map_err(|_| MigrationError::Join)?
}
