//! Database connection utilities.

use crate::DatabaseResult;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use shutterbin_error::{DatabaseError, DatabaseErrorKind};

/// Embedded schema migrations, applied at startup.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Connection pool over the SQLite record store.
pub type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

/// SQLite pragmas applied to every pooled connection.
///
/// WAL lets readers proceed during a write; the busy timeout covers the
/// request-handler pool all hitting one database file.
#[derive(Debug, Clone, Copy)]
struct ConnectionPragmas;

impl diesel::r2d2::CustomizeConnection<SqliteConnection, diesel::r2d2::Error>
    for ConnectionPragmas
{
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA busy_timeout = 5000; PRAGMA journal_mode = WAL;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Establish a single connection to the SQLite database.
///
/// # Errors
///
/// Returns an error if the connection fails.
pub fn establish_connection(database_url: &str) -> DatabaseResult<SqliteConnection> {
    SqliteConnection::establish(database_url)
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Connection(e.to_string())))
}

/// Build an r2d2 connection pool over the SQLite database.
///
/// # Errors
///
/// Returns an error if the pool cannot be constructed.
pub fn build_pool(database_url: &str) -> DatabaseResult<SqlitePool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .connection_customizer(Box::new(ConnectionPragmas))
        .build(manager)
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Connection(e.to_string())))
}

/// Apply any pending embedded migrations.
///
/// # Errors
///
/// Returns an error if a migration fails to apply.
pub fn run_migrations(conn: &mut SqliteConnection) -> DatabaseResult<()> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Migration(e.to_string())))?;

    if !applied.is_empty() {
        tracing::info!(count = applied.len(), "Applied pending migrations");
    }
    Ok(())
}
