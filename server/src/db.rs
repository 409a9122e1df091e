use diesel::connection::SimpleConnection;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::error::Error;
use std::time::Duration;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../migrations");

pub type DbConn = SqliteConnection;
pub type DbPool = r2d2::Pool<ConnectionManager<DbConn>>;

type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Per-connection pragmas. SQLite applies these per connection, not per file.
#[derive(Debug, Clone, Copy)]
struct ConnectionOptions {
    busy_timeout: Duration,
}

impl CustomizeConnection<DbConn, r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut DbConn) -> Result<(), r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};",
            self.busy_timeout.as_millis()
        ))
        .map_err(r2d2::Error::QueryError)
    }
}

pub fn create_pool(database_url: &str) -> Result<DbPool, BoxError> {
    build_pool(database_url, None)
}

/// Single-connection in-memory database. Every pooled connection to
/// `:memory:` would otherwise see its own empty database.
pub fn in_memory_pool() -> Result<DbPool, BoxError> {
    build_pool(":memory:", Some(1))
}

fn build_pool(database_url: &str, max_size: Option<u32>) -> Result<DbPool, BoxError> {
    let manager = ConnectionManager::<DbConn>::new(database_url);
    let mut builder = r2d2::Pool::builder().connection_customizer(Box::new(ConnectionOptions {
        busy_timeout: Duration::from_secs(5),
    }));
    if let Some(max_size) = max_size {
        builder = builder.max_size(max_size);
    }
    let pool = builder.build(manager)?;

    // Run pending migrations on startup
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    if !applied.is_empty() {
        tracing::info!(count = applied.len(), "applied database migrations");
    }

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::prelude::*;
    use diesel::sql_types::Integer;

    #[derive(QueryableByName)]
    struct PragmaValue {
        #[diesel(sql_type = Integer)]
        foreign_keys: i32,
    }

    #[test]
    fn test_in_memory_pool_is_migrated() {
        let pool = in_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();
        let count: i64 = crate::schema::family_groups::table
            .count()
            .get_result(&mut conn)
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let pool = in_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();
        let value: PragmaValue = diesel::sql_query("PRAGMA foreign_keys")
            .get_result(&mut conn)
            .unwrap();
        assert_eq!(value.foreign_keys, 1);
    }
}
