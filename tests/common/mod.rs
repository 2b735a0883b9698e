//! Helpers for integration tests.

use pushkind_configurator::db::{DbPool, establish_connection_pool, run_migrations};
use tempfile::NamedTempFile;

/// Temporary database used in integration tests.
pub struct TestDb {
    tempfile: NamedTempFile,
    pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let tempfile = NamedTempFile::new().expect("Failed to create temp file");
        let pool = establish_connection_pool(tempfile.path().to_str().unwrap())
            .expect("Failed to establish SQLite connection.");
        run_migrations(&pool).expect("Migrations failed");
        TestDb { tempfile, pool }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    /// A fresh pool over the same database file, as a restarted process
    /// would open it.
    pub fn reopen(&self) -> DbPool {
        establish_connection_pool(self.tempfile.path().to_str().unwrap())
            .expect("Failed to reopen SQLite database.")
    }
}
