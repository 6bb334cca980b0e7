//! SQLite pool and schema for the blob store.

pub mod blob_store;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use std::path::Path;

use crate::state::DbPool;

const SCHEMA: &str = include_str!("../../migrations/001_initial.sql");

/// Bumped whenever `SCHEMA` changes; stored in `PRAGMA user_version`.
const SCHEMA_VERSION: i64 = 1;

pub fn create_pool(db_path: &Path) -> anyhow::Result<DbPool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let manager = SqliteConnectionManager::file(db_path)
        .with_init(|conn| conn.execute_batch("PRAGMA busy_timeout = 5000;"));
    let pool = Pool::builder().max_size(8).build(manager)?;

    pool.get()?
        .execute_batch("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")?;

    Ok(pool)
}

/// Create the `blobs` table on a fresh database. Safe to run on every start.
pub fn run_migrations(pool: &DbPool) -> anyhow::Result<()> {
    let conn = pool.get()?;
    let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if version < SCHEMA_VERSION {
        tracing::info!("Applying schema version {}", SCHEMA_VERSION);
        conn.execute_batch(SCHEMA)?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    }
    Ok(())
}
