use std::collections::HashMap;
use std::sync::Mutex;

use rusqlite::{params, OptionalExtension};
use thiserror::Error;

use crate::state::DbPool;

/// Default quota, roughly what a browser grants one origin.
pub const DEFAULT_CAPACITY_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("Storage full: {needed} bytes needed, capacity is {capacity}")]
    StorageFull { needed: u64, capacity: u64 },

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("SQL error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("Blob store unavailable: {0}")]
    Unavailable(String),
}

/// Opaque key-value store for whole serialized values.
///
/// A `set` either stores the full value or fails and leaves the previous
/// value untouched. Quota is counted over keys plus values.
pub trait BlobStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError>;
    fn set(&self, key: &str, value: &[u8]) -> Result<(), BlobError>;
    fn remove(&self, key: &str) -> Result<(), BlobError>;
}

fn check_quota(
    used_by_others: u64,
    key: &str,
    value: &[u8],
    capacity: u64,
) -> Result<(), BlobError> {
    let needed = used_by_others + key.len() as u64 + value.len() as u64;
    if needed > capacity {
        return Err(BlobError::StorageFull { needed, capacity });
    }
    Ok(())
}

/// SQLite-backed store using the `blobs` table.
pub struct SqliteBlobStore {
    pool: DbPool,
    capacity: u64,
}

impl SqliteBlobStore {
    pub fn new(pool: DbPool, capacity: u64) -> Self {
        Self { pool, capacity }
    }
}

impl BlobStore for SqliteBlobStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError> {
        let conn = self.pool.get()?;
        let value = conn
            .query_row(
                "SELECT value FROM blobs WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), BlobError> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        let used_by_others: i64 = tx.query_row(
            "SELECT COALESCE(SUM(LENGTH(key) + LENGTH(value)), 0) FROM blobs WHERE key != ?1",
            params![key],
            |row| row.get(0),
        )?;
        check_quota(used_by_others.max(0) as u64, key, value, self.capacity)?;

        tx.execute(
            "INSERT INTO blobs (key, value, updated_at)
             VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(key) DO UPDATE SET
               value = excluded.value,
               updated_at = excluded.updated_at",
            params![key, value],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), BlobError> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM blobs WHERE key = ?1", params![key])?;
        Ok(())
    }
}

/// In-process store, used for ephemeral runs and tests.
pub struct MemoryBlobStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    capacity: u64,
}

impl MemoryBlobStore {
    pub fn new(capacity: u64) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            capacity,
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>, BlobError> {
        self.entries
            .lock()
            .map_err(|_| BlobError::Unavailable("memory store lock poisoned".into()))
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY_BYTES)
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, BlobError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), BlobError> {
        let mut entries = self.lock()?;
        let used_by_others: u64 = entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| (k.len() + v.len()) as u64)
            .sum();
        check_quota(used_by_others, key, value, self.capacity)?;
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), BlobError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn sqlite_store(capacity: u64) -> (tempfile::TempDir, SqliteBlobStore) {
        let tmp = tempfile::tempdir().unwrap();
        let pool = db::create_pool(&tmp.path().join("blobs.db")).unwrap();
        db::run_migrations(&pool).unwrap();
        (tmp, SqliteBlobStore::new(pool, capacity))
    }

    #[test]
    fn sqlite_set_then_get() {
        let (_tmp, store) = sqlite_store(1024);
        assert!(store.get("k").unwrap().is_none());
        store.set("k", b"hello").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some(&b"hello"[..]));
        store.set("k", b"again").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some(&b"again"[..]));
    }

    #[test]
    fn sqlite_rejects_oversized_write_and_keeps_old_value() {
        let (_tmp, store) = sqlite_store(16);
        store.set("k", b"small").unwrap();
        let err = store.set("k", &[0u8; 64]).unwrap_err();
        assert!(matches!(err, BlobError::StorageFull { capacity: 16, .. }));
        assert_eq!(store.get("k").unwrap().as_deref(), Some(&b"small"[..]));
    }

    #[test]
    fn sqlite_quota_counts_other_keys() {
        let (_tmp, store) = sqlite_store(20);
        store.set("a", b"0123456789").unwrap();
        assert!(matches!(
            store.set("b", b"0123456789"),
            Err(BlobError::StorageFull { .. })
        ));
        store.remove("a").unwrap();
        store.set("b", b"0123456789").unwrap();
    }

    #[test]
    fn memory_store_enforces_capacity() {
        let store = MemoryBlobStore::new(8);
        store.set("k", b"1234").unwrap();
        assert!(matches!(
            store.set("k", b"123456789"),
            Err(BlobError::StorageFull { needed: 10, capacity: 8 })
        ));
        assert_eq!(store.get("k").unwrap().as_deref(), Some(&b"1234"[..]));
    }

    #[test]
    fn memory_remove_is_idempotent() {
        let store = MemoryBlobStore::default();
        store.remove("missing").unwrap();
        store.set("k", b"v").unwrap();
        store.remove("k").unwrap();
        assert!(store.get("k").unwrap().is_none());
    }
}
