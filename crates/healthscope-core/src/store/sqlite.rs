//! SQLite key-value backend with connection pooling

use std::path::{Path, PathBuf};

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};
use tracing::info;

use super::{KeyValueStore, KvWrite};
use crate::error::Result;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

const UPSERT_SQL: &str = r#"
    INSERT INTO kv (key, value) VALUES (?1, ?2)
    ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP
"#;

const DELETE_SQL: &str = "DELETE FROM kv WHERE key = ?";

/// Durable key-value store kept in a single `kv` table
#[derive(Clone)]
pub struct SqliteStore {
    pool: DbPool,
    /// Path to the database file (`None` for in-memory stores)
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open (or create) the store at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder().max_size(4).build(manager)?;

        let store = Self {
            pool,
            path: Some(path.to_path_buf()),
        };
        store.run_migrations()?;
        info!(path = %path.display(), "Opened key-value store");

        Ok(store)
    }

    /// Create an in-memory store (for testing)
    ///
    /// Each SQLite `:memory:` connection is its own database, so the pool is
    /// pinned to a single connection.
    pub fn in_memory() -> Result<Self> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder().max_size(1).build(manager)?;

        let store = Self { pool, path: None };
        store.run_migrations()?;
        Ok(store)
    }

    /// Path to the database file
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Number of stored keys
    pub fn key_count(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM kv", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- Synchronous NORMAL: safe with WAL, faster than FULL
            PRAGMA synchronous = NORMAL;

            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );
            "#,
        )?;

        // WAL only applies to file-backed databases
        if self.path.is_some() {
            conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))?;
        }

        Ok(())
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(UPSERT_SQL, params![key, value])?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(DELETE_SQL, params![key])?;
        Ok(())
    }

    fn write_batch(&self, writes: &[KvWrite]) -> Result<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        for write in writes {
            match write {
                KvWrite::Set { key, value } => {
                    tx.execute(UPSERT_SQL, params![key, value])?;
                }
                KvWrite::Remove { key } => {
                    tx.execute(DELETE_SQL, params![key])?;
                }
            }
        }

        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_store() {
        let store = SqliteStore::in_memory().unwrap();
        assert_eq!(store.key_count().unwrap(), 0);

        store.set("symptomsData", "[]").unwrap();
        store.set("symptomsData", "[1]").unwrap();
        assert_eq!(store.get("symptomsData").unwrap().as_deref(), Some("[1]"));
        assert_eq!(store.key_count().unwrap(), 1);

        store.remove("symptomsData").unwrap();
        assert_eq!(store.get("symptomsData").unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("healthscope.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.set("isBlock", "false").unwrap();
        }

        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(reopened.get("isBlock").unwrap().as_deref(), Some("false"));
        assert_eq!(reopened.path(), Some(path.as_path()));
    }

    #[test]
    fn test_write_batch_commits_together() {
        let store = SqliteStore::in_memory().unwrap();
        store.set("userData", "{}").unwrap();

        store
            .write_batch(&[
                KvWrite::remove("userData"),
                KvWrite::set("hasCompletedOnboarding", "false"),
                KvWrite::set("notificationsEnabled", "true"),
            ])
            .unwrap();

        assert_eq!(store.get("userData").unwrap(), None);
        assert_eq!(
            store.get("notificationsEnabled").unwrap().as_deref(),
            Some("true")
        );
        assert_eq!(store.key_count().unwrap(), 2);
    }

    #[test]
    fn test_failed_batch_rolls_back() {
        let store = SqliteStore::in_memory().unwrap();
        store.set("userData", "{\"name\":\"Ana\"}").unwrap();
        store
            .conn()
            .unwrap()
            .execute_batch(
                r#"
                CREATE TRIGGER reject_flag BEFORE INSERT ON kv
                WHEN NEW.key = 'notificationsEnabled'
                BEGIN
                    SELECT RAISE(ABORT, 'rejected');
                END;
                "#,
            )
            .unwrap();

        let result = store.write_batch(&[
            KvWrite::remove("userData"),
            KvWrite::set("hasCompletedOnboarding", "false"),
            KvWrite::set("notificationsEnabled", "true"),
        ]);

        assert!(result.is_err());
        // Earlier writes in the batch were undone
        assert_eq!(
            store.get("userData").unwrap().as_deref(),
            Some("{\"name\":\"Ana\"}")
        );
        assert_eq!(store.get("hasCompletedOnboarding").unwrap(), None);
        assert_eq!(store.key_count().unwrap(), 1);
    }
}
