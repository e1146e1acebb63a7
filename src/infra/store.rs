//! Usage: Storage boundary owned by the host platform (plugin settings + per-user metadata),
//! with a pooled SQLite implementation and an in-memory one for embedding and tests.

use crate::shared::error::AppResult;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

const BUSY_TIMEOUT: Duration = Duration::from_millis(2000);
const POOL_MAX_SIZE: u32 = 4;

/// Key/value store for plugin settings. Reads and writes are per-key; the
/// host's storage layer provides its own consistency guarantees.
pub trait SettingsStore: Send + Sync {
    fn get_setting(&self, key: &str) -> AppResult<Option<String>>;
    fn set_setting(&self, key: &str, value: &str) -> AppResult<()>;
}

/// Arbitrary key/value metadata attached to a local user id. Writing `None`
/// clears the value; reading a never-written key yields `None`.
pub trait UserMetaStore: Send + Sync {
    fn get_user_meta(&self, user_id: i64, key: &str) -> AppResult<Option<String>>;
    fn set_user_meta(&self, user_id: i64, key: &str, value: Option<&str>) -> AppResult<()>;
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS plugin_settings (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS user_meta (
    user_id INTEGER NOT NULL,
    key     TEXT NOT NULL,
    value   TEXT NOT NULL,
    PRIMARY KEY (user_id, key)
);
"#;

#[derive(Clone)]
pub struct SqliteStore {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let manager = SqliteConnectionManager::file(path.as_ref()).with_init(|conn| {
            conn.busy_timeout(BUSY_TIMEOUT)?;
            conn.execute_batch(
                r#"
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;
PRAGMA synchronous = NORMAL;
"#,
            )
        });

        let pool = Pool::builder()
            .max_size(POOL_MAX_SIZE)
            .build(manager)
            .map_err(|e| format!("STORE_ERROR: failed to create db pool: {e}"))?;

        let conn = pool
            .get()
            .map_err(|e| format!("STORE_ERROR: failed to get startup connection: {e}"))?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| format!("STORE_ERROR: failed to apply schema: {e}"))?;

        Ok(Self { pool })
    }

    fn conn(&self) -> AppResult<r2d2::PooledConnection<SqliteConnectionManager>> {
        self.pool
            .get()
            .map_err(|e| format!("STORE_ERROR: failed to get connection from pool: {e}").into())
    }
}

impl SettingsStore for SqliteStore {
    fn get_setting(&self, key: &str) -> AppResult<Option<String>> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT value FROM plugin_settings WHERE key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(|e| format!("STORE_ERROR: failed to read setting {key}: {e}").into())
    }

    fn set_setting(&self, key: &str, value: &str) -> AppResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO plugin_settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )
        .map_err(|e| format!("STORE_ERROR: failed to write setting {key}: {e}"))?;
        Ok(())
    }
}

impl UserMetaStore for SqliteStore {
    fn get_user_meta(&self, user_id: i64, key: &str) -> AppResult<Option<String>> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT value FROM user_meta WHERE user_id = ?1 AND key = ?2",
            params![user_id, key],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(|e| format!("STORE_ERROR: failed to read user meta {key}: {e}").into())
    }

    fn set_user_meta(&self, user_id: i64, key: &str, value: Option<&str>) -> AppResult<()> {
        let conn = self.conn()?;
        match value {
            Some(value) => {
                conn.execute(
                    "INSERT INTO user_meta (user_id, key, value) VALUES (?1, ?2, ?3)
                     ON CONFLICT(user_id, key) DO UPDATE SET value = excluded.value",
                    params![user_id, key, value],
                )
                .map_err(|e| format!("STORE_ERROR: failed to write user meta {key}: {e}"))?;
            }
            None => {
                conn.execute(
                    "DELETE FROM user_meta WHERE user_id = ?1 AND key = ?2",
                    params![user_id, key],
                )
                .map_err(|e| format!("STORE_ERROR: failed to clear user meta {key}: {e}"))?;
            }
        }
        Ok(())
    }
}

/// Process-local store backed by hash maps. Stands in for the host platform's
/// storage in tests and lightweight embeddings.
#[derive(Default)]
pub struct MemoryStore {
    settings: Mutex<HashMap<String, String>>,
    user_meta: Mutex<HashMap<(i64, String), String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn get_setting(&self, key: &str) -> AppResult<Option<String>> {
        let settings = self
            .settings
            .lock()
            .map_err(|_| "STORE_ERROR: settings lock poisoned")?;
        Ok(settings.get(key).cloned())
    }

    fn set_setting(&self, key: &str, value: &str) -> AppResult<()> {
        let mut settings = self
            .settings
            .lock()
            .map_err(|_| "STORE_ERROR: settings lock poisoned")?;
        settings.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl UserMetaStore for MemoryStore {
    fn get_user_meta(&self, user_id: i64, key: &str) -> AppResult<Option<String>> {
        let meta = self
            .user_meta
            .lock()
            .map_err(|_| "STORE_ERROR: user meta lock poisoned")?;
        Ok(meta.get(&(user_id, key.to_string())).cloned())
    }

    fn set_user_meta(&self, user_id: i64, key: &str, value: Option<&str>) -> AppResult<()> {
        let mut meta = self
            .user_meta
            .lock()
            .map_err(|_| "STORE_ERROR: user meta lock poisoned")?;
        match value {
            Some(value) => {
                meta.insert((user_id, key.to_string()), value.to_string());
            }
            None => {
                meta.remove(&(user_id, key.to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_settings_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.get_setting("fusio_base_url").unwrap(), None);

        store
            .set_setting("fusio_base_url", "https://api.example.com")
            .unwrap();
        assert_eq!(
            store.get_setting("fusio_base_url").unwrap().as_deref(),
            Some("https://api.example.com")
        );

        store.set_setting("fusio_base_url", "https://other.test").unwrap();
        assert_eq!(
            store.get_setting("fusio_base_url").unwrap().as_deref(),
            Some("https://other.test")
        );
    }

    #[test]
    fn memory_store_meta_clear_is_idempotent() {
        let store = MemoryStore::new();
        store.set_user_meta(7, "fusio_access_token", None).unwrap();
        assert_eq!(store.get_user_meta(7, "fusio_access_token").unwrap(), None);

        store
            .set_user_meta(7, "fusio_access_token", Some("abc123"))
            .unwrap();
        assert_eq!(
            store.get_user_meta(7, "fusio_access_token").unwrap().as_deref(),
            Some("abc123")
        );

        store.set_user_meta(7, "fusio_access_token", None).unwrap();
        assert_eq!(store.get_user_meta(7, "fusio_access_token").unwrap(), None);
    }

    #[test]
    fn memory_store_meta_is_scoped_by_user() {
        let store = MemoryStore::new();
        store.set_user_meta(1, "fusio_account", Some("{}")).unwrap();
        assert_eq!(store.get_user_meta(2, "fusio_account").unwrap(), None);
    }
}
