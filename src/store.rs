use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, params};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Fixed keys of the persisted client state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    AccessToken,
    RefreshToken,
    SessionId,
    User,
}

impl StorageKey {
    pub const ALL: [StorageKey; 4] = [
        StorageKey::AccessToken,
        StorageKey::RefreshToken,
        StorageKey::SessionId,
        StorageKey::User,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::AccessToken => "access_token",
            StorageKey::RefreshToken => "refresh_token",
            StorageKey::SessionId => "session_id",
            StorageKey::User => "user",
        }
    }
}

/// Durable key/value storage behind the auth context.
pub trait TokenStore: Send + Sync {
    fn get(&self, key: StorageKey) -> Result<Option<String>>;
    fn set(&self, key: StorageKey, value: &str) -> Result<()>;
    fn remove(&self, key: StorageKey) -> Result<()>;

    /// Removes every key, even if one removal fails; reports the first error.
    fn clear(&self) -> Result<()> {
        let mut first_error = None;
        for key in StorageKey::ALL {
            if let Err(e) = self.remove(key) {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

pub struct SqliteStore {
    conn: Mutex<Connection>,
    path: PathBuf,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open storage at {}", path.display()))?;
        let store = Self {
            conn: Mutex::new(conn),
            path: path.to_path_buf(),
        };
        store.init()?;
        Ok(store)
    }

    pub fn open_default() -> Result<Self> {
        Self::open(&Self::default_path())
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn default_path() -> PathBuf {
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "jbadmin") {
            proj_dirs.data_dir().join("jbadmin.db")
        } else {
            PathBuf::from("jbadmin.db")
        }
    }

    fn init(&self) -> Result<()> {
        self.lock()?.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS client_storage (
                key TEXT PRIMARY KEY CHECK (key IN ('access_token', 'refresh_token', 'session_id', 'user')),
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )?;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("storage connection lock poisoned"))
    }
}

impl TokenStore for SqliteStore {
    fn get(&self, key: StorageKey) -> Result<Option<String>> {
        let conn = self.lock()?;
        let result = conn.query_row(
            "SELECT value FROM client_storage WHERE key = ?1",
            [key.as_str()],
            |row| row.get(0),
        );
        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", key.as_str())),
        }
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<()> {
        self.lock()?
            .execute(
                "INSERT INTO client_storage (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
                params![key.as_str(), value],
            )
            .with_context(|| format!("Failed to write {}", key.as_str()))?;
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<()> {
        self.lock()?
            .execute(
                "DELETE FROM client_storage WHERE key = ?1",
                [key.as_str()],
            )
            .with_context(|| format!("Failed to remove {}", key.as_str()))?;
        Ok(())
    }
}

/// Process-local store; nothing survives the process.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<StorageKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryStore {
    fn get(&self, key: StorageKey) -> Result<Option<String>> {
        let values = self.values.lock().map_err(|_| anyhow!("store lock poisoned"))?;
        Ok(values.get(&key).cloned())
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<()> {
        let mut values = self.values.lock().map_err(|_| anyhow!("store lock poisoned"))?;
        values.insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<()> {
        let mut values = self.values.lock().map_err(|_| anyhow!("store lock poisoned"))?;
        values.remove(&key);
        Ok(())
    }
}
