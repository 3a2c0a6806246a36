//! SQLite-backed ordered store.
//!
//! One database file holds any number of named partitions, each a
//! `WITHOUT ROWID` table keyed by a BLOB primary key. SQLite compares BLOBs
//! with `memcmp`, which gives the bytewise ordering [`OrderedStore`]
//! requires; prefix scans become half-open range queries on the key.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::traits::{Entry, OrderedStore};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// A SQLite database shared by one or more [`SqlitePartition`]s.
#[derive(Clone)]
pub struct SqliteEngine {
    conn: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl SqliteEngine {
    /// Open (or create) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.query_row("PRAGMA journal_mode=WAL;", [], |_| Ok(()))?;
        info!(path = %path.display(), "opened sqlite store");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: None,
        })
    }

    /// The database file, or `None` for an in-memory database.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Open (creating if needed) the partition called `name`.
    ///
    /// Names must match `[a-z_][a-z0-9_]*`.
    pub fn partition(&self, name: &str) -> StoreResult<SqlitePartition> {
        validate_partition_name(name)?;
        let table = format!("kv_{name}");
        {
            let conn = self
                .conn
                .lock()
                .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
            conn.execute(
                &format!(
                    "CREATE TABLE IF NOT EXISTS {table} (
                        key   BLOB PRIMARY KEY NOT NULL,
                        value BLOB NOT NULL
                    ) WITHOUT ROWID"
                ),
                [],
            )?;
        }
        debug!(partition = name, "opened partition");
        Ok(SqlitePartition {
            conn: Arc::clone(&self.conn),
            name: name.to_string(),
            sql: PartitionSql::new(&table),
        })
    }
}

impl std::fmt::Debug for SqliteEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteEngine")
            .field("path", &self.path)
            .finish()
    }
}

/// Statements for one partition, rendered once at open.
struct PartitionSql {
    put: String,
    get: String,
    delete: String,
    scan_bounded: String,
    scan_open: String,
}

impl PartitionSql {
    fn new(table: &str) -> Self {
        Self {
            put: format!(
                "INSERT INTO {table} (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value"
            ),
            get: format!("SELECT value FROM {table} WHERE key = ?1"),
            delete: format!("DELETE FROM {table} WHERE key = ?1"),
            scan_bounded: format!(
                "SELECT key, value FROM {table} WHERE key >= ?1 AND key < ?2 ORDER BY key"
            ),
            scan_open: format!("SELECT key, value FROM {table} WHERE key >= ?1 ORDER BY key"),
        }
    }
}

/// One named keyspace inside a [`SqliteEngine`].
pub struct SqlitePartition {
    conn: Arc<Mutex<Connection>>,
    name: String,
    sql: PartitionSql,
}

impl SqlitePartition {
    /// The partition's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> rusqlite::Result<T>) -> StoreResult<T> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        Ok(f(&conn)?)
    }
}

impl OrderedStore for SqlitePartition {
    fn put(&self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        self.with_conn(|conn| {
            conn.prepare_cached(&self.sql.put)?
                .execute(params![key, value])
                .map(|_| ())
        })
    }

    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        self.with_conn(|conn| {
            conn.prepare_cached(&self.sql.get)?
                .query_row(params![key], |row| row.get::<_, Vec<u8>>(0))
                .optional()
        })
    }

    fn delete(&self, key: &[u8]) -> StoreResult<bool> {
        self.with_conn(|conn| {
            conn.prepare_cached(&self.sql.delete)?
                .execute(params![key])
                .map(|changed| changed > 0)
        })
    }

    fn scan_prefix(&self, prefix: &[u8]) -> StoreResult<Vec<Entry>> {
        self.with_conn(|conn| {
            let read_row = |row: &rusqlite::Row<'_>| -> rusqlite::Result<Entry> {
                Ok((row.get(0)?, row.get(1)?))
            };
            match prefix_successor(prefix) {
                Some(end) => conn
                    .prepare_cached(&self.sql.scan_bounded)?
                    .query_map(params![prefix, end], read_row)?
                    .collect(),
                None => conn
                    .prepare_cached(&self.sql.scan_open)?
                    .query_map(params![prefix], read_row)?
                    .collect(),
            }
        })
    }
}

impl std::fmt::Debug for SqlitePartition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlitePartition")
            .field("name", &self.name)
            .finish()
    }
}

/// The smallest key greater than every key starting with `prefix`.
///
/// `None` when no such bound exists (empty prefix, or all `0xff`), in which
/// case the scan runs to the end of the keyspace.
fn prefix_successor(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.pop() {
        if last < u8::MAX {
            end.push(last + 1);
            return Some(end);
        }
    }
    None
}

fn validate_partition_name(name: &str) -> StoreResult<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .map(|c| c.is_ascii_lowercase() || c == '_')
        .unwrap_or(false);
    let valid_rest = chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if valid_start && valid_rest {
        Ok(())
    } else {
        Err(StoreError::InvalidPartition(name.to_string()))
    }
}
