//! Key-value repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide whole-document read/write APIs over the `storage` table.
//! - Own JSON (de)serialization of persisted collections.
//!
//! # Invariants
//! - Every write replaces the full value under its key in one statement,
//!   so readers never observe a partially written collection.
//! - Read paths reject undecodable persisted state instead of masking it.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Persisted key layout, identical to the original browser-storage keys.
pub mod keys {
    pub const PROJECTS: &str = "projects";
    pub const DELETED_PROJECTS: &str = "deletedProjects";
    pub const PROJECT_LOGS: &str = "projectLogs";
    pub const SKILLS: &str = "skills";
    pub const DELETED_SKILLS: &str = "deletedSkills";
    pub const LAST_DELETED_SKILL: &str = "lastDeletedSkill";
    pub const MESSAGES: &str = "messages";
    pub const USERS: &str = "users";
    pub const CURRENT_USER: &str = "currentUser";
    pub const IS_LOGGED_IN: &str = "isLoggedIn";
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for storage access and value (de)serialization.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Persisted or outgoing value could not be (de)serialized.
    Serde {
        key: String,
        message: String,
    },
    /// Connection has not gone through migration bootstrap.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serde { key, message } => {
                write!(f, "invalid persisted value under `{key}`: {message}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection not migrated: schema version {actual_version}, expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence contract used by every store.
///
/// Raw values are JSON text; the provided methods add typed collection
/// and single-record access on top of the three raw primitives.
pub trait KeyValueRepository {
    /// Reads the raw JSON document under `key`, if present.
    fn read_value(&self, key: &str) -> RepoResult<Option<String>>;
    /// Writes (inserts or replaces) the raw JSON document under `key`.
    fn write_value(&self, key: &str, value: &str) -> RepoResult<()>;
    /// Removes `key` entirely. Missing keys are not an error.
    fn remove_value(&self, key: &str) -> RepoResult<()>;

    /// Loads a collection, treating a missing key as empty.
    fn load_collection<T: DeserializeOwned>(&self, key: &str) -> RepoResult<Vec<T>> {
        match self.read_value(key)? {
            Some(text) => decode(key, &text),
            None => Ok(Vec::new()),
        }
    }

    /// Persists a whole collection under `key`.
    fn save_collection<T: Serialize>(&self, key: &str, items: &[T]) -> RepoResult<()> {
        self.write_value(key, &encode(key, items)?)
    }

    /// Loads a single optional record, treating a missing key as `None`.
    fn load_record<T: DeserializeOwned>(&self, key: &str) -> RepoResult<Option<T>> {
        match self.read_value(key)? {
            Some(text) => decode(key, &text).map(Some),
            None => Ok(None),
        }
    }

    /// Persists a single record, or removes the key when `record` is `None`.
    fn save_record<T: Serialize>(&self, key: &str, record: Option<&T>) -> RepoResult<()> {
        match record {
            Some(value) => self.write_value(key, &encode(key, value)?),
            None => self.remove_value(key),
        }
    }
}

fn decode<T: DeserializeOwned>(key: &str, text: &str) -> RepoResult<T> {
    serde_json::from_str(text).map_err(|err| RepoError::Serde {
        key: key.to_string(),
        message: err.to_string(),
    })
}

fn encode<T: Serialize + ?Sized>(key: &str, value: &T) -> RepoResult<String> {
    serde_json::to_string(value).map_err(|err| RepoError::Serde {
        key: key.to_string(),
        message: err.to_string(),
    })
}

/// SQLite-backed key-value repository over the `storage` table.
pub struct SqliteKvRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// Rejects connections that skipped migration bootstrap or whose
    /// schema is missing the required table/columns.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl KeyValueRepository for SqliteKvRepository<'_> {
    fn read_value(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM storage WHERE key = ?1;", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn write_value(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO storage (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_value(&self, key: &str) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM storage WHERE key = ?1;", [key])?;
        Ok(())
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version = current_user_version(conn)?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "storage")? {
        return Err(RepoError::MissingRequiredTable("storage"));
    }

    for column in ["key", "value"] {
        if !table_has_column(conn, "storage", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "storage",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
