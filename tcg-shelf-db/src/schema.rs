//! Collection schema and database opening.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Cannot create database directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("Collection database has schema version {found}, this build understands {expected}")]
    VersionMismatch { expected: i32, found: i32 },
}

/// Schema version written by this build. Databases at any other version are
/// refused rather than migrated.
pub const CURRENT_VERSION: i32 = 1;

/// Apply the schema to `conn`. Existing tables and version rows are kept.
pub fn create_schema(conn: &Connection) -> Result<(), SchemaError> {
    conn.execute_batch(SCHEMA_SQL)?;
    if stored_version(conn)?.is_none() {
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [CURRENT_VERSION],
        )?;
    }
    Ok(())
}

/// Open the collection file at `path`, creating it and its directory when
/// missing.
pub fn open_database(path: &Path) -> Result<Connection, SchemaError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }

    let conn = Connection::open(path)?;
    let mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    log::debug!("Journal mode: {mode}");
    enable_foreign_keys(&conn)?;

    match stored_version(&conn)? {
        None => create_schema(&conn)?,
        Some(CURRENT_VERSION) => {}
        Some(found) => {
            return Err(SchemaError::VersionMismatch {
                expected: CURRENT_VERSION,
                found,
            });
        }
    }

    log::debug!("Opened collection database at {}", path.display());
    Ok(conn)
}

/// A throwaway collection held in memory.
pub fn open_memory() -> Result<Connection, SchemaError> {
    let conn = Connection::open_in_memory()?;
    enable_foreign_keys(&conn)?;
    create_schema(&conn)?;
    Ok(conn)
}

fn enable_foreign_keys(conn: &Connection) -> Result<(), SchemaError> {
    conn.pragma_update(None, "foreign_keys", true)?;
    Ok(())
}

/// Highest recorded version, or `None` for a database without a schema.
fn stored_version(conn: &Connection) -> Result<Option<i32>, SchemaError> {
    let has_table = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version'",
            [],
            |_| Ok(()),
        )
        .optional()?
        .is_some();
    if !has_table {
        return Ok(None);
    }

    let version: Option<i32> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get(0)
        })?;
    Ok(version)
}

// `set` is an SQL keyword, hence the quoting.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS "set" (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    release_date TEXT
);

CREATE TABLE IF NOT EXISTS card (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    type TEXT,
    rarity TEXT,
    image_url TEXT,
    set_id TEXT NOT NULL REFERENCES "set"(id)
);
CREATE INDEX IF NOT EXISTS idx_card_set ON card(set_id);
CREATE INDEX IF NOT EXISTS idx_card_name ON card(name);
"#;
