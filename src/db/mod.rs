//! SQLite storage for the semantic index.
//!
//! The index lives in a single database file: rendered documents, their
//! sqlite-vec embeddings and a small key/value `schema_meta` table recording
//! how and when the index was built.

pub mod schema;

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;
use sqlite_vec::sqlite3_vec_init;
use std::path::Path;
use std::sync::Once;

pub use schema::SCHEMA_VERSION;

pub const META_SCHEMA_VERSION: &str = "schema_version";
pub const META_EMBEDDING_MODEL: &str = "embedding_model";
pub const META_KNOWLEDGE_VERSION: &str = "knowledge_version";
pub const META_DOCUMENT_COUNT: &str = "document_count";
pub const META_INDEXED_AT: &str = "indexed_at";

static SQLITE_VEC_INIT: Once = Once::new();

/// Register the sqlite-vec extension globally. Safe to call multiple times.
pub fn load_sqlite_vec() {
    SQLITE_VEC_INIT.call_once(|| unsafe {
        rusqlite::ffi::sqlite3_auto_extension(Some(std::mem::transmute(
            sqlite3_vec_init as *const (),
        )));
    });
}

/// Open (or create) the index database with sqlite-vec loaded and the
/// schema initialized.
pub fn open_database(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    load_sqlite_vec();

    let conn = Connection::open(path)
        .with_context(|| format!("failed to open index at {}", path.display()))?;
    conn.pragma_update(None, "journal_mode", "WAL")?;

    schema::init_schema(&conn).context("failed to initialize schema")?;

    tracing::debug!(path = %path.display(), "index database opened");
    Ok(conn)
}

/// Open an in-memory index for testing.
#[cfg(test)]
pub fn open_memory_database() -> Result<Connection> {
    load_sqlite_vec();
    let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    schema::init_schema(&conn).context("failed to initialize schema")?;
    Ok(conn)
}

/// Raw little-endian bytes of an embedding, as sqlite-vec expects.
pub fn embedding_to_bytes(embedding: &[f32]) -> &[u8] {
    unsafe {
        std::slice::from_raw_parts(
            embedding.as_ptr() as *const u8,
            std::mem::size_of_val(embedding),
        )
    }
}

pub fn get_meta(conn: &Connection, key: &str) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM schema_meta WHERE key = ?1",
        [key],
        |row| row.get(0),
    )
    .optional()
}

pub fn set_meta(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_meta (key, value) VALUES (?1, ?2)",
        [key, value],
    )?;
    Ok(())
}

pub fn document_count(conn: &Connection) -> rusqlite::Result<u64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
    Ok(count as u64)
}

/// What `schema_meta` says about the last index build.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct IndexMeta {
    pub schema_version: Option<String>,
    pub embedding_model: Option<String>,
    pub knowledge_version: Option<String>,
    pub document_count: Option<u64>,
    pub indexed_at: Option<String>,
}

pub fn read_meta(conn: &Connection) -> rusqlite::Result<IndexMeta> {
    Ok(IndexMeta {
        schema_version: get_meta(conn, META_SCHEMA_VERSION)?,
        embedding_model: get_meta(conn, META_EMBEDDING_MODEL)?,
        knowledge_version: get_meta(conn, META_KNOWLEDGE_VERSION)?,
        document_count: get_meta(conn, META_DOCUMENT_COUNT)?.and_then(|v| v.parse().ok()),
        indexed_at: get_meta(conn, META_INDEXED_AT)?,
    })
}
