use anyhow::Result;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::path::Path;

use super::traits::{DocumentStore, StorageError, StoredDocument};

const DB_SCHEMA_VERSION: i64 = 1;

#[derive(Clone)]
pub struct SqliteStorage {
    pub path: String,
}

fn map_document_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredDocument> {
    Ok(StoredDocument {
        id: row.get(0)?,
        author: row.get(1)?,
        body: row.get(2)?,
    })
}

fn db_insert(conn: &Connection, collection: &str, doc: &StoredDocument) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO documents (collection, id, author, body) VALUES (?1, ?2, ?3, ?4)",
        params![collection, doc.id, doc.author, doc.body],
    )?;
    Ok(())
}

fn db_load(
    conn: &Connection,
    collection: &str,
    id: &str,
) -> rusqlite::Result<Option<StoredDocument>> {
    conn.query_row(
        "SELECT id, author, body FROM documents WHERE collection = ?1 AND id = ?2",
        params![collection, id],
        map_document_row,
    )
    .optional()
}

fn db_list(conn: &Connection, collection: &str) -> rusqlite::Result<Vec<StoredDocument>> {
    let mut stmt = conn.prepare(
        "SELECT id, author, body FROM documents WHERE collection = ?1 ORDER BY seq",
    )?;
    let mapped = stmt
        .query_map(params![collection], map_document_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(mapped)
}

fn db_list_by_author(
    conn: &Connection,
    collection: &str,
    author: &str,
) -> rusqlite::Result<Vec<StoredDocument>> {
    let mut stmt = conn.prepare(
        "SELECT id, author, body FROM documents WHERE collection = ?1 AND author = ?2 ORDER BY seq",
    )?;
    let mapped = stmt
        .query_map(params![collection, author], map_document_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(mapped)
}

fn db_delete(conn: &Connection, collection: &str, id: &str) -> rusqlite::Result<bool> {
    let removed = conn.execute(
        "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
        params![collection, id],
    )?;
    Ok(removed > 0)
}

fn db_count(conn: &Connection, collection: &str) -> rusqlite::Result<u64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM documents WHERE collection = ?1",
        params![collection],
        |row| row.get(0),
    )?;
    Ok(count as u64)
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

impl DocumentStore for SqliteStorage {
    fn insert(&self, collection: &str, doc: &StoredDocument) -> Result<()> {
        match self.with_conn(|conn| db_insert(conn, collection, doc)) {
            Ok(()) => Ok(()),
            Err(err) if is_unique_violation(&err) => Err(StorageError::Duplicate {
                collection: collection.to_string(),
                id: doc.id.clone(),
            }
            .into()),
            Err(err) => Err(err.into()),
        }
    }

    fn load(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>> {
        let row = self.with_conn(|conn| db_load(conn, collection, id))?;
        Ok(row)
    }

    fn list(&self, collection: &str) -> Result<Vec<StoredDocument>> {
        let rows = self.with_conn(|conn| db_list(conn, collection))?;
        Ok(rows)
    }

    fn list_by_author(&self, collection: &str, author: &str) -> Result<Vec<StoredDocument>> {
        let rows = self.with_conn(|conn| db_list_by_author(conn, collection, author))?;
        Ok(rows)
    }

    fn delete(&self, collection: &str, id: &str) -> Result<bool> {
        let removed = self.with_conn(|conn| db_delete(conn, collection, id))?;
        Ok(removed)
    }

    fn count(&self, collection: &str) -> Result<u64> {
        let count = self.with_conn(|conn| db_count(conn, collection))?;
        Ok(count)
    }
}

impl SqliteStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_string_lossy().to_string(),
        }
    }

    pub fn reset_all(&self) -> Result<()> {
        if !Path::new(&self.path).exists() {
            return Ok(());
        }
        std::fs::remove_file(&self.path)?;
        Ok(())
    }

    pub fn init(&self) -> Result<()> {
        self.with_conn(|_conn| Ok(()))?;
        Ok(())
    }

    fn with_conn<F, T>(&self, f: F) -> rusqlite::Result<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        let conn = Connection::open(&self.path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.busy_timeout(std::time::Duration::from_millis(500))?;

        Self::migrate(&conn)?;
        f(&conn)
    }

    fn migrate(conn: &Connection) -> rusqlite::Result<()> {
        let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

        if version == DB_SCHEMA_VERSION {
            return Ok(());
        }

        log::info!(
            "SQLite schema migration: {} -> {}",
            version,
            DB_SCHEMA_VERSION
        );

        if version == 0 {
            conn.execute_batch(
                r#"
            CREATE TABLE documents (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                author TEXT NOT NULL,
                body TEXT NOT NULL,
                UNIQUE (collection, id)
            );
            CREATE INDEX documents_author_idx
                ON documents(collection, author);
        "#,
            )?;
            conn.pragma_update(None, "user_version", DB_SCHEMA_VERSION)?;
            return Ok(());
        }

        Err(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::ErrorCode::SchemaChanged as i32),
            Some("database schema version mismatch; please run with --reset option".to_string()),
        ))
    }
}
