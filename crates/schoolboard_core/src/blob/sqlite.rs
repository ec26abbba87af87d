//! SQLite-backed blob store.
//!
//! # Invariants
//! - The connection must come from `db::open_db*` (schema in place);
//!   `try_new` rejects connections without the `blobs` table.
//! - `set_batch` is atomic: either every key is replaced or none is.

use super::{BlobError, BlobResult, BlobStore};
use rusqlite::{params, Connection, OptionalExtension};

const BLOB_TABLE: &str = "blobs";

const UPSERT_SQL: &str = "INSERT INTO blobs (key, value, updated_at)
     VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
     ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at;";

pub struct SqliteBlobStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBlobStore<'conn> {
    /// Wraps a connection opened through `db::open_db*`.
    ///
    /// # Errors
    /// - `BlobError::MissingRequiredTable` when the schema is not in place.
    pub fn try_new(conn: &'conn Connection) -> BlobResult<Self> {
        if !table_exists(conn, BLOB_TABLE)? {
            return Err(BlobError::MissingRequiredTable(BLOB_TABLE));
        }
        Ok(Self { conn })
    }
}

impl BlobStore for SqliteBlobStore<'_> {
    fn get(&self, key: &str) -> BlobResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM blobs WHERE key = ?1;", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> BlobResult<()> {
        self.conn.execute(UPSERT_SQL, params![key, value])?;
        Ok(())
    }

    fn set_batch(&mut self, entries: &[(&str, String)]) -> BlobResult<()> {
        // Shared borrow of the connection; the store is the only writer.
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(UPSERT_SQL)?;
            for (key, value) in entries {
                stmt.execute(params![*key, value.as_str()])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

fn table_exists(conn: &Connection, table: &str) -> BlobResult<bool> {
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

#[cfg(test)]
mod tests {
    use super::SqliteBlobStore;
    use crate::blob::{BlobError, BlobStore};
    use crate::db::open_db_in_memory;
    use rusqlite::Connection;

    #[test]
    fn rejects_connection_without_blob_table() {
        let conn = Connection::open_in_memory().unwrap();
        let err = SqliteBlobStore::try_new(&conn).err().unwrap();
        assert!(matches!(err, BlobError::MissingRequiredTable("blobs")));
    }

    #[test]
    fn set_then_get_and_overwrite() {
        let conn = open_db_in_memory().unwrap();
        let mut store = SqliteBlobStore::try_new(&conn).unwrap();

        assert_eq!(store.get("students").unwrap(), None);
        store.set("students", "[]").unwrap();
        store.set("students", "[{}]").unwrap();
        assert_eq!(store.get("students").unwrap().as_deref(), Some("[{}]"));

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM blobs;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn batch_writes_all_keys() {
        let conn = open_db_in_memory().unwrap();
        let mut store = SqliteBlobStore::try_new(&conn).unwrap();
        store
            .set_batch(&[
                ("schools", "[]".to_string()),
                ("employees", "[]".to_string()),
                ("students", "[]".to_string()),
            ])
            .unwrap();

        for key in ["schools", "employees", "students"] {
            assert_eq!(store.get(key).unwrap().as_deref(), Some("[]"));
        }
    }
}
