//! Content repository — data sources ingested into the case.
//!
//! The integer primary key of a row is the numeric data-source
//! identifier accepted by the run-ingest command.

use rusqlite::{params, Row};

use super::{Database, DatabaseError};

/// A data source registered in the case content database.
#[derive(Debug, Clone)]
pub struct ContentRow {
    pub id: i64,
    pub name: String,
    pub path: String,
    pub device_id: String,
    pub added_at: String,
}

impl ContentRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            path: row.get("path")?,
            device_id: row.get("device_id")?,
            added_at: row.get("added_at")?,
        })
    }
}

/// Inserts a content row and returns its generated identifier.
pub fn insert(
    db: &Database,
    name: &str,
    path: &str,
    device_id: &str,
) -> Result<i64, DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO content (name, path, device_id) VALUES (?1, ?2, ?3)",
            params![name, path, device_id],
        )?;
        Ok(conn.last_insert_rowid())
    })
}

/// Finds a content row by its numeric identifier.
pub fn find_by_id(db: &Database, id: i64) -> Result<Option<ContentRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM content WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id], ContentRow::from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}

/// Lists every content row in insertion order.
pub fn list_all(db: &Database) -> Result<Vec<ContentRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM content ORDER BY id")?;
        let rows = stmt
            .query_map([], ContentRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_returns_sequential_ids() {
        let db = Database::open_in_memory().unwrap();

        let first = insert(&db, "a.img", "/tmp/a.img", "dev-a").unwrap();
        let second = insert(&db, "b.img", "/tmp/b.img", "dev-b").unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);
    }

    #[test]
    fn test_find_by_id() {
        let db = Database::open_in_memory().unwrap();
        let id = insert(&db, "disk.img", "/evidence/disk.img", "dev-1").unwrap();

        let row = find_by_id(&db, id).unwrap().unwrap();
        assert_eq!(row.name, "disk.img");
        assert_eq!(row.path, "/evidence/disk.img");
        assert_eq!(row.device_id, "dev-1");
        assert!(!row.added_at.is_empty());
    }

    #[test]
    fn test_find_by_id_missing_returns_none() {
        let db = Database::open_in_memory().unwrap();
        assert!(find_by_id(&db, 42).unwrap().is_none());
    }

    #[test]
    fn test_list_all_ordered_by_id() {
        let db = Database::open_in_memory().unwrap();
        insert(&db, "b.img", "/tmp/b.img", "").unwrap();
        insert(&db, "a.img", "/tmp/a.img", "").unwrap();

        let rows = list_all(&db).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "b.img");
        assert_eq!(rows[1].name, "a.img");
    }

    #[test]
    fn test_list_all_empty() {
        let db = Database::open_in_memory().unwrap();
        assert!(list_all(&db).unwrap().is_empty());
    }
}
