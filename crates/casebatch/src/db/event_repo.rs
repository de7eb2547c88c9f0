//! Case event repository — task notifications recorded against the case.

use rusqlite::{params, Row};

use super::{Database, DatabaseError};

/// A recorded case event.
#[derive(Debug, Clone)]
pub struct CaseEventRow {
    pub id: i64,
    pub kind: String,
    pub task_id: String,
    pub created_at: String,
}

impl CaseEventRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            kind: row.get("kind")?,
            task_id: row.get("task_id")?,
            created_at: row.get("created_at")?,
        })
    }
}

/// Records a case event.
pub fn insert(db: &Database, kind: &str, task_id: &str) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO case_events (kind, task_id) VALUES (?1, ?2)",
            params![kind, task_id],
        )?;
        Ok(())
    })
}

/// Lists events for a given task in insertion order.
pub fn list_by_task(db: &Database, task_id: &str) -> Result<Vec<CaseEventRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM case_events WHERE task_id = ?1 ORDER BY id")?;
        let rows = stmt
            .query_map(params![task_id], CaseEventRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Counts events of a given kind.
pub fn count_by_kind(db: &Database, kind: &str) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let count: u64 = conn.query_row(
            "SELECT COUNT(*) FROM case_events WHERE kind = ?1",
            params![kind],
            |r| r.get(0),
        )?;
        Ok(count)
    })
}
