//! Column rows.

use super::Database;
use super::record::{Record, query_record, query_records};
use crate::types::ColumnKind;
use anyhow::Result;
use rusqlite::{OptionalExtension, params};

/// Writable columns of a `task_column` row.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRow {
    pub name: String,
    pub description: Option<String>,
    pub position: i64,
    pub kind: ColumnKind,
}

impl Database {
    pub fn insert_column(&self, row: &ColumnRow) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO task_column (name, description, position, kind)
                 VALUES (?1, ?2, ?3, ?4)",
                params![row.name, row.description, row.position, row.kind.as_str()],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn column_record(&self, id: i64) -> Result<Option<Record>> {
        self.with_conn(|conn| query_record(conn, "SELECT * FROM task_column WHERE id = ?1", [id]))
    }

    /// Columns in workflow order.
    pub fn column_records(&self) -> Result<Vec<Record>> {
        self.with_conn(|conn| {
            query_records(
                conn,
                "SELECT * FROM task_column ORDER BY position ASC, id ASC",
                [],
            )
        })
    }

    /// First column (by position) holding the given value.
    pub fn column_by_position(&self, position: i64) -> Result<Option<Record>> {
        self.with_conn(|conn| {
            query_record(
                conn,
                "SELECT * FROM task_column WHERE position = ?1 ORDER BY id ASC LIMIT 1",
                [position],
            )
        })
    }

    /// Lowest-positioned column of a kind.
    pub fn first_column_of_kind(&self, kind: ColumnKind) -> Result<Option<Record>> {
        self.with_conn(|conn| {
            query_record(
                conn,
                "SELECT * FROM task_column WHERE kind = ?1 ORDER BY position ASC, id ASC LIMIT 1",
                [kind.as_str()],
            )
        })
    }

    /// Highest position in use, `None` on an empty board.
    pub fn max_column_position(&self) -> Result<Option<i64>> {
        self.with_conn(|conn| {
            let max = conn
                .query_row("SELECT MAX(position) FROM task_column", [], |row| {
                    row.get::<_, Option<i64>>(0)
                })
                .optional()?
                .flatten();
            Ok(max)
        })
    }

    pub fn update_column_row(&self, id: i64, row: &ColumnRow) -> Result<usize> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE task_column
                 SET name = ?1, description = ?2, position = ?3, kind = ?4
                 WHERE id = ?5",
                params![
                    row.name,
                    row.description,
                    row.position,
                    row.kind.as_str(),
                    id
                ],
            )?;
            Ok(changed)
        })
    }

    pub fn delete_column_row(&self, id: i64) -> Result<usize> {
        self.with_conn(|conn| Ok(conn.execute("DELETE FROM task_column WHERE id = ?1", [id])?))
    }
}
