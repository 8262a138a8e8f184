//! Task rows.

use super::Database;
use super::record::{Record, query_record, query_records};
use anyhow::Result;
use rusqlite::params;

/// Writable columns of a task row, already in store representation.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRow {
    pub title: String,
    pub description: Option<String>,
    pub column_position: i64,
    pub task_position: i64,
    /// Midnight datetime (`YYYY-MM-DD 00:00:00`).
    pub due_date: Option<String>,
}

const TASK_ORDER: &str = "t.task_position ASC, t.created DESC, t.id DESC";

impl Database {
    /// Insert a task and return its id.
    pub fn insert_task(&self, row: &TaskRow, created: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO task (title, description, column_position, task_position, due_date, created)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    row.title,
                    row.description,
                    row.column_position,
                    row.task_position,
                    row.due_date,
                    created,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn task_record(&self, id: i64) -> Result<Option<Record>> {
        self.with_conn(|conn| query_record(conn, "SELECT * FROM task t WHERE t.id = ?1", [id]))
    }

    /// Tasks ordered by column, then position within the column, newest first
    /// among equal positions.
    pub fn task_records(&self, column_position: Option<i64>) -> Result<Vec<Record>> {
        let sql = format!(
            "SELECT * FROM task t
             WHERE (?1 IS NULL OR t.column_position = ?1)
             ORDER BY t.column_position ASC, {}",
            TASK_ORDER
        );
        self.with_conn(|conn| query_records(conn, &sql, params![column_position]))
    }

    /// Tasks joined with their column's name and description.
    ///
    /// Membership is by column position, so a position shared by two columns
    /// yields the task once per column.
    pub fn task_with_column_records(&self, column_position: Option<i64>) -> Result<Vec<Record>> {
        let sql = format!(
            "SELECT t.id, t.title, t.description, t.column_position, t.task_position,
                    t.due_date, t.created,
                    c.name AS column_name, c.description AS column_description
             FROM task t
             JOIN task_column c ON c.position = t.column_position
             WHERE (?1 IS NULL OR t.column_position = ?1)
             ORDER BY c.position ASC, {}",
            TASK_ORDER
        );
        self.with_conn(|conn| query_records(conn, &sql, params![column_position]))
    }

    /// Overwrite every writable column. Returns the number of rows touched.
    pub fn update_task_row(&self, id: i64, row: &TaskRow) -> Result<usize> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE task
                 SET title = ?1, description = ?2, column_position = ?3,
                     task_position = ?4, due_date = ?5
                 WHERE id = ?6",
                params![
                    row.title,
                    row.description,
                    row.column_position,
                    row.task_position,
                    row.due_date,
                    id,
                ],
            )?;
            Ok(changed)
        })
    }

    pub fn delete_task_row(&self, id: i64) -> Result<usize> {
        self.with_conn(|conn| Ok(conn.execute("DELETE FROM task WHERE id = ?1", [id])?))
    }

    pub fn count_tasks_in_column(&self, column_position: i64) -> Result<i64> {
        self.with_conn(|conn| {
            let count = conn.query_row(
                "SELECT COUNT(*) FROM task WHERE column_position = ?1",
                [column_position],
                |row| row.get(0),
            )?;
            Ok(count)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(title: &str, column_position: i64, task_position: i64) -> TaskRow {
        TaskRow {
            title: title.to_string(),
            description: None,
            column_position,
            task_position,
            due_date: None,
        }
    }

    #[test]
    fn records_are_snake_case() {
        let db = Database::open_in_memory().unwrap();
        let id = db
            .insert_task(&row("Draft agenda", 1, 1), "2025-08-01T10:00:00.000Z")
            .unwrap();

        let record = db.task_record(id).unwrap().unwrap();

        assert!(record.contains_key("column_position"));
        assert!(record.contains_key("task_position"));
        assert_eq!(record["title"], "Draft agenda");
    }

    #[test]
    fn filter_by_column_orders_by_position_then_newest() {
        let db = Database::open_in_memory().unwrap();
        db.insert_task(&row("old", 2, 1), "2025-08-01T10:00:00.000Z").unwrap();
        db.insert_task(&row("new", 2, 1), "2025-08-02T10:00:00.000Z").unwrap();
        db.insert_task(&row("first", 2, 0), "2025-08-03T10:00:00.000Z").unwrap();
        db.insert_task(&row("elsewhere", 1, 1), "2025-08-03T10:00:00.000Z").unwrap();

        let titles: Vec<String> = db
            .task_records(Some(2))
            .unwrap()
            .into_iter()
            .map(|r| r["title"].as_str().unwrap().to_string())
            .collect();

        assert_eq!(titles, vec!["first", "new", "old"]);
    }

    #[test]
    fn update_and_delete_report_rows_touched() {
        let db = Database::open_in_memory().unwrap();
        let id = db.insert_task(&row("a", 1, 1), "2025-08-01T10:00:00.000Z").unwrap();

        assert_eq!(db.update_task_row(id, &row("b", 2, 1)).unwrap(), 1);
        assert_eq!(db.update_task_row(id + 100, &row("b", 2, 1)).unwrap(), 0);
        assert_eq!(db.count_tasks_in_column(2).unwrap(), 1);
        assert_eq!(db.delete_task_row(id).unwrap(), 1);
        assert_eq!(db.delete_task_row(id).unwrap(), 0);
    }
}
