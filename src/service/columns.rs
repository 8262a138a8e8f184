//! Column operations.

use super::{BoardService, decode, decode_all, required_text, storage};
use crate::db::ColumnRow;
use crate::error::{ServiceError, ServiceResult};
use crate::types::{Column, ColumnKind, ColumnPatch, Deleted, NewColumn, TaskFilter, TaskWithColumn};
use tracing::{debug, info};

/// Columns inserted into an empty board.
pub const DEFAULT_COLUMNS: [(&str, i64, ColumnKind); 5] = [
    ("Backlog", 1, ColumnKind::Normal),
    ("To Do", 2, ColumnKind::Normal),
    ("In Progress", 3, ColumnKind::Normal),
    ("Done", 4, ColumnKind::Done),
    ("Archive", 5, ColumnKind::Archived),
];

impl BoardService {
    /// Columns in workflow order.
    pub fn list_columns(&self) -> ServiceResult<Vec<Column>> {
        decode_all(self.db.column_records().map_err(storage)?)
    }

    pub fn get_column(&self, id: i64) -> ServiceResult<Column> {
        match self.db.column_record(id).map_err(storage)? {
            Some(record) => decode(record),
            None => Err(ServiceError::column_not_found(id)),
        }
    }

    /// Create a column. Without a position it goes after the last one.
    pub fn create_column(&self, input: NewColumn) -> ServiceResult<Column> {
        let name = required_text("name", input.name)?;
        let position = match input.position {
            Some(position) => position,
            None => self
                .db
                .max_column_position()
                .map_err(storage)?
                .unwrap_or(0)
                .checked_add(1)
                .ok_or_else(|| {
                    ServiceError::invalid_value("position", "no position after the last column")
                })?,
        };

        let row = ColumnRow {
            name,
            description: input.description,
            position,
            kind: input.kind.unwrap_or_default(),
        };

        let id = self.db.insert_column(&row).map_err(storage)?;
        info!(column_id = id, position, kind = %row.kind, "created column");

        self.get_column(id)
    }

    /// Partial update. Tasks keep their stored position when the column moves.
    pub fn update_column(&self, id: i64, patch: ColumnPatch) -> ServiceResult<Column> {
        let current = self.get_column(id)?;

        let name = match patch.name {
            None => current.name,
            Some(value) => required_text("name", value)?,
        };
        let position = match patch.position {
            None => current.position,
            Some(Some(position)) => position,
            Some(None) => {
                return Err(ServiceError::invalid_value(
                    "position",
                    "position cannot be null",
                ));
            }
        };
        let kind = match patch.kind {
            None => current.kind,
            Some(Some(kind)) => kind,
            Some(None) => {
                return Err(ServiceError::invalid_value("kind", "kind cannot be null"));
            }
        };

        let row = ColumnRow {
            name,
            description: patch.description.unwrap_or(current.description),
            position,
            kind,
        };

        if self.db.update_column_row(id, &row).map_err(storage)? == 0 {
            return Err(ServiceError::column_not_found(id));
        }
        debug!(column_id = id, position, "updated column");

        self.get_column(id)
    }

    /// Delete a column that no task references.
    pub fn delete_column(&self, id: i64) -> ServiceResult<Deleted> {
        let column = self.get_column(id)?;

        let referencing = self
            .db
            .count_tasks_in_column(column.position)
            .map_err(storage)?;
        if referencing > 0 {
            return Err(ServiceError::conflict(
                "Cannot delete column with existing tasks",
            ));
        }

        if self.db.delete_column_row(id).map_err(storage)? == 0 {
            return Err(ServiceError::column_not_found(id));
        }
        info!(column_id = id, "deleted column");
        Ok(Deleted::new("Task column deleted successfully"))
    }

    /// Tasks of one column, each carrying the column's name and description.
    pub fn list_column_tasks(&self, id: i64) -> ServiceResult<Vec<TaskWithColumn>> {
        let column = self.get_column(id)?;
        let tasks = self.list_tasks(&TaskFilter {
            column_position: Some(column.position),
        })?;

        Ok(tasks
            .into_iter()
            .map(|task| TaskWithColumn {
                task,
                column_name: column.name.clone(),
                column_description: column.description.clone(),
            })
            .collect())
    }

    /// Insert the default workflow when the board has no columns.
    ///
    /// Returns the columns inserted, empty if the board was already set up.
    pub fn seed_default_columns(&self) -> ServiceResult<Vec<Column>> {
        if !self.db.column_records().map_err(storage)?.is_empty() {
            debug!("board already has columns, skipping seed");
            return Ok(Vec::new());
        }

        let mut seeded = Vec::with_capacity(DEFAULT_COLUMNS.len());
        for (name, position, kind) in DEFAULT_COLUMNS {
            seeded.push(self.create_column(NewColumn::new(name).at(position).kind(kind))?);
        }
        info!(count = seeded.len(), "seeded default columns");
        Ok(seeded)
    }
}
