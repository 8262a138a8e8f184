//! Task operations.

use super::{BoardService, decode, decode_all, required_text, storage};
use crate::db::TaskRow;
use crate::db::now_timestamp;
use crate::error::{ServiceError, ServiceResult};
use crate::normalize::date_to_store;
use crate::types::{Column, ColumnKind, Deleted, NewTask, Task, TaskFilter, TaskPatch, TaskWithColumn};
use tracing::{debug, info};

/// Intra-column position given to tasks created without one.
pub const DEFAULT_TASK_POSITION: i64 = 1;

impl BoardService {
    /// List tasks, optionally restricted to one column position.
    pub fn list_tasks(&self, filter: &TaskFilter) -> ServiceResult<Vec<Task>> {
        let records = self
            .db
            .task_records(filter.column_position)
            .map_err(storage)?;
        decode_all(records)
    }

    pub fn get_task(&self, id: i64) -> ServiceResult<Task> {
        match self.db.task_record(id).map_err(storage)? {
            Some(record) => decode(record),
            None => Err(ServiceError::task_not_found(id)),
        }
    }

    pub fn create_task(&self, input: NewTask) -> ServiceResult<Task> {
        let title = required_text("title", input.title)?;
        let column_position = input
            .column_position
            .ok_or_else(|| ServiceError::missing_field("columnPosition"))?;

        let row = TaskRow {
            title,
            description: input.description,
            column_position,
            task_position: input.task_position.unwrap_or(DEFAULT_TASK_POSITION),
            due_date: input.due_date.map(date_to_store),
        };

        let id = self
            .db
            .insert_task(&row, &now_timestamp())
            .map_err(storage)?;
        info!(task_id = id, column_position, "created task");

        self.get_task(id)
    }

    /// Apply a partial update. Keys absent from the patch keep their value.
    pub fn update_task(&self, id: i64, patch: TaskPatch) -> ServiceResult<Task> {
        let current = self.get_task(id)?;

        let title = match patch.title {
            None => current.title,
            Some(value) => required_text("title", value)?,
        };
        let column_position = match patch.column_position {
            None => current.column_position,
            Some(Some(position)) => position,
            Some(None) => {
                return Err(ServiceError::invalid_value(
                    "columnPosition",
                    "columnPosition cannot be null",
                ));
            }
        };
        let task_position = match patch.task_position {
            None => current.task_position,
            Some(Some(position)) => position,
            Some(None) => {
                return Err(ServiceError::invalid_value(
                    "taskPosition",
                    "taskPosition cannot be null",
                ));
            }
        };

        let row = TaskRow {
            title,
            description: patch.description.unwrap_or(current.description),
            column_position,
            task_position,
            due_date: patch.due_date.unwrap_or(current.due_date).map(date_to_store),
        };

        // Last writer wins: the row may have changed since it was read.
        if self.db.update_task_row(id, &row).map_err(storage)? == 0 {
            return Err(ServiceError::task_not_found(id));
        }
        debug!(task_id = id, column_position, "updated task");

        self.get_task(id)
    }

    pub fn delete_task(&self, id: i64) -> ServiceResult<Deleted> {
        if self.db.delete_task_row(id).map_err(storage)? == 0 {
            return Err(ServiceError::task_not_found(id));
        }
        info!(task_id = id, "deleted task");
        Ok(Deleted::new("Task deleted successfully"))
    }

    /// Move a finished task into the first archived column.
    pub fn archive_task(&self, id: i64) -> ServiceResult<Task> {
        let task = self.get_task(id)?;

        let current: Option<Column> = match self
            .db
            .column_by_position(task.column_position)
            .map_err(storage)?
        {
            Some(record) => Some(decode(record)?),
            None => None,
        };
        if current.map(|c| c.kind) != Some(ColumnKind::Done) {
            return Err(ServiceError::conflict(
                "Only tasks in a done column can be archived",
            ));
        }

        let archive: Column = match self
            .db
            .first_column_of_kind(ColumnKind::Archived)
            .map_err(storage)?
        {
            Some(record) => decode(record)?,
            None => return Err(ServiceError::conflict("No archive column exists")),
        };

        info!(task_id = id, archive = archive.position, "archiving task");
        self.update_task(id, TaskPatch::move_to(archive.position))
    }

    /// All tasks with the name and description of their column.
    pub fn list_tasks_with_columns(&self) -> ServiceResult<Vec<TaskWithColumn>> {
        let records = self
            .db
            .task_with_column_records(None)
            .map_err(storage)?;
        decode_all(records)
    }
}
