//! Board view-model.
//!
//! Holds the last fetched columns and tasks and derives everything the board
//! displays from them. Every write ends with a full refetch, so the server is
//! the only source of truth and a rejected move snaps back on its own.

use std::sync::Arc;
use tracing::{debug, warn};

use super::api::{BoardApi, ClientError, ClientResult};
use super::drag::MoveIntent;
use crate::types::{Column, ColumnKind, Deleted, NewTask, Task, TaskPatch};

/// Column header colors, assigned by position.
pub const HEADER_PALETTE: [&str; 6] = [
    "#F3C5C5", "#FADFC1", "#D5D2FD", "#BFF0DB", "#B1CBE8", "#F2F2D0",
];

/// Result of a move or archive request.
#[derive(Debug)]
pub enum MoveOutcome {
    /// Nothing to do; no request was sent.
    NoOp,
    /// The server accepted the change.
    Persisted,
    /// The server refused or could not be reached. State was reconciled.
    Rejected(ClientError),
}

impl MoveOutcome {
    pub fn is_noop(&self) -> bool {
        matches!(self, MoveOutcome::NoOp)
    }

    pub fn is_persisted(&self) -> bool {
        matches!(self, MoveOutcome::Persisted)
    }
}

pub struct BoardModel {
    api: Arc<dyn BoardApi>,
    columns: Vec<Column>,
    tasks: Vec<Task>,
    load_error: Option<String>,
    show_archived: bool,
}

impl BoardModel {
    /// Empty model. Call [`BoardModel::refresh`] to load the board.
    pub fn new(api: Arc<dyn BoardApi>) -> Self {
        Self {
            api,
            columns: Vec::new(),
            tasks: Vec::new(),
            load_error: None,
            show_archived: false,
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// First column holding a position.
    pub fn column_at(&self, position: i64) -> Option<&Column> {
        self.columns.iter().find(|c| c.position == position)
    }

    /// Message of the last failed load, cleared by the next successful one.
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn show_archived(&self) -> bool {
        self.show_archived
    }

    pub fn set_show_archived(&mut self, show: bool) {
        self.show_archived = show;
    }

    /// Fetch columns and tasks together and replace all state.
    ///
    /// On failure the previous state is kept and `load_error` is set.
    pub async fn refresh(&mut self) -> ClientResult<()> {
        let (columns, tasks) = tokio::join!(self.api.list_columns(), self.api.list_tasks());

        match columns.and_then(|columns| tasks.map(|tasks| (columns, tasks))) {
            Ok((columns, tasks)) => {
                debug!(columns = columns.len(), tasks = tasks.len(), "board loaded");
                self.columns = columns;
                self.tasks = tasks;
                self.load_error = None;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "failed to load board");
                self.load_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Refetch after a write. A failure here is already recorded in `load_error`.
    async fn reconcile(&mut self) {
        let _ = self.refresh().await;
    }

    /// Apply a drag result: move locally, persist, then reconcile.
    pub async fn move_task(&mut self, intent: MoveIntent) -> MoveOutcome {
        let Some(target) = intent.target else {
            return MoveOutcome::NoOp;
        };
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == intent.task_id) else {
            return MoveOutcome::NoOp;
        };
        if task.column_position == target {
            return MoveOutcome::NoOp;
        }

        task.column_position = target;

        let result = self.api.move_task(intent.task_id, target).await;
        self.reconcile().await;

        match result {
            Ok(_) => MoveOutcome::Persisted,
            Err(err) => {
                warn!(task_id = intent.task_id, target, error = %err, "move rejected");
                MoveOutcome::Rejected(err)
            }
        }
    }

    pub async fn create_task(&mut self, input: NewTask) -> ClientResult<Task> {
        let task = self.api.create_task(&input).await?;
        self.reconcile().await;
        Ok(task)
    }

    pub async fn update_task(&mut self, id: i64, patch: TaskPatch) -> ClientResult<Task> {
        let task = self.api.update_task(id, &patch).await?;
        self.reconcile().await;
        Ok(task)
    }

    pub async fn delete_task(&mut self, id: i64) -> ClientResult<Deleted> {
        let deleted = self.api.delete_task(id).await?;
        self.reconcile().await;
        Ok(deleted)
    }

    /// Archive a task sitting in a done column. Anything else is a no-op.
    pub async fn archive_task(&mut self, id: i64) -> MoveOutcome {
        let in_done_column = self
            .task(id)
            .and_then(|task| self.column_at(task.column_position))
            .is_some_and(|column| column.kind == ColumnKind::Done);
        if !in_done_column {
            return MoveOutcome::NoOp;
        }

        let result = self.api.archive_task(id).await;
        match result {
            Ok(_) => {
                self.reconcile().await;
                MoveOutcome::Persisted
            }
            Err(err) => {
                warn!(task_id = id, error = %err, "archive rejected");
                MoveOutcome::Rejected(err)
            }
        }
    }

    /// Columns shown on the board. Archived columns only when toggled on.
    pub fn visible_columns(&self) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|c| self.show_archived || c.kind != ColumnKind::Archived)
            .collect()
    }

    /// Tasks of one column in display order.
    pub fn tasks_in(&self, column_position: i64) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| t.column_position == column_position)
            .collect();
        tasks.sort_by(|a, b| {
            a.task_position
                .cmp(&b.task_position)
                .then_with(|| b.created.cmp(&a.created))
        });
        tasks
    }

    pub fn task_count(&self, column_position: i64) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.column_position == column_position)
            .count()
    }

    /// Due dates are hidden once a task is archived.
    pub fn shows_due_date(&self, task: &Task) -> bool {
        task.due_date.is_some()
            && self
                .column_at(task.column_position)
                .is_none_or(|column| column.kind != ColumnKind::Archived)
    }

    pub fn header_color(&self, column: &Column) -> &'static str {
        header_color(column.position)
    }
}

/// Palette entry for a column position, wrapping in both directions.
pub fn header_color(position: i64) -> &'static str {
    let len = HEADER_PALETTE.len() as i64;
    HEADER_PALETTE[position.wrapping_sub(1).rem_euclid(len) as usize]
}
