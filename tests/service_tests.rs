//! Integration tests for the board service.
//!
//! These tests run every operation against an in-memory SQLite database.
//! Tests are organized by module and functionality.

use chrono::NaiveDate;
use std::sync::Arc;
use taskboard::db::Database;
use taskboard::error::{ErrorCode, ServiceError};
use taskboard::service::BoardService;
use taskboard::types::{ColumnKind, ColumnPatch, NewColumn, NewTask, TaskFilter, TaskPatch};

/// Helper to create a service over a fresh in-memory database.
fn setup_service() -> BoardService {
    let db = Database::open_in_memory().expect("Failed to create in-memory database");
    BoardService::new(Arc::new(db))
}

/// Service with the default columns already in place.
fn seeded_service() -> BoardService {
    let service = setup_service();
    service.seed_default_columns().expect("Failed to seed columns");
    service
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

mod task_tests {
    use super::*;

    #[test]
    fn create_task_applies_defaults() {
        let service = seeded_service();

        let task = service
            .create_task(NewTask::new("Write release notes", 2))
            .expect("Failed to create task");

        assert!(task.id > 0);
        assert_eq!(task.title, "Write release notes");
        assert_eq!(task.column_position, 2);
        assert_eq!(task.task_position, 1);
        assert_eq!(task.description, None);
        assert_eq!(task.due_date, None);
    }

    #[test]
    fn due_date_round_trips_as_date_only() {
        let service = seeded_service();

        let created = service
            .create_task(NewTask::new("Ship", 1).with_due_date(date(2025, 8, 10)))
            .unwrap();
        let fetched = service.get_task(created.id).unwrap();

        assert_eq!(fetched.due_date, Some(date(2025, 8, 10)));
        let body = serde_json::to_value(&fetched).unwrap();
        assert_eq!(body["dueDate"], "2025-08-10");
    }

    #[test]
    fn due_date_is_stored_as_midnight() {
        let service = seeded_service();
        let task = service
            .create_task(NewTask::new("Ship", 1).with_due_date(date(2025, 8, 10)))
            .unwrap();

        let stored: String = service
            .db()
            .with_conn(|conn| {
                Ok(conn.query_row(
                    "SELECT due_date FROM task WHERE id = ?1",
                    [task.id],
                    |row| row.get(0),
                )?)
            })
            .unwrap();

        assert_eq!(stored, "2025-08-10 00:00:00");
    }

    #[test]
    fn create_task_requires_title() {
        let service = seeded_service();

        let err = service
            .create_task(NewTask {
                column_position: Some(1),
                ..Default::default()
            })
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::ValidationError);
        assert!(matches!(
            err,
            ServiceError::Validation { field: Some(ref f), .. } if f == "title"
        ));
    }

    #[test]
    fn create_task_rejects_blank_title() {
        let service = seeded_service();
        let err = service.create_task(NewTask::new("   ", 1)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
    }

    #[test]
    fn create_task_requires_column_position() {
        let service = seeded_service();

        let err = service
            .create_task(NewTask {
                title: Some("Orphan".to_string()),
                ..Default::default()
            })
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Validation { field: Some(ref f), .. } if f == "columnPosition"
        ));
    }

    #[test]
    fn get_missing_task_is_not_found() {
        let service = seeded_service();
        let err = service.get_task(999).unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.public_message(), "Task not found");
    }

    #[test]
    fn updating_description_leaves_other_fields() {
        let service = seeded_service();
        let task = service
            .create_task(NewTask::new("Plan sprint", 2).with_due_date(date(2025, 9, 1)))
            .unwrap();

        let updated = service
            .update_task(
                task.id,
                TaskPatch::default().description(Some("Bring coffee".to_string())),
            )
            .unwrap();

        assert_eq!(updated.description.as_deref(), Some("Bring coffee"));
        assert_eq!(updated.title, "Plan sprint");
        assert_eq!(updated.column_position, 2);
        assert_eq!(updated.due_date, Some(date(2025, 9, 1)));
        assert_eq!(updated.created, task.created);
    }

    #[test]
    fn explicit_null_clears_optional_fields() {
        let service = seeded_service();
        let task = service
            .create_task(
                NewTask::new("Plan sprint", 2)
                    .with_description("draft")
                    .with_due_date(date(2025, 9, 1)),
            )
            .unwrap();

        let updated = service
            .update_task(task.id, TaskPatch::default().description(None).due_date(None))
            .unwrap();

        assert_eq!(updated.description, None);
        assert_eq!(updated.due_date, None);
    }

    #[test]
    fn null_title_or_membership_is_rejected() {
        let service = seeded_service();
        let task = service.create_task(NewTask::new("Keep me", 1)).unwrap();

        let null_title = TaskPatch {
            title: Some(None),
            ..Default::default()
        };
        assert_eq!(
            service.update_task(task.id, null_title).unwrap_err().code(),
            ErrorCode::ValidationError
        );

        let null_column = TaskPatch {
            column_position: Some(None),
            ..Default::default()
        };
        assert_eq!(
            service.update_task(task.id, null_column).unwrap_err().code(),
            ErrorCode::ValidationError
        );

        assert_eq!(service.get_task(task.id).unwrap().title, "Keep me");
    }

    #[test]
    fn move_changes_only_membership() {
        let service = seeded_service();
        let task = service
            .create_task(NewTask::new("Review PR", 2).with_task_position(3))
            .unwrap();

        let moved = service.update_task(task.id, TaskPatch::move_to(3)).unwrap();

        assert_eq!(moved.column_position, 3);
        assert_eq!(moved.task_position, 3);
        assert_eq!(moved.title, "Review PR");
    }

    #[test]
    fn update_missing_task_is_not_found() {
        let service = seeded_service();
        let err = service.update_task(42, TaskPatch::move_to(1)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[test]
    fn delete_task_then_not_found() {
        let service = seeded_service();
        let task = service.create_task(NewTask::new("Temp", 1)).unwrap();

        let deleted = service.delete_task(task.id).unwrap();
        assert_eq!(deleted.message, "Task deleted successfully");

        assert_eq!(service.get_task(task.id).unwrap_err().code(), ErrorCode::NotFound);
        assert_eq!(service.delete_task(task.id).unwrap_err().code(), ErrorCode::NotFound);
    }

    #[test]
    fn list_tasks_orders_and_filters() {
        let service = seeded_service();
        let a = service.create_task(NewTask::new("a", 2).with_task_position(2)).unwrap();
        let b = service.create_task(NewTask::new("b", 2).with_task_position(1)).unwrap();
        let c = service.create_task(NewTask::new("c", 2).with_task_position(1)).unwrap();
        let d = service.create_task(NewTask::new("d", 1)).unwrap();

        let all: Vec<i64> = service
            .list_tasks(&TaskFilter::default())
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(all, vec![d.id, c.id, b.id, a.id]);

        let column: Vec<i64> = service
            .list_tasks(&TaskFilter {
                column_position: Some(2),
            })
            .unwrap()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(column, vec![c.id, b.id, a.id]);
    }
}

mod archive_tests {
    use super::*;

    #[test]
    fn archive_moves_done_task_to_archive_column() {
        let service = seeded_service();
        let task = service.create_task(NewTask::new("Finished", 4)).unwrap();

        let archived = service.archive_task(task.id).unwrap();

        assert_eq!(archived.column_position, 5);
    }

    #[test]
    fn archive_refuses_unfinished_task() {
        let service = seeded_service();
        let task = service.create_task(NewTask::new("Ongoing", 3)).unwrap();

        let err = service.archive_task(task.id).unwrap_err();

        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(service.get_task(task.id).unwrap().column_position, 3);
    }

    #[test]
    fn archive_without_archive_column_conflicts() {
        let service = setup_service();
        service
            .create_column(NewColumn::new("Done").at(1).kind(ColumnKind::Done))
            .unwrap();
        let task = service.create_task(NewTask::new("Finished", 1)).unwrap();

        let err = service.archive_task(task.id).unwrap_err();

        assert_eq!(err.code(), ErrorCode::Conflict);
    }
}

mod column_tests {
    use super::*;

    #[test]
    fn seed_creates_default_workflow_once() {
        let service = setup_service();

        let seeded = service.seed_default_columns().unwrap();
        let names: Vec<&str> = seeded.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Backlog", "To Do", "In Progress", "Done", "Archive"]);
        assert_eq!(seeded[3].kind, ColumnKind::Done);
        assert_eq!(seeded[4].kind, ColumnKind::Archived);

        assert!(service.seed_default_columns().unwrap().is_empty());
        assert_eq!(service.list_columns().unwrap().len(), 5);
    }

    #[test]
    fn create_column_appends_after_last_position() {
        let service = setup_service();

        let first = service.create_column(NewColumn::new("Inbox")).unwrap();
        assert_eq!(first.position, 1);
        assert_eq!(first.kind, ColumnKind::Normal);

        service.create_column(NewColumn::new("Later").at(7)).unwrap();
        let next = service.create_column(NewColumn::new("Next")).unwrap();
        assert_eq!(next.position, 8);
    }

    #[test]
    fn create_column_after_largest_position_is_rejected() {
        let service = setup_service();
        service
            .create_column(NewColumn::new("Far").at(i64::MAX))
            .unwrap();

        let err = service.create_column(NewColumn::new("Next")).unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Validation { field: Some(ref f), .. } if f == "position"
        ));
        assert_eq!(service.list_columns().unwrap().len(), 1);
    }

    #[test]
    fn create_column_requires_name() {
        let service = setup_service();
        let err = service.create_column(NewColumn::default()).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation { field: Some(ref f), .. } if f == "name"
        ));
    }

    #[test]
    fn list_columns_by_position() {
        let service = setup_service();
        service.create_column(NewColumn::new("Third").at(3)).unwrap();
        service.create_column(NewColumn::new("First").at(1)).unwrap();
        service.create_column(NewColumn::new("Second").at(2)).unwrap();

        let names: Vec<String> = service
            .list_columns()
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();

        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn update_column_is_partial() {
        let service = setup_service();
        let column = service
            .create_column(NewColumn::new("Review").at(3).with_description("needs eyes"))
            .unwrap();

        let renamed = service
            .update_column(
                column.id,
                ColumnPatch {
                    name: Some(Some("Code review".to_string())),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(renamed.name, "Code review");
        assert_eq!(renamed.description.as_deref(), Some("needs eyes"));
        assert_eq!(renamed.position, 3);
    }

    #[test]
    fn column_move_does_not_cascade_to_tasks() {
        let service = seeded_service();
        let task = service.create_task(NewTask::new("Stays put", 2)).unwrap();
        let todo = service.list_columns().unwrap()[1].clone();

        service
            .update_column(
                todo.id,
                ColumnPatch {
                    position: Some(Some(9)),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(service.get_task(task.id).unwrap().column_position, 2);
    }

    #[test]
    fn update_column_rejects_null_name() {
        let service = setup_service();
        let column = service.create_column(NewColumn::new("Inbox")).unwrap();

        let err = service
            .update_column(
                column.id,
                ColumnPatch {
                    name: Some(None),
                    ..Default::default()
                },
            )
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::ValidationError);
    }

    #[test]
    fn delete_empty_column_succeeds() {
        let service = setup_service();
        let column = service.create_column(NewColumn::new("Empty")).unwrap();

        let deleted = service.delete_column(column.id).unwrap();

        assert_eq!(deleted.message, "Task column deleted successfully");
        assert_eq!(service.get_column(column.id).unwrap_err().code(), ErrorCode::NotFound);
    }

    #[test]
    fn delete_referenced_column_conflicts_and_keeps_rows() {
        let service = setup_service();
        let column = service.create_column(NewColumn::new("Busy").at(1)).unwrap();
        let task = service.create_task(NewTask::new("Blocking", 1)).unwrap();

        let err = service.delete_column(column.id).unwrap_err();

        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.public_message(), "Cannot delete column with existing tasks");
        assert!(service.get_column(column.id).is_ok());
        assert!(service.get_task(task.id).is_ok());
    }

    #[test]
    fn delete_missing_column_is_not_found() {
        let service = setup_service();
        assert_eq!(service.delete_column(5).unwrap_err().code(), ErrorCode::NotFound);
    }

    #[test]
    fn column_tasks_are_scoped_and_ordered() {
        let service = seeded_service();
        let todo = service.list_columns().unwrap()[1].clone();
        let later = service.create_task(NewTask::new("later", 2).with_task_position(2)).unwrap();
        let older = service.create_task(NewTask::new("older", 2)).unwrap();
        let newer = service.create_task(NewTask::new("newer", 2)).unwrap();
        service.create_task(NewTask::new("elsewhere", 3)).unwrap();

        let tasks = service.list_column_tasks(todo.id).unwrap();

        let ids: Vec<i64> = tasks.iter().map(|t| t.task.id).collect();
        assert_eq!(ids, vec![newer.id, older.id, later.id]);
        assert!(tasks.iter().all(|t| t.column_name == "To Do"));
    }

    #[test]
    fn column_tasks_of_missing_column_is_not_found() {
        let service = seeded_service();
        assert_eq!(
            service.list_column_tasks(404).unwrap_err().code(),
            ErrorCode::NotFound
        );
    }

    #[test]
    fn tasks_with_columns_join_by_position() {
        let service = seeded_service();
        service.create_task(NewTask::new("in progress", 3)).unwrap();
        service.create_task(NewTask::new("backlog", 1)).unwrap();
        service.create_task(NewTask::new("no column", 42)).unwrap();

        let joined = service.list_tasks_with_columns().unwrap();

        let pairs: Vec<(&str, &str)> = joined
            .iter()
            .map(|t| (t.task.title.as_str(), t.column_name.as_str()))
            .collect();
        assert_eq!(pairs, vec![("backlog", "Backlog"), ("in progress", "In Progress")]);
    }
}

mod storage_tests {
    use super::*;

    #[test]
    fn file_backed_board_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.db");

        let id = {
            let service = BoardService::new(Arc::new(Database::open(&path).unwrap()));
            service.seed_default_columns().unwrap();
            service.create_task(NewTask::new("Persist me", 1)).unwrap().id
        };

        let service = BoardService::new(Arc::new(Database::open(&path).unwrap()));
        assert_eq!(service.get_task(id).unwrap().title, "Persist me");
        assert_eq!(service.list_columns().unwrap().len(), 5);
    }

    #[test]
    fn storage_failure_surfaces_generic_message() {
        let service = seeded_service();
        service
            .db()
            .with_conn(|conn| {
                conn.execute_batch("DROP TABLE task")?;
                Ok(())
            })
            .unwrap();

        let err = service.list_tasks(&TaskFilter::default()).unwrap_err();

        assert_eq!(err.code(), ErrorCode::StorageError);
        assert_eq!(err.public_message(), "Database error");
    }
}
