//! Client commands: print the board, move a task.

use anyhow::{Result, bail};
use std::fmt::Write;
use std::sync::Arc;

use crate::client::{BoardModel, DragController, HttpBoardClient, MoveOutcome};

/// Plain-text rendering of the visible columns.
pub fn render(model: &BoardModel) -> String {
    let mut out = String::new();
    for column in model.visible_columns() {
        let _ = writeln!(
            out,
            "== {} ({}) [{}] ==",
            column.name,
            model.task_count(column.position),
            model.header_color(column)
        );
        for task in model.tasks_in(column.position) {
            let _ = write!(out, "  #{} {}", task.id, task.title);
            if model.shows_due_date(task) {
                if let Some(due) = task.due_date {
                    let _ = write!(out, "  (due {})", due.format("%b %-d, %Y"));
                }
            }
            out.push('\n');
        }
    }
    out
}

async fn load(url: &str, show_archived: bool) -> Result<BoardModel> {
    let client = HttpBoardClient::new(url)?;
    let mut model = BoardModel::new(Arc::new(client));
    model.set_show_archived(show_archived);
    model.refresh().await?;
    Ok(model)
}

/// `taskboard board`
pub async fn run_board(url: &str, all: bool) -> Result<()> {
    let model = load(url, all).await?;
    print!("{}", render(&model));
    Ok(())
}

/// `taskboard move`: a drag of `task` released over `column_position`.
pub async fn run_move(url: &str, task: i64, column_position: i64) -> Result<()> {
    let mut model = load(url, true).await?;
    if model.task(task).is_none() {
        bail!("task {} not found", task);
    }

    let mut drag = DragController::new();
    drag.begin(task);
    drag.hover(Some(column_position));
    let Some(intent) = drag.release() else {
        return Ok(());
    };

    match model.move_task(intent).await {
        MoveOutcome::NoOp => println!("Task #{} is already in that column", task),
        MoveOutcome::Persisted => {
            let name = model
                .column_at(column_position)
                .map(|c| c.name.as_str())
                .unwrap_or("?");
            println!("Moved task #{} to {}", task, name);
        }
        MoveOutcome::Rejected(err) => bail!("move rejected: {}", err),
    }
    Ok(())
}
