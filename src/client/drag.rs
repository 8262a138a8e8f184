//! Pointer gestures to move intents.

/// Request to move a task, produced once per completed drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveIntent {
    pub task_id: i64,
    /// Column position under the pointer at release; `None` outside any column.
    pub target: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DragState {
    #[default]
    Idle,
    Dragging { task_id: i64, over: Option<i64> },
}

/// Tracks a single drag gesture at a time.
#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start dragging a task. A gesture already in progress is abandoned.
    pub fn begin(&mut self, task_id: i64) {
        self.state = DragState::Dragging {
            task_id,
            over: None,
        };
    }

    /// Pointer entered a column (`Some(position)`) or left all columns.
    pub fn hover(&mut self, column_position: Option<i64>) {
        if let DragState::Dragging { over, .. } = &mut self.state {
            *over = column_position;
        }
    }

    /// Finish the gesture, yielding its intent. Nothing without a prior `begin`.
    pub fn release(&mut self) -> Option<MoveIntent> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging { task_id, over } => Some(MoveIntent {
                task_id,
                target: over,
            }),
            DragState::Idle => None,
        }
    }

    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}
