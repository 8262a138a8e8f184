//! Client side of the board: API access, the view-model and drag handling.

pub mod api;
pub mod board;
pub mod drag;

pub use api::{BoardApi, ClientError, ClientResult, HttpBoardClient};
pub use board::{BoardModel, HEADER_PALETTE, MoveOutcome};
pub use drag::{DragController, MoveIntent};
