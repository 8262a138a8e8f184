//! REST API over the board service.
//!
//! All routes live under `/api`. Unknown routes answer 404 with
//! `{"error": "Route not found"}`.

mod error;
mod handlers;
mod server;

pub use server::{ServerHandle, build_router, start_server};
