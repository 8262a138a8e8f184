//! Task and column operations over an injected store handle.
//!
//! Everything that crosses this boundary is an API type; store failures are
//! logged here and surface as [`ServiceError::Storage`].

mod columns;
mod tasks;

pub use columns::DEFAULT_COLUMNS;
pub use tasks::DEFAULT_TASK_POSITION;

use crate::db::{Database, Record};
use crate::error::{ServiceError, ServiceResult};
use crate::normalize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::error;

/// Board operations shared by the HTTP handlers and the CLI.
#[derive(Clone)]
pub struct BoardService {
    db: Arc<Database>,
}

impl BoardService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Get the database reference.
    pub fn db(&self) -> &Arc<Database> {
        &self.db
    }
}

/// Log a store failure and hide it behind the storage variant.
fn storage(err: anyhow::Error) -> ServiceError {
    error!(error = %err, "store operation failed");
    ServiceError::Storage(err)
}

fn decode<T: DeserializeOwned>(record: Record) -> ServiceResult<T> {
    normalize::from_record(record).map_err(|err| storage(err.into()))
}

fn decode_all<T: DeserializeOwned>(records: Vec<Record>) -> ServiceResult<Vec<T>> {
    records.into_iter().map(decode).collect()
}

/// Trimmed, non-empty text or a validation error naming the field.
fn required_text(field: &str, value: Option<String>) -> ServiceResult<String> {
    match value.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(ServiceError::missing_field(field)),
    }
}
