//! Route handlers.
//!
//! Bodies are taken as raw JSON and normalized to camelCase before decoding,
//! so snake_case callers keep working. Every extraction failure is reported
//! with the same error body as the service's own validation errors.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use heck::ToLowerCamelCase;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

use crate::error::{ServiceError, ServiceResult};
use crate::normalize::to_camel_case_keys;
use crate::service::BoardService;
use crate::types::{ColumnPatch, NewColumn, NewTask, TaskFilter, TaskPatch};

type Body = Result<Json<Value>, JsonRejection>;
type Id = Result<Path<i64>, PathRejection>;

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

fn decode_body<T: DeserializeOwned>(body: Body) -> ServiceResult<T> {
    let Json(value) = body.map_err(|rejection| ServiceError::invalid_body(rejection.body_text()))?;
    serde_json::from_value(to_camel_case_keys(value))
        .map_err(|err| ServiceError::invalid_body(format!("Invalid request body: {}", err)))
}

fn path_id(id: Id) -> ServiceResult<i64> {
    id.map(|Path(id)| id)
        .map_err(|rejection| ServiceError::invalid_value("id", rejection.body_text()))
}

fn task_filter(query: Result<Query<HashMap<String, String>>, QueryRejection>) -> ServiceResult<TaskFilter> {
    let Query(params) =
        query.map_err(|rejection| ServiceError::invalid_body(rejection.body_text()))?;

    let mut filter = TaskFilter::default();
    for (key, raw) in params {
        if key.to_lower_camel_case() == "columnPosition" {
            let position = raw.trim().parse::<i64>().map_err(|_| {
                ServiceError::invalid_value("columnPosition", "columnPosition must be an integer")
            })?;
            filter.column_position = Some(position);
        }
    }
    Ok(filter)
}

// Tasks

pub async fn list_tasks(
    State(service): State<BoardService>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> ServiceResult<impl IntoResponse> {
    let filter = task_filter(query)?;
    Ok(Json(service.list_tasks(&filter)?))
}

pub async fn get_task(
    State(service): State<BoardService>,
    id: Id,
) -> ServiceResult<impl IntoResponse> {
    Ok(Json(service.get_task(path_id(id)?)?))
}

pub async fn create_task(
    State(service): State<BoardService>,
    body: Body,
) -> ServiceResult<impl IntoResponse> {
    let input: NewTask = decode_body(body)?;
    Ok((StatusCode::CREATED, Json(service.create_task(input)?)))
}

pub async fn update_task(
    State(service): State<BoardService>,
    id: Id,
    body: Body,
) -> ServiceResult<impl IntoResponse> {
    let id = path_id(id)?;
    let patch: TaskPatch = decode_body(body)?;
    Ok(Json(service.update_task(id, patch)?))
}

pub async fn delete_task(
    State(service): State<BoardService>,
    id: Id,
) -> ServiceResult<impl IntoResponse> {
    Ok(Json(service.delete_task(path_id(id)?)?))
}

pub async fn archive_task(
    State(service): State<BoardService>,
    id: Id,
) -> ServiceResult<impl IntoResponse> {
    Ok(Json(service.archive_task(path_id(id)?)?))
}

// Columns

pub async fn list_columns(State(service): State<BoardService>) -> ServiceResult<impl IntoResponse> {
    Ok(Json(service.list_columns()?))
}

pub async fn list_tasks_with_columns(
    State(service): State<BoardService>,
) -> ServiceResult<impl IntoResponse> {
    Ok(Json(service.list_tasks_with_columns()?))
}

pub async fn get_column(
    State(service): State<BoardService>,
    id: Id,
) -> ServiceResult<impl IntoResponse> {
    Ok(Json(service.get_column(path_id(id)?)?))
}

pub async fn create_column(
    State(service): State<BoardService>,
    body: Body,
) -> ServiceResult<impl IntoResponse> {
    let input: NewColumn = decode_body(body)?;
    Ok((StatusCode::CREATED, Json(service.create_column(input)?)))
}

pub async fn update_column(
    State(service): State<BoardService>,
    id: Id,
    body: Body,
) -> ServiceResult<impl IntoResponse> {
    let id = path_id(id)?;
    let patch: ColumnPatch = decode_body(body)?;
    Ok(Json(service.update_column(id, patch)?))
}

pub async fn delete_column(
    State(service): State<BoardService>,
    id: Id,
) -> ServiceResult<impl IntoResponse> {
    Ok(Json(service.delete_column(path_id(id)?)?))
}

pub async fn list_column_tasks(
    State(service): State<BoardService>,
    id: Id,
) -> ServiceResult<impl IntoResponse> {
    Ok(Json(service.list_column_tasks(path_id(id)?)?))
}
