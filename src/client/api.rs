//! Board API client.

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::types::{Column, Deleted, NewTask, Task, TaskPatch};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// HTTP status for errors reported by the server.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Remote operations the board view-model depends on.
#[async_trait]
pub trait BoardApi: Send + Sync {
    async fn list_columns(&self) -> ClientResult<Vec<Column>>;

    async fn list_tasks(&self) -> ClientResult<Vec<Task>>;

    async fn get_task(&self, id: i64) -> ClientResult<Task>;

    async fn create_task(&self, input: &NewTask) -> ClientResult<Task>;

    async fn update_task(&self, id: i64, patch: &TaskPatch) -> ClientResult<Task>;

    /// Persist a change of column membership, and nothing else.
    async fn move_task(&self, id: i64, column_position: i64) -> ClientResult<Task> {
        self.update_task(id, &TaskPatch::move_to(column_position))
            .await
    }

    async fn delete_task(&self, id: i64) -> ClientResult<Deleted>;

    async fn archive_task(&self, id: i64) -> ClientResult<Task>;
}

/// [`BoardApi`] over the REST interface.
#[derive(Clone)]
pub struct HttpBoardClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBoardClient {
    /// `base_url` includes the mount point, e.g. `http://localhost:3000/api`.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn send<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        parse_response(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send::<T, ()>(Method::GET, path, None).await
    }
}

async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
    let status = response.status();
    let text = response.text().await?;
    if status.is_success() {
        return Ok(serde_json::from_str(&text)?);
    }

    let message = serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|body| body.get("error").and_then(Value::as_str).map(String::from))
        .unwrap_or(text);
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl BoardApi for HttpBoardClient {
    async fn list_columns(&self) -> ClientResult<Vec<Column>> {
        self.get_json("/task-column").await
    }

    async fn list_tasks(&self) -> ClientResult<Vec<Task>> {
        self.get_json("/task").await
    }

    async fn get_task(&self, id: i64) -> ClientResult<Task> {
        self.get_json(&format!("/task/{}", id)).await
    }

    async fn create_task(&self, input: &NewTask) -> ClientResult<Task> {
        self.send(Method::POST, "/task", Some(input)).await
    }

    async fn update_task(&self, id: i64, patch: &TaskPatch) -> ClientResult<Task> {
        let path = format!("/task/{}", id);
        self.send(Method::PUT, &path, Some(patch)).await
    }

    async fn delete_task(&self, id: i64) -> ClientResult<Deleted> {
        let path = format!("/task/{}", id);
        self.send::<_, ()>(Method::DELETE, &path, None).await
    }

    async fn archive_task(&self, id: i64) -> ClientResult<Task> {
        let path = format!("/task/{}/archive", id);
        self.send::<_, ()>(Method::POST, &path, None).await
    }
}
