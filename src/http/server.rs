//! Router construction and server lifecycle.

use axum::Router;
use axum::routing::{get, post};
use std::net::SocketAddr;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::error::{internal_error, route_not_found};
use super::handlers;
use crate::service::BoardService;

/// Build the `/api` router over a board service.
pub fn build_router(service: BoardService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/task",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route(
            "/task/{id}",
            get(handlers::get_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .route("/task/{id}/archive", post(handlers::archive_task))
        .route(
            "/task-column",
            get(handlers::list_columns).post(handlers::create_column),
        )
        .route("/task-column/tasks", get(handlers::list_tasks_with_columns))
        .route(
            "/task-column/{id}",
            get(handlers::get_column)
                .put(handlers::update_column)
                .delete(handlers::delete_column),
        )
        .route("/task-column/{id}/tasks", get(handlers::list_column_tasks));

    Router::new()
        .nest("/api", api)
        .fallback(route_not_found)
        .layer(CatchPanicLayer::custom(internal_error))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(service)
}

/// A running server.
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    /// Address the server is bound to.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL for clients, e.g. `http://127.0.0.1:3000/api`.
    pub fn api_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Stop accepting connections and wait for in-flight requests.
    ///
    /// Once this returns the router, and the service it owns, are dropped.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = self.task.await {
            tracing::error!("Server task failed: {}", e);
        }
    }
}

/// Bind and start serving in the background.
///
/// Port 0 picks a free port; the bound address is on the returned handle.
pub async fn start_server(
    service: BoardService,
    host: &str,
    port: u16,
) -> anyhow::Result<ServerHandle> {
    let app = build_router(service);

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    let addr = listener.local_addr()?;

    info!("Board API listening on http://{}/api", addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("Board API shutting down");
            })
            .await
        {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok(ServerHandle {
        addr,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}
