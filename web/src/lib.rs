//! Server-rendered front end for the remote task API.
//!
//! Pages are thin: they call [`TaskApi`] and turn the result into HTML, a
//! redirect with a flash message, or a 404 page. All failure policy lives in
//! `task-core`.

pub mod diagnostics;
pub mod forms;
pub mod handlers;
pub mod views;

use std::sync::Arc;

use axum::{
    response::Redirect,
    routing::{get, post},
    Router,
};
use task_core::{TaskApi, TaskService, Transport};
use tower_http::trace::TraceLayer;

pub use diagnostics::ApiProbe;

#[derive(Clone)]
pub struct AppState {
    pub tasks: Arc<dyn TaskApi>,
    pub probe: ApiProbe,
}

impl AppState {
    pub fn new(tasks: Arc<dyn TaskApi>, transport: Transport) -> Self {
        Self {
            tasks,
            probe: ApiProbe::new(transport),
        }
    }

    pub fn from_service(service: TaskService) -> Self {
        let transport = service.transport().clone();
        Self::new(Arc::new(service), transport)
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/tasks") }))
        .route("/tasks", get(handlers::index).post(handlers::create))
        .route("/tasks/completed", get(handlers::completed))
        .route("/tasks/new", get(handlers::new_form))
        .route("/tasks/test-api", get(diagnostics::test_api))
        .route("/tasks/{id}", get(handlers::details))
        .route(
            "/tasks/{id}/edit",
            get(handlers::edit_form).post(handlers::edit),
        )
        .route(
            "/tasks/{id}/delete",
            get(handlers::delete_confirm).post(handlers::delete),
        )
        .route("/tasks/{id}/toggle", post(handlers::toggle))
        .route("/diagnostics", get(diagnostics::report))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
