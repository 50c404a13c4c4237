//! Task pages. Each handler calls the task API once or twice and maps the
//! outcome to a page or a redirect with a flash message.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use task_core::UpdateTask;
use tracing::{error, warn};

use crate::forms::TaskForm;
use crate::views::{self, Flash, FormMode};
use crate::AppState;

fn redirect_with(kind: &str, message: &str) -> Redirect {
    Redirect::to(&format!("/tasks?{kind}={}", urlencoding::encode(message)))
}

fn not_found(id: i32) -> Response {
    (StatusCode::NOT_FOUND, Html(views::not_found(id))).into_response()
}

pub async fn index(State(state): State<AppState>, Query(flash): Query<Flash>) -> Html<String> {
    let tasks = state.tasks.list_tasks().await;
    Html(views::task_list("All tasks", &tasks, &flash, None))
}

pub async fn completed(State(state): State<AppState>, Query(flash): Query<Flash>) -> Html<String> {
    let tasks = state.tasks.list_completed_tasks().await;
    Html(views::task_list("Completed tasks", &tasks, &flash, None))
}

pub async fn details(State(state): State<AppState>, Path(id): Path<i32>) -> Response {
    match state.tasks.get_task(id).await {
        Some(task) => Html(views::task_details(&task)).into_response(),
        None => not_found(id),
    }
}

pub async fn new_form() -> Html<String> {
    Html(views::task_form(
        FormMode::Create,
        &TaskForm::default(),
        &[],
        &Flash::default(),
    ))
}

pub async fn create(State(state): State<AppState>, Form(form): Form<TaskForm>) -> Response {
    let valid = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => {
            let page = views::task_form(FormMode::Create, &form, &errors, &Flash::default());
            return (StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response();
        }
    };

    match state.tasks.create_task(&valid.into_create()).await {
        Ok(_) => redirect_with("success", "Task created successfully.").into_response(),
        Err(e) => {
            error!(error = %e, "could not create task");
            let flash = Flash::error("Could not create the task. Please try again.");
            let page = views::task_form(FormMode::Create, &form, &[], &flash);
            (StatusCode::BAD_GATEWAY, Html(page)).into_response()
        }
    }
}

pub async fn edit_form(State(state): State<AppState>, Path(id): Path<i32>) -> Response {
    match state.tasks.get_task(id).await {
        Some(task) => Html(views::task_form(
            FormMode::Edit(id),
            &TaskForm::from_task(&task),
            &[],
            &Flash::default(),
        ))
        .into_response(),
        None => not_found(id),
    }
}

pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<TaskForm>,
) -> Response {
    if form.id != Some(id) {
        warn!(id, form_id = ?form.id, "edit form id does not match path");
        return not_found(id);
    }

    let valid = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => {
            let page = views::task_form(FormMode::Edit(id), &form, &errors, &Flash::default());
            return (StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response();
        }
    };

    match state.tasks.update_task(id, &valid.into_update(id)).await {
        Ok(_) => redirect_with("success", "Task updated successfully.").into_response(),
        Err(e) => {
            error!(id, error = %e, "could not update task");
            let flash = Flash::error("Could not update the task. Please try again.");
            let page = views::task_form(FormMode::Edit(id), &form, &[], &flash);
            (StatusCode::BAD_GATEWAY, Html(page)).into_response()
        }
    }
}

pub async fn delete_confirm(State(state): State<AppState>, Path(id): Path<i32>) -> Response {
    match state.tasks.get_task(id).await {
        Some(task) => Html(views::delete_confirmation(&task)).into_response(),
        None => not_found(id),
    }
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> Redirect {
    if state.tasks.delete_task(id).await {
        redirect_with("success", "Task deleted successfully.")
    } else {
        redirect_with(
            "error",
            "Could not delete the task. It may no longer exist.",
        )
    }
}

pub async fn toggle(State(state): State<AppState>, Path(id): Path<i32>) -> Redirect {
    let Some(task) = state.tasks.get_task(id).await else {
        return redirect_with("error", "Task not found.");
    };

    let update = UpdateTask::toggled(&task);
    match state.tasks.update_task(id, &update).await {
        Ok(_) => {
            let label = if update.is_completed {
                "completed"
            } else {
                "pending"
            };
            redirect_with("success", &format!("Task marked as {label}."))
        }
        Err(e) => {
            error!(id, error = %e, "could not toggle task");
            redirect_with("error", "Could not update the task status.")
        }
    }
}
