//! Server-side HTML rendering.
//!
//! Pages are assembled with `format!`; every piece of user or remote text
//! goes through [`escape`] first.

use serde::Deserialize;
use task_core::Task;

use crate::forms::{FieldError, TaskForm};

/// One-shot banner carried across a redirect in the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Flash {
    pub success: Option<String>,
    pub error: Option<String>,
}

impl Flash {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i32),
}

pub fn escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn layout(title: &str, flash: &Flash, body: &str) -> String {
    let mut banners = String::new();
    if let Some(msg) = &flash.success {
        banners.push_str(&format!(r#"<div class="alert success">{}</div>"#, escape(msg)));
    }
    if let Some(msg) = &flash.error {
        banners.push_str(&format!(r#"<div class="alert error">{}</div>"#, escape(msg)));
    }
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>{title} - Tasks</title></head>
<body>
<nav><a href="/tasks">All tasks</a> | <a href="/tasks/completed">Completed</a> | <a href="/tasks/new">New task</a></nav>
{banners}
<main>
<h1>{title}</h1>
{body}
</main>
</body>
</html>"#,
        title = escape(title),
    )
}

fn display_title(task: &Task) -> String {
    escape(task.title.as_deref().unwrap_or("(untitled)"))
}

fn status_label(task: &Task) -> &'static str {
    if task.is_completed {
        "Completed"
    } else {
        "Pending"
    }
}

/// Task table used by the index, completed and API-test pages. `notice`
/// is an extra informational line shown above the table.
pub fn task_list(heading: &str, tasks: &[Task], flash: &Flash, notice: Option<&str>) -> String {
    let mut body = String::new();
    if let Some(notice) = notice {
        body.push_str(&format!(r#"<p class="notice">{}</p>"#, escape(notice)));
    }
    if tasks.is_empty() {
        body.push_str("<p>No tasks to show.</p>");
        return layout(heading, flash, &body);
    }

    body.push_str("<table>\n<tr><th>Title</th><th>Description</th><th>Status</th><th></th></tr>\n");
    for task in tasks {
        let toggle_label = if task.is_completed {
            "Mark pending"
        } else {
            "Mark completed"
        };
        body.push_str(&format!(
            r#"<tr><td><a href="/tasks/{id}">{title}</a></td><td>{description}</td><td>{status}</td><td><form method="post" action="/tasks/{id}/toggle"><button type="submit">{toggle_label}</button></form> <a href="/tasks/{id}/edit">Edit</a> <a href="/tasks/{id}/delete">Delete</a></td></tr>
"#,
            id = task.id,
            title = display_title(task),
            description = escape(task.description.as_deref().unwrap_or("")),
            status = status_label(task),
        ));
    }
    body.push_str("</table>");
    layout(heading, flash, &body)
}

pub fn task_details(task: &Task) -> String {
    let body = format!(
        r#"<dl>
<dt>Title</dt><dd>{title}</dd>
<dt>Description</dt><dd>{description}</dd>
<dt>Status</dt><dd>{status}</dd>
</dl>
<a href="/tasks/{id}/edit">Edit</a> | <a href="/tasks">Back to list</a>"#,
        id = task.id,
        title = display_title(task),
        description = escape(task.description.as_deref().unwrap_or("")),
        status = status_label(task),
    );
    layout("Task details", &Flash::default(), &body)
}

pub fn task_form(mode: FormMode, form: &TaskForm, errors: &[FieldError], flash: &Flash) -> String {
    let (heading, action, hidden_id) = match mode {
        FormMode::Create => ("New task", "/tasks".to_string(), String::new()),
        FormMode::Edit(id) => (
            "Edit task",
            format!("/tasks/{id}/edit"),
            format!(r#"<input type="hidden" name="id" value="{id}">"#),
        ),
    };
    let field_errors = |field: &str| -> String {
        errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| format!(r#"<span class="field-error">{}</span>"#, escape(e.message)))
            .collect()
    };
    let checked = if form.completed() { " checked" } else { "" };

    let body = format!(
        r#"<form method="post" action="{action}">
{hidden_id}
<label>Title <input name="title" maxlength="200" value="{title}"></label>{title_errors}
<label>Description <textarea name="description" maxlength="1000">{description}</textarea></label>{description_errors}
<label><input type="checkbox" name="is_completed" value="true"{checked}> Completed</label>
<button type="submit">Save</button>
</form>
<a href="/tasks">Back to list</a>"#,
        title = escape(&form.title),
        title_errors = field_errors("title"),
        description = escape(&form.description),
        description_errors = field_errors("description"),
    );
    layout(heading, flash, &body)
}

pub fn delete_confirmation(task: &Task) -> String {
    let body = format!(
        r#"<p>Are you sure you want to delete <strong>{title}</strong>?</p>
<form method="post" action="/tasks/{id}/delete"><button type="submit">Delete</button></form>
<a href="/tasks">Cancel</a>"#,
        id = task.id,
        title = display_title(task),
    );
    layout("Delete task", &Flash::default(), &body)
}

pub fn not_found(id: i32) -> String {
    layout(
        "Not found",
        &Flash::default(),
        &format!(r#"<p>Task {id} does not exist.</p><a href="/tasks">Back to list</a>"#),
    )
}
