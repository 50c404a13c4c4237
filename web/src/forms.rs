//! HTML form input and its validation.
//!
//! Validation happens here, before the task API is ever called: the client
//! layer assumes titles are non-empty and within bounds.

use serde::Deserialize;
use task_core::{CreateTask, Task, UpdateTask};

pub const TITLE_MAX_CHARS: usize = 200;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

/// Raw form fields as posted by the create and edit pages.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskForm {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Browsers omit unchecked checkboxes entirely.
    #[serde(default)]
    pub is_completed: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Form contents that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidTask {
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
}

impl TaskForm {
    /// Prefill for the edit page. A missing title becomes empty.
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: Some(task.id),
            title: task.title.clone().unwrap_or_default(),
            description: task.description.clone().unwrap_or_default(),
            is_completed: task.is_completed.then(|| "true".to_string()),
        }
    }

    pub fn completed(&self) -> bool {
        self.is_completed
            .as_deref()
            .is_some_and(|v| !v.eq_ignore_ascii_case("false"))
    }

    pub fn validate(&self) -> Result<ValidTask, Vec<FieldError>> {
        let mut errors = Vec::new();

        let title = self.title.trim();
        if title.is_empty() {
            errors.push(FieldError {
                field: "title",
                message: "Title is required.",
            });
        } else if title.chars().count() > TITLE_MAX_CHARS {
            errors.push(FieldError {
                field: "title",
                message: "Title must be between 1 and 200 characters.",
            });
        }

        let description = self.description.trim();
        if description.chars().count() > DESCRIPTION_MAX_CHARS {
            errors.push(FieldError {
                field: "description",
                message: "Description cannot exceed 1000 characters.",
            });
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(ValidTask {
            title: title.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            is_completed: self.completed(),
        })
    }
}

impl ValidTask {
    pub fn into_create(self) -> CreateTask {
        CreateTask {
            title: self.title,
            description: self.description,
            is_completed: self.is_completed,
        }
    }

    pub fn into_update(self, id: i32) -> UpdateTask {
        UpdateTask {
            id,
            title: self.title,
            description: self.description,
            is_completed: self.is_completed,
        }
    }
}
