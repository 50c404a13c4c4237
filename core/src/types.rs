//! Domain DTOs for the remote task API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Integration tests catch any schema drift between the two crates. The wire
//! form is camelCase (`isCompleted`).

use serde::{Deserialize, Serialize};

/// A single task as returned by the remote service.
///
/// The remote copy is authoritative; the client never mutates it locally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
}

/// Request payload for creating a new task. The id is assigned remotely.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
}

/// Request payload for a full-replacement update. Every field is sent, so an
/// absent description clears it on the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    pub id: i32,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
}

impl UpdateTask {
    /// Full-replacement payload that carries `task` over unchanged apart from
    /// its completion flag. A missing title becomes the empty string.
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone().unwrap_or_default(),
            description: task.description.clone(),
            is_completed: task.is_completed,
        }
    }

    pub fn toggled(task: &Task) -> Self {
        Self {
            is_completed: !task.is_completed,
            ..Self::from_task(task)
        }
    }
}
