//! Stateless HTTP request builder and response parser for the task API.
//!
//! # Design
//! `TaskClient` holds only the resolved `base_url` and carries no mutable
//! state between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The parse methods report every outcome as a `Result`; the
//! read-soft/write-loud policy is applied one level up, in
//! [`crate::service`].

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateTask, Task, UpdateTask};

/// Resource root of the remote API, relative to the base address.
pub const TASKS_PATH: &str = "/api/Task";

#[derive(Debug, Clone)]
pub struct TaskClient {
    base_url: String,
}

impl TaskClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Absolute URL of the task collection, e.g. for diagnostics output.
    pub fn tasks_url(&self) -> String {
        format!("{}{TASKS_PATH}", self.base_url)
    }

    pub fn build_list_tasks(&self) -> HttpRequest {
        self.bare(HttpMethod::Get, self.tasks_url())
    }

    pub fn build_list_completed_tasks(&self) -> HttpRequest {
        self.bare(HttpMethod::Get, format!("{}/completed", self.tasks_url()))
    }

    pub fn build_get_task(&self, id: i32) -> HttpRequest {
        self.bare(HttpMethod::Get, self.task_url(id))
    }

    pub fn build_create_task(&self, input: &CreateTask) -> Result<HttpRequest, ApiError> {
        self.with_json(HttpMethod::Post, self.tasks_url(), input)
    }

    /// The payload is sent exactly as given, even if `input.id != id`; callers
    /// reject that mismatch before getting here.
    pub fn build_update_task(&self, id: i32, input: &UpdateTask) -> Result<HttpRequest, ApiError> {
        self.with_json(HttpMethod::Put, self.task_url(id), input)
    }

    pub fn build_delete_task(&self, id: i32) -> HttpRequest {
        self.bare(HttpMethod::Delete, self.task_url(id))
    }

    /// An empty or `null` body is an empty list.
    pub fn parse_list_tasks(&self, response: HttpResponse) -> Result<Vec<Task>, ApiError> {
        check_status(&response)?;
        Ok(parse_optional::<Vec<Task>>(&response.body)?.unwrap_or_default())
    }

    /// 404 and a `null` body both mean the task is absent.
    pub fn parse_get_task(&self, response: HttpResponse) -> Result<Option<Task>, ApiError> {
        if response.status == 404 {
            return Ok(None);
        }
        check_status(&response)?;
        parse_optional(&response.body)
    }

    pub fn parse_create_task(&self, response: HttpResponse) -> Result<Task, ApiError> {
        parse_required(response)
    }

    pub fn parse_update_task(&self, response: HttpResponse) -> Result<Task, ApiError> {
        parse_required(response)
    }

    /// `Ok(true)` on removal, `Ok(false)` when the task was already gone.
    pub fn parse_delete_task(&self, response: HttpResponse) -> Result<bool, ApiError> {
        if response.status == 404 {
            return Ok(false);
        }
        check_status(&response)?;
        Ok(true)
    }

    fn task_url(&self, id: i32) -> String {
        format!("{}/{id}", self.tasks_url())
    }

    fn bare(&self, method: HttpMethod, url: String) -> HttpRequest {
        HttpRequest {
            method,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    fn with_json<T: Serialize>(
        &self,
        method: HttpMethod,
        url: String,
        input: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method,
            url,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}

/// `None` for an empty or `null` body, the decoded value otherwise.
fn parse_optional<T: DeserializeOwned>(body: &str) -> Result<Option<T>, ApiError> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str::<Option<T>>(body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// A success status without a task in the body is still a failure.
fn parse_required(response: HttpResponse) -> Result<Task, ApiError> {
    check_status(&response)?;
    parse_optional(&response.body)?.ok_or(ApiError::EmptyBody)
}
