//! Task operations with the failure policy applied.
//!
//! # Design
//! Reads and delete fail soft: any failure is logged and turned into the
//! safe default (empty list, `None`, `false`). Create and update fail loud:
//! the failure is logged and returned, because there is no sensible default
//! for "the task you asked for". Nothing here retries.

use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::client::TaskClient;
use crate::config::{ApiSettings, DeploymentMode, TransportConfig};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{CreateTask, Task, UpdateTask};

/// Operations the web layer calls. Implemented by [`TaskService`] against
/// the real remote API and by fakes in tests.
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// All tasks; empty on any failure.
    async fn list_tasks(&self) -> Vec<Task>;

    /// Completed tasks; empty on any failure.
    async fn list_completed_tasks(&self) -> Vec<Task>;

    /// `None` when the task does not exist or the call fails.
    async fn get_task(&self, id: i32) -> Option<Task>;

    async fn create_task(&self, input: &CreateTask) -> Result<Task, ApiError>;

    /// Full replacement of task `id`. `input.id` is sent as given.
    async fn update_task(&self, id: i32, input: &UpdateTask) -> Result<Task, ApiError>;

    /// `true` once removed, `false` when absent or the call fails.
    async fn delete_task(&self, id: i32) -> bool;
}

#[derive(Debug, Clone)]
pub struct TaskService {
    client: TaskClient,
    transport: Transport,
}

impl TaskService {
    /// Resolve the base address and build the shared transport.
    pub fn new(settings: &ApiSettings, mode: DeploymentMode) -> Result<Self, ApiError> {
        Self::from_config(&TransportConfig::new(settings, mode))
    }

    pub fn from_config(config: &TransportConfig) -> Result<Self, ApiError> {
        let transport = Transport::new(config)?;
        let client = TaskClient::new(transport.base_url());
        info!(base_url = %transport.base_url(), "task service initialised");
        Ok(Self { client, transport })
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    async fn call<T>(
        &self,
        request: Result<HttpRequest, ApiError>,
        parse: impl FnOnce(&TaskClient, HttpResponse) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let request = request?;
        debug!(method = request.method.as_str(), url = %request.url, "calling task API");
        let response = self.transport.execute(request).await?;
        debug!(status = response.status, body = %response.body, "task API responded");
        parse(&self.client, response)
    }

    /// Read-side policy: log and fall back to the default value.
    fn recover<T: Default>(&self, operation: &str, result: Result<T, ApiError>) -> T {
        result.unwrap_or_else(|e| {
            self.log_failure(operation, &e);
            T::default()
        })
    }

    /// Write-side policy: log and hand the failure to the caller.
    fn propagate<T>(&self, operation: &str, result: Result<T, ApiError>) -> Result<T, ApiError> {
        result.inspect_err(|e| self.log_failure(operation, e))
    }

    fn log_failure(&self, operation: &str, e: &ApiError) {
        match e {
            ApiError::Transport { .. } => {
                error!(operation, base_url = %self.base_url(), error = %e, "task API unreachable")
            }
            _ => error!(operation, error = %e, "task API call failed"),
        }
    }
}

#[async_trait]
impl TaskApi for TaskService {
    async fn list_tasks(&self) -> Vec<Task> {
        let result = self
            .call(Ok(self.client.build_list_tasks()), TaskClient::parse_list_tasks)
            .await;
        let tasks = self.recover("list_tasks", result);
        info!(count = tasks.len(), "listed tasks");
        tasks
    }

    async fn list_completed_tasks(&self) -> Vec<Task> {
        let result = self
            .call(
                Ok(self.client.build_list_completed_tasks()),
                TaskClient::parse_list_tasks,
            )
            .await;
        self.recover("list_completed_tasks", result)
    }

    async fn get_task(&self, id: i32) -> Option<Task> {
        let result = self
            .call(Ok(self.client.build_get_task(id)), TaskClient::parse_get_task)
            .await;
        let task = self.recover("get_task", result);
        if task.is_none() {
            info!(id, "task not found");
        }
        task
    }

    async fn create_task(&self, input: &CreateTask) -> Result<Task, ApiError> {
        let result = self
            .call(self.client.build_create_task(input), TaskClient::parse_create_task)
            .await;
        self.propagate("create_task", result)
    }

    async fn update_task(&self, id: i32, input: &UpdateTask) -> Result<Task, ApiError> {
        let result = self
            .call(
                self.client.build_update_task(id, input),
                TaskClient::parse_update_task,
            )
            .await;
        self.propagate("update_task", result)
    }

    async fn delete_task(&self, id: i32) -> bool {
        let result = self
            .call(Ok(self.client.build_delete_task(id)), TaskClient::parse_delete_task)
            .await;
        let removed = self.recover("delete_task", result);
        if !removed {
            info!(id, "task not deleted");
        }
        removed
    }
}
