//! Connectivity checks against the remote task API.

use std::collections::BTreeMap;

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
};
use serde::Serialize;
use task_core::{Task, TaskClient, Transport};
use tracing::info;

use crate::views::{self, Flash};
use crate::AppState;

/// Raw access to the remote API, bypassing the service's failure policy so
/// the diagnostics page can show what actually came back.
#[derive(Debug, Clone)]
pub struct ApiProbe {
    client: TaskClient,
    transport: Transport,
}

impl ApiProbe {
    pub fn new(transport: Transport) -> Self {
        Self {
            client: TaskClient::new(transport.base_url()),
            transport,
        }
    }

    pub fn tasks_url(&self) -> String {
        self.client.tasks_url()
    }

    async fn direct(&self) -> ProbeResult {
        let mut result = ProbeResult::named("direct transport");
        result.url = Some(self.tasks_url());
        match self.transport.execute(self.client.build_list_tasks()).await {
            Ok(response) => {
                result.success = response.is_success();
                result.status = Some(response.status);
                result.headers = Some(group_headers(response.headers));
                result.content = Some(response.body);
            }
            Err(e) => result.error = Some(e.to_string()),
        }
        result
    }
}

/// Every value of every header, in arrival order per name.
fn group_headers(headers: Vec<(String, String)>) -> BTreeMap<String, Vec<String>> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in headers {
        grouped.entry(name).or_default().push(value);
    }
    grouped
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticReport {
    pub timestamp: String,
    pub tests: Vec<ProbeResult>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    pub test: &'static str,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<Task>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProbeResult {
    fn named(test: &'static str) -> Self {
        Self {
            test,
            ..Self::default()
        }
    }
}

pub async fn run(state: &AppState) -> DiagnosticReport {
    let direct = state.probe.direct().await;

    let tasks = state.tasks.list_tasks().await;
    let mut service = ProbeResult::named("task service");
    service.success = true;
    service.task_count = Some(tasks.len());
    service.tasks = Some(tasks.into_iter().take(3).collect());

    DiagnosticReport {
        timestamp: chrono::Local::now().to_rfc3339(),
        tests: vec![direct, service],
    }
}

pub async fn report(State(state): State<AppState>) -> impl IntoResponse {
    let report = run(&state).await;
    let body = serde_json::to_string_pretty(&report)
        .unwrap_or_else(|e| format!(r#"{{"error":"could not render report: {e}"}}"#));
    ([(header::CONTENT_TYPE, "application/json")], body)
}

/// List page with a banner saying how many tasks the API returned.
pub async fn test_api(State(state): State<AppState>) -> Html<String> {
    info!(url = %state.probe.tasks_url(), "testing task API connection");
    let tasks = state.tasks.list_tasks().await;
    let notice = format!(
        "API test: {} task(s) returned from {}",
        tasks.len(),
        state.probe.tasks_url()
    );
    Html(views::task_list("API test", &tasks, &Flash::default(), Some(&notice)))
}
