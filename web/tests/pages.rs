use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use task_core::{
    ApiError, CreateTask, Task, TaskApi, Transport, TransportConfig, UpdateTask, REQUEST_TIMEOUT,
};
use task_web::{app, AppState};
use tower::ServiceExt;

/// In-memory stand-in for the remote API with the same soft/loud contract.
#[derive(Default)]
struct FakeTasks {
    tasks: Mutex<BTreeMap<i32, Task>>,
    fail_writes: bool,
}

impl FakeTasks {
    fn seeded() -> Self {
        let fake = Self::default();
        fake.insert(task(1, "A", false));
        fake.insert(task(2, "B", true));
        fake
    }

    fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::seeded()
        }
    }

    fn insert(&self, task: Task) {
        self.tasks.lock().unwrap().insert(task.id, task);
    }

    fn snapshot(&self, id: i32) -> Option<Task> {
        self.tasks.lock().unwrap().get(&id).cloned()
    }
}

#[async_trait]
impl TaskApi for FakeTasks {
    async fn list_tasks(&self) -> Vec<Task> {
        self.tasks.lock().unwrap().values().cloned().collect()
    }

    async fn list_completed_tasks(&self) -> Vec<Task> {
        self.tasks
            .lock()
            .unwrap()
            .values()
            .filter(|t| t.is_completed)
            .cloned()
            .collect()
    }

    async fn get_task(&self, id: i32) -> Option<Task> {
        self.snapshot(id)
    }

    async fn create_task(&self, input: &CreateTask) -> Result<Task, ApiError> {
        if self.fail_writes {
            return Err(ApiError::Http {
                status: 500,
                body: String::new(),
            });
        }
        let mut tasks = self.tasks.lock().unwrap();
        let id = tasks.keys().max().copied().unwrap_or(0) + 1;
        let created = Task {
            id,
            title: Some(input.title.clone()),
            description: input.description.clone(),
            is_completed: input.is_completed,
        };
        tasks.insert(id, created.clone());
        Ok(created)
    }

    async fn update_task(&self, id: i32, input: &UpdateTask) -> Result<Task, ApiError> {
        if self.fail_writes {
            return Err(ApiError::EmptyBody);
        }
        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks.get_mut(&id).ok_or(ApiError::NotFound)?;
        task.title = Some(input.title.clone());
        task.description = input.description.clone();
        task.is_completed = input.is_completed;
        Ok(task.clone())
    }

    async fn delete_task(&self, id: i32) -> bool {
        self.tasks.lock().unwrap().remove(&id).is_some()
    }
}

fn task(id: i32, title: &str, is_completed: bool) -> Task {
    Task {
        id,
        title: Some(title.to_string()),
        description: None,
        is_completed,
    }
}

fn unreachable_transport() -> Transport {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    Transport::new(&TransportConfig {
        base_url,
        timeout: REQUEST_TIMEOUT,
        accept_invalid_certs: false,
    })
    .unwrap()
}

fn router(fake: Arc<FakeTasks>) -> axum::Router {
    app(AppState::new(fake, unreachable_transport()))
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(body.to_string())
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

// --- listing ---

#[tokio::test]
async fn root_redirects_to_task_list() {
    let resp = router(Arc::new(FakeTasks::seeded())).oneshot(get("/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/tasks");
}

#[tokio::test]
async fn index_lists_all_tasks_with_flash() {
    let resp = router(Arc::new(FakeTasks::seeded()))
        .oneshot(get("/tasks?success=Task%20created%20successfully."))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains(r#"<a href="/tasks/1">A</a>"#));
    assert!(html.contains(r#"<a href="/tasks/2">B</a>"#));
    assert!(html.contains(r#"<div class="alert success">Task created successfully.</div>"#));
}

#[tokio::test]
async fn completed_lists_only_completed_tasks() {
    let resp = router(Arc::new(FakeTasks::seeded()))
        .oneshot(get("/tasks/completed"))
        .await
        .unwrap();
    let html = body_text(resp).await;
    assert!(html.contains("Completed tasks"));
    assert!(html.contains(r#"<a href="/tasks/2">B</a>"#));
    assert!(!html.contains(r#"<a href="/tasks/1">A</a>"#));
}

#[tokio::test]
async fn test_api_page_reports_count_and_url() {
    let resp = router(Arc::new(FakeTasks::seeded()))
        .oneshot(get("/tasks/test-api"))
        .await
        .unwrap();
    let html = body_text(resp).await;
    assert!(html.contains("API test: 2 task(s) returned from http://127.0.0.1:"));
    assert!(html.contains("/api/Task"));
}

// --- details / not found ---

#[tokio::test]
async fn details_of_missing_task_is_404() {
    let resp = router(Arc::new(FakeTasks::seeded()))
        .oneshot(get("/tasks/99"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_text(resp).await.contains("Task 99 does not exist."));
}

#[tokio::test]
async fn edit_form_is_prefilled() {
    let resp = router(Arc::new(FakeTasks::seeded()))
        .oneshot(get("/tasks/2/edit"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains(r#"value="B""#));
    assert!(html.contains(" checked"));
}

// --- create ---

#[tokio::test]
async fn create_valid_task_redirects_with_success() {
    let fake = Arc::new(FakeTasks::seeded());
    let resp = router(fake.clone())
        .oneshot(post_form("/tasks", "title=Buy+milk&description=&is_completed=true"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(location(&resp).starts_with("/tasks?success="));

    let created = fake.snapshot(3).unwrap();
    assert_eq!(created.title.as_deref(), Some("Buy milk"));
    assert!(created.description.is_none());
    assert!(created.is_completed);
}

#[tokio::test]
async fn create_with_blank_title_rerenders_form() {
    let fake = Arc::new(FakeTasks::seeded());
    let resp = router(fake.clone())
        .oneshot(post_form("/tasks", "title=+++&description=x"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(resp).await.contains("Title is required."));
    assert!(fake.snapshot(3).is_none());
}

#[tokio::test]
async fn create_failure_shows_retry_message() {
    let resp = router(Arc::new(FakeTasks::failing_writes()))
        .oneshot(post_form("/tasks", "title=Lost"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let html = body_text(resp).await;
    assert!(html.contains("Could not create the task. Please try again."));
    assert!(html.contains(r#"value="Lost""#));
}

// --- edit ---

#[tokio::test]
async fn edit_with_mismatched_id_is_404() {
    let fake = Arc::new(FakeTasks::seeded());
    let resp = router(fake.clone())
        .oneshot(post_form("/tasks/1/edit", "id=2&title=Hijack"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(fake.snapshot(2).unwrap().title.as_deref(), Some("B"));
}

#[tokio::test]
async fn edit_replaces_task() {
    let fake = Arc::new(FakeTasks::seeded());
    let resp = router(fake.clone())
        .oneshot(post_form("/tasks/1/edit", "id=1&title=A2&description=more"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let updated = fake.snapshot(1).unwrap();
    assert_eq!(updated.title.as_deref(), Some("A2"));
    assert_eq!(updated.description.as_deref(), Some("more"));
    assert!(!updated.is_completed);
}

#[tokio::test]
async fn edit_failure_rerenders_with_error() {
    let resp = router(Arc::new(FakeTasks::failing_writes()))
        .oneshot(post_form("/tasks/1/edit", "id=1&title=A2"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert!(body_text(resp)
        .await
        .contains("Could not update the task. Please try again."));
}

// --- toggle ---

#[tokio::test]
async fn toggle_flips_completion() {
    let fake = Arc::new(FakeTasks::seeded());
    let resp = router(fake.clone())
        .oneshot(post_form("/tasks/1/toggle", ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&resp),
        format!("/tasks?success={}", urlencoding::encode("Task marked as completed."))
    );
    assert!(fake.snapshot(1).unwrap().is_completed);
}

#[tokio::test]
async fn toggle_missing_task_sets_error() {
    let resp = router(Arc::new(FakeTasks::seeded()))
        .oneshot(post_form("/tasks/99/toggle", ""))
        .await
        .unwrap();
    assert!(location(&resp).starts_with("/tasks?error="));
}

// --- delete ---

#[tokio::test]
async fn delete_confirmation_and_removal() {
    let fake = Arc::new(FakeTasks::seeded());
    let resp = router(fake.clone()).oneshot(get("/tasks/2/delete")).await.unwrap();
    assert!(body_text(resp).await.contains("Are you sure you want to delete <strong>B</strong>?"));

    let resp = router(fake.clone())
        .oneshot(post_form("/tasks/2/delete", ""))
        .await
        .unwrap();
    assert!(location(&resp).starts_with("/tasks?success="));
    assert!(fake.snapshot(2).is_none());

    let resp = router(fake).oneshot(post_form("/tasks/2/delete", "")).await.unwrap();
    assert!(location(&resp).starts_with("/tasks?error="));
}

// --- diagnostics ---

#[tokio::test]
async fn diagnostics_reports_both_probes() {
    let resp = router(Arc::new(FakeTasks::seeded()))
        .oneshot(get("/diagnostics"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let report: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();

    let tests = report["tests"].as_array().unwrap();
    assert_eq!(tests.len(), 2);
    assert_eq!(tests[0]["test"], "direct transport");
    assert_eq!(tests[0]["success"], false);
    assert!(tests[0]["error"].is_string());
    assert_eq!(tests[1]["taskCount"], 2);
    assert_eq!(tests[1]["tasks"][0]["isCompleted"], false);
    assert!(report["timestamp"].is_string());
}
