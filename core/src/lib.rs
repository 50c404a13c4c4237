//! API client core for the remote task service.
//!
//! # Overview
//! Translates task intents (list, list completed, get, create, update,
//! delete) into HTTP calls against `/api/Task` and normalizes every outcome
//! into a small contract: reads and delete never fail, create and update
//! return `Result`.
//!
//! # Design
//! - `TaskClient` builds `HttpRequest` values and parses `HttpResponse`
//!   values without touching the network, so parsing is deterministic and
//!   testable with canned responses.
//! - `Transport` is the single reqwest-backed executor, configured once at
//!   startup (base address, `Accept` header, timeout, certificate policy).
//! - `TaskService` joins the two and applies the failure policy; callers
//!   depend on the `TaskApi` trait.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod service;
pub mod transport;
pub mod types;

pub use client::{TaskClient, TASKS_PATH};
pub use config::{ApiSettings, DeploymentMode, TransportConfig, DEFAULT_BASE_URL, REQUEST_TIMEOUT};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use service::{TaskApi, TaskService};
pub use transport::Transport;
pub use types::{CreateTask, Task, UpdateTask};
