use std::net::SocketAddr;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use task_core::{ApiSettings, DeploymentMode, TaskService};
use task_web::AppState;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about = "Web front end for the remote task API")]
struct Args {
    /// Root URL of the remote task API.
    #[arg(long, env = "API_BASE_URL")]
    api_base_url: Option<String>,

    /// `development` accepts self-signed certificates from the API.
    #[arg(long, env = "APP_ENVIRONMENT", default_value_t = DeploymentMode::Production)]
    environment: DeploymentMode,

    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:5000")]
    bind: SocketAddr,

    #[arg(long, env = "LOG_FORMAT", value_enum, ignore_case = true, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Json => tracing_subscriber::fmt().with_env_filter(filter).json().init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_format);
    info!(environment = %args.environment, "starting task web front end");

    let service = TaskService::new(&ApiSettings::new(args.api_base_url), args.environment)
        .context("failed to configure task API client")?;
    let app = task_web::app(AppState::from_service(service));

    let listener = TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;
    info!(addr = %args.bind, "listening");
    axum::serve(listener, app).await.context("server terminated")?;
    Ok(())
}
