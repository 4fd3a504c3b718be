//! TestGenie diagnostic tool.
//!
//! `--health-check` probes the backend and exits 0 or 1. Without flags the
//! project list is printed together with where it came from.

use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};

use testgenie_lib::config::Config;
use testgenie_lib::services::Workspace;
use testgenie_lib::store::MemoryStore;
use testgenie_lib::telemetry;

/// Probe the backend health endpoint.
async fn health_check(config: Config) -> bool {
    let workspace = match Workspace::with_backend(config, Arc::new(MemoryStore::new())) {
        Ok(workspace) => workspace,
        Err(e) => {
            error!("Failed to build API client: {}", e);
            return false;
        }
    };
    match workspace.health().await {
        Ok(health) if health.is_ok() => {
            info!("Backend healthy: {}", health.message);
            true
        }
        Ok(health) => {
            error!("Backend reported status '{}'", health.status);
            false
        }
        Err(e) => {
            error!("Backend unreachable: {}", e);
            false
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    if let Err(e) = telemetry::init_tracing() {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ExitCode::FAILURE;
    }

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be 'development' or 'production'");
            error!("  - TESTGENIE_API_URL must be an http(s) URL");
            error!("  - In production, TESTGENIE_API_URL must not be the development default");
            return ExitCode::FAILURE;
        }
    };

    // Check for --health-check flag (used by container HEALTHCHECK)
    if std::env::args().any(|arg| arg == "--health-check") {
        return if health_check(config).await {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    let workspace = match Workspace::open(config).await {
        Ok(workspace) => workspace,
        Err(e) => {
            error!("Failed to open workspace: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let projects = workspace.projects.list().await;
    println!("Projects ({}):", projects.source);
    for project in &projects.value {
        println!(
            "  [{}] {} - {} {} (status: {}, last run: {})",
            project.id,
            project.name,
            project.application_name,
            project.version,
            project.status,
            project.last_run_label()
        );
    }
    if projects.value.is_empty() {
        println!("  (none)");
    }

    ExitCode::SUCCESS
}
