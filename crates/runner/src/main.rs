//! `jobflow-runner` -- fill and submit a job application from a file.
//!
//! Fetches the workflow definition, starts an application session, feeds
//! the answers for each step through the form engine and submits the
//! final step. Exits non-zero when any step is refused.
//!
//! # Environment variables
//!
//! | Variable                         | Required | Default | Description                        |
//! |----------------------------------|----------|---------|------------------------------------|
//! | `JOBFLOW_ANSWERS_FILE`           | yes      | --      | JSON object of answers by field id |
//! | `JOBFLOW_API_URL`                | no       | `http://localhost:8080/api/job-applications` | API base URL |
//! | `JOBFLOW_REQUEST_TIMEOUT_SECS`   | no       | `30`    | Per-request timeout                |
//! | `JOBFLOW_REALTIME_VALIDATION`    | no       | `false` | Format hints on every change       |
//! | `JOBFLOW_CROSS_FIELD_VALIDATION` | no       | `false` | Cross-field rules before submit    |

use jobflow_client::{ApplicationApi, HttpApplicationApi};
use jobflow_engine::WorkflowManager;
use jobflow_runner::autofill::{self, Answers};
use jobflow_runner::config::RunnerConfig;
use jobflow_runner::surface::LogSurface;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jobflow_runner=info,jobflow_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RunnerConfig::from_env().unwrap_or_else(|e| {
        tracing::error!("{e}");
        std::process::exit(1);
    });

    let answers = Answers::load(&config.answers_file).unwrap_or_else(|e| {
        tracing::error!(path = %config.answers_file.display(), "{e}");
        std::process::exit(1);
    });

    let api = HttpApplicationApi::new(config.client_config()).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to build HTTP client");
        std::process::exit(1);
    });

    tracing::info!(
        api_url = %config.api_url,
        answers = answers.len(),
        realtime_validation = config.realtime_validation,
        cross_field_validation = config.cross_field_validation,
        "Starting jobflow-runner",
    );

    let mut manager = WorkflowManager::new(api, LogSurface::new(), config.engine_options());

    if manager.initialize().await.is_err() {
        std::process::exit(1);
    }

    if let Err(e) = autofill::drive(&mut manager, &answers).await {
        tracing::error!(error = %e, "Application was not submitted");
        tracing::debug!(surface = %manager.surface().state().snapshot(), "Final form state");
        std::process::exit(1);
    }

    let Some(id) = manager.application_id().cloned() else {
        return;
    };
    match manager.api().fetch_application(&id).await {
        Ok(status) => tracing::info!(
            application_id = %id,
            status = status.status.as_deref().unwrap_or("unknown"),
            "Application complete",
        ),
        Err(e) => tracing::warn!(application_id = %id, error = %e, "Could not fetch final status"),
    }
}
