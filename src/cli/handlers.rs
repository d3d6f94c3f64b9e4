use super::commands::CliArgs;
use crate::config::CifixConfig;
use crate::llm::{GenAIReasoningClient, ReasoningClient, TranscriptStore};
use crate::orchestrator::{Orchestrator, OptionsInput, RunError};
use crate::output::{default_output_path, write_run_output};
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// Runs one invocation with the genai-backed reasoning client.
///
/// Returns the process exit code: 0 once the run output is written, 1 on any
/// configuration, validation, I/O or reasoning failure.
pub async fn handle_run(args: CliArgs, correlation_id: &str) -> i32 {
    match run_with_genai(args, correlation_id).await {
        Ok(path) => {
            info!(
                correlation_id = %correlation_id,
                path = %path.display(),
                "Run output written"
            );
            0
        }
        Err(err) => report_failure(&err, correlation_id),
    }
}

async fn run_with_genai(args: CliArgs, correlation_id: &str) -> Result<PathBuf, RunError> {
    let config = CifixConfig::from_env()?;
    let client = GenAIReasoningClient::new(
        config.provider,
        config.model.clone(),
        config.request_timeout(),
        config.api_base_url.clone(),
        TranscriptStore::new(&config.thread_dir),
        correlation_id,
    );
    execute(args, Arc::new(client), correlation_id).await
}

/// Validates options, runs the orchestrator and persists the output
pub async fn execute(
    args: CliArgs,
    client: Arc<dyn ReasoningClient>,
    correlation_id: &str,
) -> Result<PathBuf, RunError> {
    let options = OptionsInput::from(args).validate()?;
    let orchestrator = Orchestrator::new(client, correlation_id);
    let output = orchestrator.run(&options).await?;

    let path = options
        .out_path
        .clone()
        .unwrap_or_else(|| default_output_path(Utc::now()));
    write_run_output(&path, &output)
        .await
        .map_err(|source| RunError::Output {
            path: path.clone(),
            source,
        })?;

    Ok(path)
}

/// Logs `err` as a single error event and returns the failure exit code
pub fn report_failure(err: &RunError, correlation_id: &str) -> i32 {
    error!(
        correlation_id = %correlation_id,
        error_kind = err.kind(),
        "{}",
        err
    );
    1
}
