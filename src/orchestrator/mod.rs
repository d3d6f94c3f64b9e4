//! Two-mode run protocol
//!
//! - **diagnose**: optionally parse a CI log and put its summary ahead of the
//!   caller's prompt, then run the prompt (and an optional followup) on a
//!   reasoning thread.
//! - **fix-plan**: parse the CI log, build and print a remediation plan, then
//!   ask the reasoning thread to refine it.
//!
//! Both modes produce a [`RunOutput`]. Execution is strictly sequential: the
//! CI log is read first, the primary run always completes before the followup
//! starts, and nothing is retried.

mod error;
mod options;

pub use error::RunError;
pub use options::{
    Mode, Options, OptionsInput, ValidationError, DEFAULT_CI_CONTEXT_LINES, DEFAULT_CI_MAX_BLOCKS,
    DEFAULT_FIX_PLAN_PROMPT,
};

use crate::ci::{self, compose_diagnose_prompt, ParseResult};
use crate::llm::{ReasoningClient, ReasoningThread};
use crate::output::{RunOutput, RunRecord};
use crate::plan::{build_plan, build_prompt, format_plan, FixPlan};
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

pub struct Orchestrator {
    client: Arc<dyn ReasoningClient>,
    correlation_id: String,
    print_plan: bool,
}

impl Orchestrator {
    pub fn new(client: Arc<dyn ReasoningClient>, correlation_id: impl Into<String>) -> Self {
        Self {
            client,
            correlation_id: correlation_id.into(),
            print_plan: true,
        }
    }

    /// Disables printing the fix plan to stdout in fix-plan mode
    pub fn without_plan_output(mut self) -> Self {
        self.print_plan = false;
        self
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub async fn run(&self, options: &Options) -> Result<RunOutput, RunError> {
        info!(
            correlation_id = %self.correlation_id,
            mode = %options.mode,
            backend = self.client.name(),
            model = %self.client.model_info().unwrap_or_default(),
            "Starting run"
        );

        match options.mode {
            Mode::Diagnose => self.diagnose(options).await,
            Mode::FixPlan => self.fix_plan(options).await,
        }
    }

    async fn diagnose(&self, options: &Options) -> Result<RunOutput, RunError> {
        let ci = match &options.ci_log_path {
            Some(path) => Some(self.load_ci_log(path, options).await?),
            None => None,
        };

        let prompt = compose_diagnose_prompt(&options.prompt, ci.as_ref());
        let (thread_id, runs) = self.converse(options, prompt).await?;

        Ok(RunOutput {
            thread_id: Some(thread_id),
            ci,
            fix_plan: None,
            runs,
        })
    }

    async fn fix_plan(&self, options: &Options) -> Result<RunOutput, RunError> {
        let path = options
            .ci_log_path
            .as_deref()
            .ok_or(ValidationError::MissingCiLog)?;
        let ci = self.load_ci_log(path, options).await?;
        let plan = self.build_fix_plan(&ci);

        if self.print_plan {
            println!("{}", format_plan(&plan));
        }

        let prompt = format!("{}\n\n{}", options.prompt, build_prompt(&ci, &plan));
        let (thread_id, runs) = self.converse(options, prompt).await?;

        Ok(RunOutput {
            thread_id: Some(thread_id),
            ci: Some(ci),
            fix_plan: Some(plan),
            runs,
        })
    }

    async fn load_ci_log(&self, path: &Path, options: &Options) -> Result<ParseResult, RunError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| RunError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let result = ci::parse(
            &text,
            &path.display().to_string(),
            options.ci_context_lines,
            options.ci_max_blocks,
        );

        info!(
            correlation_id = %self.correlation_id,
            source = %result.source_path,
            signals = result.signals.len(),
            blocks = result.blocks.len(),
            blocks_truncated = result.blocks_truncated,
            "Parsed CI log"
        );
        Ok(result)
    }

    fn build_fix_plan(&self, ci: &ParseResult) -> FixPlan {
        let plan = build_plan(ci, &self.correlation_id);
        info!(
            correlation_id = %self.correlation_id,
            steps = plan.steps.len(),
            unmapped = plan.unmapped_indicators.len(),
            fallback = plan.is_fallback(),
            "Built fix plan"
        );
        plan
    }

    /// Runs the composed prompt, then the followup if any, on one thread
    async fn converse(
        &self,
        options: &Options,
        prompt: String,
    ) -> Result<(String, Vec<RunRecord>), RunError> {
        let mut thread = self.open_thread(options.thread_id.as_deref()).await?;

        let mut runs = vec![
            self.run_turn(thread.as_mut(), Some(options.prompt.clone()), prompt)
                .await?,
        ];
        if let Some(followup) = &options.followup {
            runs.push(self.run_turn(thread.as_mut(), None, followup.clone()).await?);
        }

        Ok((thread.id().to_string(), runs))
    }

    async fn open_thread(
        &self,
        thread_id: Option<&str>,
    ) -> Result<Box<dyn ReasoningThread>, RunError> {
        let thread = match thread_id {
            Some(id) => {
                info!(correlation_id = %self.correlation_id, thread_id = id, "Resuming thread");
                self.client.resume_thread(id).await?
            }
            None => {
                let thread = self.client.start_thread().await?;
                info!(
                    correlation_id = %self.correlation_id,
                    thread_id = thread.id(),
                    "Started thread"
                );
                thread
            }
        };
        Ok(thread)
    }

    async fn run_turn(
        &self,
        thread: &mut dyn ReasoningThread,
        base_prompt: Option<String>,
        prompt: String,
    ) -> Result<RunRecord, RunError> {
        debug!(
            correlation_id = %self.correlation_id,
            thread_id = thread.id(),
            prompt_chars = prompt.len(),
            "Running prompt"
        );

        let result = thread.run(&prompt).await?;

        info!(
            correlation_id = %self.correlation_id,
            thread_id = thread.id(),
            followup = base_prompt.is_none(),
            "Run completed"
        );

        Ok(RunRecord {
            base_prompt,
            prompt,
            result,
            timestamp: Utc::now(),
        })
    }
}
