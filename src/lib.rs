//! cifix - CI failure triage with an LLM in the loop
//!
//! Turns raw CI log output into structured failure signals, then either asks a
//! reasoning backend to diagnose them or builds a deduplicated, priority-ordered
//! remediation plan of repository commands and asks the backend to refine it.
//!
//! # Core Concepts
//!
//! - **Indicators**: named line patterns (`pytest_failures`, `ts_errors`, ...)
//!   checked in a fixed order; the first match classifies a line
//! - **Failure blocks**: windows of context captured around matching lines
//! - **Fix plan**: catalogue steps keyed by indicator, merged by command and
//!   ordered by priority
//! - **Reasoning threads**: multi-turn conversations with an LLM that can be
//!   resumed by id
//!
//! # Example Usage
//!
//! ```no_run
//! use cifix::ci;
//! use cifix::plan::{build_plan, format_plan};
//!
//! let log = std::fs::read_to_string("job.log").unwrap();
//! let result = ci::parse(&log, "job.log", 8, 6);
//! let plan = build_plan(&result, "local-run");
//! println!("{}", format_plan(&plan));
//! ```
//!
//! # Project Structure
//!
//! - [`ci`]: log parsing, indicator table and CI summaries
//! - [`plan`]: remediation catalogue, plan builder and formatters
//! - [`llm`]: reasoning client abstraction, genai backend and mock
//! - [`orchestrator`]: diagnose and fix-plan run protocol
//! - [`output`]: persisted run output

pub mod ci;
pub mod cli;
pub mod config;
pub mod llm;
pub mod orchestrator;
pub mod output;
pub mod plan;
pub mod util;

pub use ci::{parse, FailureBlock, IndicatorTable, ParseResult};
pub use config::{CifixConfig, ConfigError};
pub use llm::{
    GenAIReasoningClient, MockReasoningClient, ReasoningClient, ReasoningError, ReasoningThread,
};
pub use orchestrator::{Mode, Options, OptionsInput, Orchestrator, RunError, ValidationError};
pub use output::{RunOutput, RunRecord};
pub use plan::{build_plan, FixPlan, RemediationStep};
pub use util::{init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_cifix() {
        assert_eq!(NAME, "cifix");
    }
}
