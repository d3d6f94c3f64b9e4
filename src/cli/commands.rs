use crate::orchestrator::{Mode, OptionsInput, DEFAULT_CI_CONTEXT_LINES, DEFAULT_CI_MAX_BLOCKS};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Turns CI failure logs into a prioritized fix plan with an LLM in the loop
#[derive(Parser, Debug, Clone)]
#[command(
    name = "cifix",
    about = "Turns CI failure logs into a prioritized fix plan with an LLM in the loop",
    version,
    long_about = "cifix parses raw CI log output into failure signals and either asks a \
                  reasoning backend to diagnose them (diagnose mode) or builds a deduplicated, \
                  priority-ordered list of repository commands and asks the backend to refine \
                  it (fix-plan mode). The full run is written to a JSON file.\n\n\
                  Examples:\n  \
                  cifix --prompt \"Why did the build fail?\" --ci-log job.log\n  \
                  cifix --mode fix-plan --ci-log job.log --out output/plan.json\n  \
                  cifix --prompt \"Continue\" --threadId 3f2a6c1e-..."
)]
pub struct CliArgs {
    #[arg(long, value_enum, default_value = "diagnose", help = "Run mode")]
    pub mode: ModeArg,

    #[arg(
        long,
        value_name = "TEXT",
        help = "Prompt for the reasoning backend (required in diagnose mode)"
    )]
    pub prompt: Option<String>,

    #[arg(
        long,
        value_name = "TEXT",
        help = "Second prompt run on the same thread after the first completes"
    )]
    pub followup: Option<String>,

    #[arg(
        long = "threadId",
        value_name = "ID",
        help = "Resume an existing reasoning thread instead of starting a new one"
    )]
    pub thread_id: Option<String>,

    #[arg(
        long,
        value_name = "FILE",
        help = "Where to write the run output (defaults to output/run-<timestamp>.json)"
    )]
    pub out: Option<PathBuf>,

    #[arg(
        long = "ci-log",
        value_name = "FILE",
        help = "CI log to analyze (required in fix-plan mode)"
    )]
    pub ci_log: Option<PathBuf>,

    #[arg(
        long = "ci-context",
        value_name = "LINES",
        default_value_t = DEFAULT_CI_CONTEXT_LINES,
        allow_negative_numbers = true,
        help = "Context lines captured before and after each failure"
    )]
    pub ci_context: i64,

    #[arg(
        long = "ci-max-blocks",
        value_name = "N",
        default_value_t = DEFAULT_CI_MAX_BLOCKS,
        allow_negative_numbers = true,
        help = "Maximum number of failure blocks captured"
    )]
    pub ci_max_blocks: i64,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    Diagnose,
    FixPlan,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Diagnose => Mode::Diagnose,
            ModeArg::FixPlan => Mode::FixPlan,
        }
    }
}

impl From<CliArgs> for OptionsInput {
    fn from(args: CliArgs) -> Self {
        OptionsInput {
            mode: args.mode.into(),
            prompt: args.prompt,
            followup: args.followup,
            thread_id: args.thread_id,
            out_path: args.out,
            ci_log_path: args.ci_log,
            ci_context_lines: args.ci_context,
            ci_max_blocks: args.ci_max_blocks,
        }
    }
}
