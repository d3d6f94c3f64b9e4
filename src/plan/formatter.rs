//! Human-readable and prompt renderings of a fix plan

use super::builder::FixPlan;
use crate::ci::ParseResult;
use indexmap::IndexSet;
use std::fmt::Write;

/// Maximum number of signals embedded in a refinement prompt
pub const MAX_PROMPT_SIGNALS: usize = 15;

pub const UNMAPPED_HEADING: &str = "Unmapped indicators";

const BANNER: &str = "==================== CI FIX PLAN ====================";

fn join_triggers(triggers: &IndexSet<String>) -> String {
    triggers
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renders the plan for a terminal
pub fn format_plan(plan: &FixPlan) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", BANNER);
    let _ = writeln!(out, "Correlation ID: {}", plan.correlation_id);
    let _ = writeln!(out, "Generated: {}", plan.timestamp.to_rfc3339());
    let _ = writeln!(out, "CI summary: {}", plan.ci_summary);
    let _ = writeln!(out);

    for (i, step) in plan.steps.iter().enumerate() {
        let _ = writeln!(out, "{}. {} [priority {}]", i + 1, step.title, step.priority);
        let _ = writeln!(out, "   Triggers: {}", join_triggers(&step.triggers));
        let _ = writeln!(out, "   Why: {}", step.rationale);
        let _ = writeln!(out, "   $ {}", step.command);
    }

    if !plan.unmapped_indicators.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}:", UNMAPPED_HEADING);
        for indicator in &plan.unmapped_indicators {
            let _ = writeln!(out, "  - {}", indicator);
        }
        let _ = writeln!(
            out,
            "These have no catalogue remediation and need manual or reasoning-assisted investigation."
        );
    }

    out
}

/// Builds the prompt asking the reasoning service to validate and refine a plan
pub fn build_prompt(result: &ParseResult, plan: &FixPlan) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "You are reviewing a preliminary remediation plan derived from a failing CI log."
    );
    let _ = writeln!(
        out,
        "Validate each step against the evidence below, reorder or replace steps that do not \
         address the failure, and add any missing repository commands. Reply with the final \
         ordered list of commands and a one-line justification for each."
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "CI summary: {}", result.summary);

    if !result.signals.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Signals:");
        for signal in result.signals.iter().take(MAX_PROMPT_SIGNALS) {
            let _ = writeln!(out, "- {}", signal);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Preliminary steps:");
    for (i, step) in plan.steps.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {} (triggers: {}) -> `{}`",
            i + 1,
            step.title,
            join_triggers(&step.triggers),
            step.command
        );
    }

    if !plan.unmapped_indicators.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{} (no catalogue entry, investigate directly): {}",
            UNMAPPED_HEADING,
            plan.unmapped_indicators.join(", ")
        );
    }

    out.trim_end().to_string()
}
