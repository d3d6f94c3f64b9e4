//! Markdown rendering of a parse result for free-form diagnosis prompts

use super::parser::ParseResult;
use std::fmt::Write;

/// Maximum number of signals listed in a rendered summary
pub const MAX_SUMMARY_SIGNALS: usize = 15;

pub const SUMMARY_HEADING: &str = "## CI Failure Summary";

/// Renders the "CI Failure Summary" section placed ahead of a diagnose prompt
pub fn render_ci_summary(result: &ParseResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", SUMMARY_HEADING);
    let _ = writeln!(out, "Source: {}", result.source_path);
    let _ = writeln!(out, "{}", result.summary);

    if !result.signals.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "### Signals");
        for signal in result.signals.iter().take(MAX_SUMMARY_SIGNALS) {
            let _ = writeln!(out, "- {}", signal);
        }
        if result.signals.len() > MAX_SUMMARY_SIGNALS {
            let _ = writeln!(
                out,
                "- ... {} more",
                result.signals.len() - MAX_SUMMARY_SIGNALS
            );
        }
    }

    for block in &result.blocks {
        let _ = writeln!(out);
        match &block.group {
            Some(group) => {
                let _ = writeln!(
                    out,
                    "### {} at line {} (group: {})",
                    block.indicator, block.line, group
                );
            }
            None => {
                let _ = writeln!(out, "### {} at line {}", block.indicator, block.line);
            }
        }
        let _ = writeln!(out, "```");
        for line in &block.context {
            let _ = writeln!(out, "{}", line);
        }
        let _ = writeln!(out, "```");
    }

    if result.blocks_truncated {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Additional failure blocks were omitted; increase --ci-max-blocks to see more."
        );
    }

    out.trim_end().to_string()
}

/// Places the CI summary section ahead of the caller's prompt
pub fn compose_diagnose_prompt(base_prompt: &str, result: Option<&ParseResult>) -> String {
    match result {
        Some(result) => format!("{}\n\n## Task\n{}", render_ci_summary(result), base_prompt),
        None => base_prompt.to_string(),
    }
}
