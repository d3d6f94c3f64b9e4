//! CI log parser
//!
//! Turns raw log text into a [`ParseResult`]: per-indicator match counts, the
//! unique trimmed signal lines, and a bounded list of [`FailureBlock`]s with
//! surrounding context. Parsing never fails; a log without matches yields an
//! empty result.

use super::indicators::{group_marker, GroupMarker, IndicatorTable};
use indexmap::{IndexMap, IndexSet};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// One matched line plus its surrounding context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureBlock {
    pub indicator: String,
    /// 1-based line number of the matched line
    pub line: usize,
    pub group: Option<String>,
    pub context: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    pub source_path: String,
    pub summary: String,
    /// Match count per indicator, in first-seen order
    pub indicators: IndexMap<String, usize>,
    pub signals: Vec<String>,
    pub blocks: Vec<FailureBlock>,
    pub blocks_truncated: bool,
}

impl ParseResult {
    /// Total number of classified lines
    pub fn matched_lines(&self) -> usize {
        self.indicators.values().sum()
    }

    pub fn is_clean(&self) -> bool {
        self.indicators.is_empty()
    }
}

fn line_break_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\r\n|\r|\n").unwrap_or_else(|e| panic!("invalid line break pattern: {}", e))
    })
}

/// Parses `log` with the built-in indicator table.
///
/// `context_lines` and `max_blocks` are expected to be validated (positive)
/// by the caller.
pub fn parse(log: &str, source_path: &str, context_lines: usize, max_blocks: usize) -> ParseResult {
    parse_with_table(
        IndicatorTable::builtin(),
        log,
        source_path,
        context_lines,
        max_blocks,
    )
}

pub fn parse_with_table(
    table: &IndicatorTable,
    log: &str,
    source_path: &str,
    context_lines: usize,
    max_blocks: usize,
) -> ParseResult {
    let lines: Vec<&str> = line_break_regex().split(log).collect();

    let mut current_group: Option<String> = None;
    let mut indicators: IndexMap<String, usize> = IndexMap::new();
    let mut signals: IndexSet<String> = IndexSet::new();
    let mut blocks = Vec::new();
    let mut blocks_truncated = false;

    for (i, line) in lines.iter().enumerate() {
        match group_marker(line) {
            Some(GroupMarker::Start(label)) => {
                current_group = label;
                continue;
            }
            Some(GroupMarker::End) => {
                current_group = None;
                continue;
            }
            None => {}
        }

        let Some(name) = table.classify(line) else {
            continue;
        };

        *indicators.entry(name.to_string()).or_insert(0) += 1;
        signals.insert(line.trim().to_string());

        if blocks.len() < max_blocks {
            let start = i.saturating_sub(context_lines);
            let end = (i + context_lines + 1).min(lines.len());
            blocks.push(FailureBlock {
                indicator: name.to_string(),
                line: i + 1,
                group: current_group.clone(),
                context: lines[start..end].iter().map(|l| l.to_string()).collect(),
            });
        } else {
            blocks_truncated = true;
        }
    }

    let signals: Vec<String> = signals.into_iter().collect();
    let summary = summarize(&indicators, signals.len(), blocks.len(), blocks_truncated);

    ParseResult {
        source_path: source_path.to_string(),
        summary,
        indicators,
        signals,
        blocks,
        blocks_truncated,
    }
}

fn summarize(
    indicators: &IndexMap<String, usize>,
    signal_count: usize,
    block_count: usize,
    truncated: bool,
) -> String {
    let listing = if indicators.is_empty() {
        "none".to_string()
    } else {
        indicators
            .iter()
            .map(|(name, count)| format!("{}: {}", name, count))
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "Detected {} unique signal(s); captured {} failure block(s){}. Indicators: {}.",
        signal_count,
        block_count,
        if truncated { " (truncated)" } else { "" },
        listing
    )
}
