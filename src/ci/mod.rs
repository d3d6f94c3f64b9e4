//! CI log analysis: line classification, parsing and summary rendering

pub mod indicators;
pub mod parser;
pub mod summary;

pub use indicators::{group_marker, GroupMarker, IndicatorRule, IndicatorTable};
pub use parser::{parse, parse_with_table, FailureBlock, ParseResult};
pub use summary::{compose_diagnose_prompt, render_ci_summary};
