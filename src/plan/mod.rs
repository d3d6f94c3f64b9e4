//! Remediation planning: catalogue lookup, plan building and rendering

pub mod builder;
pub mod catalogue;
pub mod formatter;

pub use builder::{build_plan, build_plan_at, FixPlan, RemediationStep};
pub use catalogue::{entries_for, fallback_entries, CatalogueEntry, FALLBACK_TRIGGER};
pub use formatter::{build_prompt, format_plan};
