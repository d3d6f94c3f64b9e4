//! Fix plan construction
//!
//! Maps each detected indicator to its catalogue entries in first-seen order.
//! Steps are keyed by command in a single ordered map: a command proposed by
//! several indicators becomes one step whose triggers are the union, keeping
//! the title, rationale and priority of the first indicator that proposed it.

use super::catalogue::{self, CatalogueEntry, FALLBACK_TRIGGER};
use crate::ci::ParseResult;
use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemediationStep {
    pub title: String,
    pub command: String,
    pub rationale: String,
    pub triggers: IndexSet<String>,
    /// Lower runs earlier
    pub priority: u32,
}

impl RemediationStep {
    fn from_entry(entry: &CatalogueEntry, trigger: &str) -> Self {
        let mut triggers = IndexSet::new();
        triggers.insert(trigger.to_string());
        Self {
            title: entry.title.to_string(),
            command: entry.command.to_string(),
            rationale: entry.rationale.to_string(),
            triggers,
            priority: entry.priority,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixPlan {
    pub correlation_id: String,
    pub timestamp: DateTime<Utc>,
    pub ci_summary: String,
    pub steps: Vec<RemediationStep>,
    pub unmapped_indicators: Vec<String>,
}

impl FixPlan {
    pub fn is_fallback(&self) -> bool {
        self.steps
            .iter()
            .all(|step| step.triggers.len() == 1 && step.triggers.contains(FALLBACK_TRIGGER))
    }
}

/// Builds the remediation plan for a parsed log
pub fn build_plan(result: &ParseResult, correlation_id: &str) -> FixPlan {
    build_plan_at(result, correlation_id, Utc::now())
}

pub fn build_plan_at(result: &ParseResult, correlation_id: &str, timestamp: DateTime<Utc>) -> FixPlan {
    let mut by_command: IndexMap<&'static str, RemediationStep> = IndexMap::new();
    let mut unmapped_indicators = Vec::new();

    for indicator in result.indicators.keys() {
        let Some(entries) = catalogue::entries_for(indicator) else {
            unmapped_indicators.push(indicator.clone());
            continue;
        };

        for entry in entries {
            by_command
                .entry(entry.command)
                .and_modify(|step| {
                    step.triggers.insert(indicator.clone());
                })
                .or_insert_with(|| RemediationStep::from_entry(entry, indicator));
        }
    }

    let mut steps: Vec<RemediationStep> = if by_command.is_empty() {
        catalogue::fallback_entries()
            .iter()
            .map(|entry| RemediationStep::from_entry(entry, FALLBACK_TRIGGER))
            .collect()
    } else {
        by_command.into_values().collect()
    };

    // stable: ties keep first-seen order
    steps.sort_by_key(|step| step.priority);

    FixPlan {
        correlation_id: correlation_id.to_string(),
        timestamp,
        ci_summary: result.summary.clone(),
        steps,
        unmapped_indicators,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ci::parse;
    use std::collections::HashSet;

    fn commands(plan: &FixPlan) -> Vec<&str> {
        plan.steps.iter().map(|s| s.command.as_str()).collect()
    }

    #[test]
    fn test_gha_and_npm_plan() {
        let mut log = vec!["##[error] lint failed".to_string()];
        log.extend((0..49).map(|i| format!("line {}", i)));
        log.push("npm ERR! missing dependency".to_string());
        let result = parse(&log.join("\n"), "ci.log", 8, 6);

        let plan = build_plan(&result, "corr-1");

        let priorities: Vec<_> = plan.steps.iter().map(|s| s.priority).collect();
        assert_eq!(priorities, vec![5, 6, 8, 9]);
        assert_eq!(
            commands(&plan),
            vec!["npm run lint", "npm run lint -- --fix", "npm ci", "npm run build"]
        );
        assert!(plan.unmapped_indicators.is_empty());
        assert_eq!(plan.correlation_id, "corr-1");
        assert_eq!(plan.ci_summary, result.summary);
        assert!(!plan.is_fallback());
    }

    #[test]
    fn test_empty_indicators_yield_fallback() {
        let result = parse("nothing to see", "ok.log", 8, 6);
        let plan = build_plan(&result, "corr");

        assert_eq!(plan.steps.len(), 3);
        let priorities: Vec<_> = plan.steps.iter().map(|s| s.priority).collect();
        assert_eq!(priorities, vec![1, 2, 3]);
        for step in &plan.steps {
            assert_eq!(step.triggers.iter().collect::<Vec<_>>(), vec!["fallback"]);
        }
        assert!(plan.is_fallback());
        assert!(plan.unmapped_indicators.is_empty());
    }

    #[test]
    fn test_only_unmapped_indicators_yield_fallback() {
        let result = parse(
            "Error: boom\nProcess completed with exit code 1.",
            "x.log",
            1,
            6,
        );
        let plan = build_plan(&result, "corr");

        assert!(plan.is_fallback());
        assert_eq!(plan.unmapped_indicators, vec!["generic_error", "exit_code"]);
    }

    #[test]
    fn test_shared_command_merges_triggers() {
        let result = parse(
            "##[error] lint failed\n✖ 3 problems (3 errors, 0 warnings)",
            "x.log",
            1,
            6,
        );
        let plan = build_plan(&result, "corr");

        assert_eq!(commands(&plan), vec!["npm run lint", "npm run lint -- --fix"]);
        for step in &plan.steps {
            let triggers: Vec<_> = step.triggers.iter().map(String::as_str).collect();
            assert_eq!(triggers, vec!["gha_error", "eslint_errors"]);
        }
    }

    #[test]
    fn test_collision_keeps_first_seen_entry() {
        // npm ci appears for both module_not_found and npm_error
        let result = parse(
            "npm ERR! code ERESOLVE\nError: Cannot find module 'left-pad'",
            "x.log",
            1,
            6,
        );
        let plan = build_plan(&result, "corr");

        let npm_ci = plan.steps.iter().find(|s| s.command == "npm ci").unwrap();
        assert_eq!(npm_ci.priority, 8);
        assert_eq!(npm_ci.title, "Clean install dependencies");
        let triggers: Vec<_> = npm_ci.triggers.iter().map(String::as_str).collect();
        assert_eq!(triggers, vec!["npm_error", "module_not_found"]);
    }

    #[test]
    fn test_commands_unique_and_sorted() {
        let log = [
            "FAILED tests/test_a.py::test_x - assert 0",
            "Traceback (most recent call last):",
            "ModuleNotFoundError: No module named 'yaml'",
            "npm ERR! code 1",
            "src/a.ts(1,1): error TS2304: Cannot find name 'x'.",
            "FATAL ERROR: JavaScript heap out of memory",
            "##[error]Process completed with exit code 1.",
            "Process completed with exit code 1.",
        ]
        .join("\n");
        let result = parse(&log, "x.log", 2, 6);
        let plan = build_plan(&result, "corr");

        let unique: HashSet<_> = commands(&plan).into_iter().collect();
        assert_eq!(unique.len(), plan.steps.len());
        assert!(plan.steps.windows(2).all(|w| w[0].priority <= w[1].priority));
        assert_eq!(plan.unmapped_indicators, vec!["exit_code"]);
    }

    #[test]
    fn test_priority_ties_keep_insertion_order() {
        // mypy . and npm run typecheck both have priority 4
        let result = parse(
            "app/x.py:3: error: Name \"y\" is not defined  [name-defined]\nsrc/a.ts(1,1): error TS2304: nope",
            "x.log",
            1,
            6,
        );
        let plan = build_plan(&result, "corr");
        assert_eq!(commands(&plan), vec!["mypy .", "npm run typecheck"]);
    }

    #[test]
    fn test_build_is_deterministic() {
        let result = parse("npm ERR! a\n##[error] b", "x.log", 1, 6);
        let at = Utc::now();
        assert_eq!(
            build_plan_at(&result, "corr", at),
            build_plan_at(&result, "corr", at)
        );
    }
}
