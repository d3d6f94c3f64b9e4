//! Indicator table used to classify individual CI log lines
//!
//! Rules are evaluated top to bottom and the first matching rule wins. Two rules
//! can match the same line (a `##[error]` line usually also contains the word
//! "error"), so table position is the priority: specific tool signatures come
//! first, the catch-all `generic_error` rule comes last.

use regex::Regex;
use std::sync::OnceLock;

/// A named pattern that classifies a single log line
#[derive(Debug, Clone)]
pub struct IndicatorRule {
    pub name: &'static str,
    pub pattern: Regex,
}

impl IndicatorRule {
    /// Builds a rule, panicking on an invalid pattern.
    ///
    /// Only used for the built-in table whose patterns are compile-time constants
    /// and covered by tests.
    fn builtin(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).unwrap_or_else(|e| {
                panic!("invalid built-in indicator pattern for {}: {}", name, e)
            }),
        }
    }

    pub fn new(name: &'static str, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn matches(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }
}

/// Ordered list of indicator rules
#[derive(Debug, Clone)]
pub struct IndicatorTable {
    rules: Vec<IndicatorRule>,
}

const BUILTIN_RULES: &[(&str, &str)] = &[
    (
        "pytest_failures",
        r"(?:^|\s)(?:FAILED|ERROR)\s+\S+\.py::\S+|={3,}.*\b\d+ failed\b",
    ),
    ("jest_failures", r"●\s+.+\s›\s|Tests:\s+\d+ failed"),
    ("ts_errors", r"\berror TS\d{4,5}:"),
    ("mypy_errors", r"\.pyi?:\d+:(?:\d+:)?\s+error:"),
    (
        "eslint_errors",
        r"✖\s+\d+\s+problems?|\d+\s+problems?\s+\(\d+\s+errors?",
    ),
    (
        "module_not_found",
        r"ModuleNotFoundError|ImportError:|Cannot find module|Module not found",
    ),
    ("npm_error", r"npm ERR!|\bnpm error\b"),
    ("python_traceback", r"Traceback \(most recent call last\)"),
    (
        "out_of_memory",
        r"(?i)heap out of memory|\bout of memory\b|\bMemoryError\b|\bOOMKilled\b",
    ),
    (
        "timeout",
        r"(?i)\btimed out\b|exceeded the maximum execution time|\btimeout of \d+ms exceeded",
    ),
    (
        "docker_errors",
        r"(?i)failed to solve|error response from daemon",
    ),
    ("gha_error", r"##\[error\]|(?:^|\s)::error(?:\s|::)"),
    ("exit_code", r"Process completed with exit code [1-9]\d*"),
    ("generic_error", r"\b(?:error|ERROR|Error)\b"),
];

impl IndicatorTable {
    pub fn new(rules: Vec<IndicatorRule>) -> Self {
        Self { rules }
    }

    /// The built-in table, compiled once per process
    pub fn builtin() -> &'static IndicatorTable {
        static TABLE: OnceLock<IndicatorTable> = OnceLock::new();
        TABLE.get_or_init(|| {
            IndicatorTable::new(
                BUILTIN_RULES
                    .iter()
                    .map(|(name, pattern)| IndicatorRule::builtin(name, pattern))
                    .collect(),
            )
        })
    }

    /// Returns the name of the first rule matching `line`
    pub fn classify(&self, line: &str) -> Option<&'static str> {
        self.rules
            .iter()
            .find(|rule| rule.matches(line))
            .map(|rule| rule.name)
    }

    pub fn rules(&self) -> &[IndicatorRule] {
        &self.rules
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|rule| rule.name)
    }
}

/// A log-folding marker emitted by the CI runner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupMarker {
    /// Opens a group; `None` when the label is empty
    Start(Option<String>),
    End,
}

fn group_start_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(?:\d{4}-\d{2}-\d{2}T\S+\s+)?(?:##\[group\]|::group::)(.*)$")
            .unwrap_or_else(|e| panic!("invalid group start pattern: {}", e))
    })
}

fn group_end_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(?:\d{4}-\d{2}-\d{2}T\S+\s+)?(?:##\[endgroup\]|::endgroup::)")
            .unwrap_or_else(|e| panic!("invalid group end pattern: {}", e))
    })
}

/// Recognizes `##[group]` / `::group::` and their closing markers
pub fn group_marker(line: &str) -> Option<GroupMarker> {
    if let Some(caps) = group_start_regex().captures(line) {
        let label = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
        let label = (!label.is_empty()).then(|| label.to_string());
        return Some(GroupMarker::Start(label));
    }
    if group_end_regex().is_match(line) {
        return Some(GroupMarker::End);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        pytest_failed = { "FAILED tests/test_api.py::test_login - AssertionError", "pytest_failures" },
        pytest_summary = { "==== 3 failed, 12 passed in 4.21s ====", "pytest_failures" },
        jest_header = { "  ● LoginForm › submits credentials", "jest_failures" },
        jest_summary = { "Tests:       2 failed, 40 passed, 42 total", "jest_failures" },
        tsc = { "src/app.ts(12,5): error TS2322: Type 'string' is not assignable", "ts_errors" },
        mypy = { "app/models.py:41: error: Incompatible return value [return-value]", "mypy_errors" },
        eslint = { "✖ 4 problems (4 errors, 0 warnings)", "eslint_errors" },
        module = { "ModuleNotFoundError: No module named 'requests'", "module_not_found" },
        npm = { "npm ERR! missing dependency", "npm_error" },
        traceback = { "Traceback (most recent call last):", "python_traceback" },
        oom = { "FATAL ERROR: Reached heap limit Allocation failed - JavaScript heap out of memory", "out_of_memory" },
        timeout = { "The job running on runner GitHub Actions 2 has exceeded the maximum execution time of 360 minutes.", "timeout" },
        docker = { "ERROR: failed to solve: process \"/bin/sh -c npm ci\" did not complete", "docker_errors" },
        gha = { "##[error] lint failed", "gha_error" },
        gha_command = { "::error file=app.js,line=1::Missing semicolon", "gha_error" },
        exit = { "Process completed with exit code 2.", "exit_code" },
        generic = { "Error: something broke", "generic_error" },
    )]
    fn test_builtin_classification(line: &str, expected: &str) {
        assert_eq!(IndicatorTable::builtin().classify(line), Some(expected));
    }

    #[test]
    fn test_non_matching_lines() {
        let table = IndicatorTable::builtin();
        assert_eq!(table.classify("Run actions/checkout@v4"), None);
        assert_eq!(table.classify("added 512 packages in 9s"), None);
        assert_eq!(table.classify("12 passed in 3.02s"), None);
        assert_eq!(table.classify(""), None);
    }

    #[test]
    fn test_first_match_wins_by_table_order() {
        // matches both gha_error and generic_error
        let line = "##[error]Process completed with exit code 1.";
        assert_eq!(IndicatorTable::builtin().classify(line), Some("gha_error"));

        let table = IndicatorTable::new(vec![
            IndicatorRule::new("broad", r"fail").unwrap(),
            IndicatorRule::new("narrow", r"lint failed").unwrap(),
        ]);
        assert_eq!(table.classify("lint failed"), Some("broad"));
    }

    #[test]
    fn test_builtin_names_are_unique() {
        let names: Vec<_> = IndicatorTable::builtin().names().collect();
        let unique: std::collections::HashSet<_> = names.iter().collect();
        assert_eq!(names.len(), unique.len());
        assert_eq!(names.first(), Some(&"pytest_failures"));
        assert_eq!(names.last(), Some(&"generic_error"));
    }

    #[test]
    fn test_group_markers() {
        assert_eq!(
            group_marker("##[group]Run npm ci"),
            Some(GroupMarker::Start(Some("Run npm ci".to_string())))
        );
        assert_eq!(
            group_marker("2024-05-01T10:00:00.1234567Z ::group::Install"),
            Some(GroupMarker::Start(Some("Install".to_string())))
        );
        assert_eq!(group_marker("##[group]   "), Some(GroupMarker::Start(None)));
        assert_eq!(group_marker("##[endgroup]"), Some(GroupMarker::End));
        assert_eq!(group_marker("::endgroup::"), Some(GroupMarker::End));
        assert_eq!(group_marker("##[error] lint failed"), None);
    }
}
