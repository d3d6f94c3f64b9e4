//! Run output schema
//!
//! `RunOutput` is the single artifact an invocation writes to disk: the
//! thread used, the parsed CI log and fix plan when there was one, and one
//! `RunRecord` per reasoning run in execution order.

use crate::ci::ParseResult;
use crate::plan::FixPlan;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRecord {
    /// Caller prompt before any CI context was added; absent for followups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_prompt: Option<String>,
    /// Prompt text actually sent to the thread
    pub prompt: String,
    /// Opaque backend result
    pub result: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOutput {
    pub thread_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ci: Option<ParseResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_plan: Option<FixPlan>,
    pub runs: Vec<RunRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ci::parse;
    use crate::plan::build_plan;

    fn sample_output() -> RunOutput {
        let ci = parse(
            "##[group]Test\nFAILED tests/test_a.py::test_x - assert 0\n##[endgroup]",
            "ci.log",
            2,
            6,
        );
        let plan = build_plan(&ci, "corr");
        RunOutput {
            thread_id: Some("thread-1".to_string()),
            ci: Some(ci),
            fix_plan: Some(plan),
            runs: vec![
                RunRecord {
                    base_prompt: Some("Refine".to_string()),
                    prompt: "Refine\n\nplan".to_string(),
                    result: serde_json::json!({ "final_response": "ok", "usage": { "tokens": 12 } }),
                    timestamp: Utc::now(),
                },
                RunRecord {
                    base_prompt: None,
                    prompt: "and then?".to_string(),
                    result: serde_json::json!("plain"),
                    timestamp: Utc::now(),
                },
            ],
        }
    }

    #[test]
    fn test_json_round_trip() {
        let output = sample_output();
        let json = serde_json::to_string_pretty(&output).unwrap();
        let back: RunOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(back, output);
    }

    #[test]
    fn test_field_names() {
        let value = serde_json::to_value(sample_output()).unwrap();
        assert_eq!(value["threadId"], "thread-1");
        assert!(value["ci"]["blocksTruncated"].is_boolean());
        assert_eq!(value["ci"]["sourcePath"], "ci.log");
        assert_eq!(value["ci"]["indicators"]["pytest_failures"], 1);
        assert_eq!(value["fixPlan"]["correlationId"], "corr");
        assert!(value["fixPlan"]["unmappedIndicators"].is_array());
        assert_eq!(value["runs"][0]["basePrompt"], "Refine");
        assert!(value["runs"][1].get("basePrompt").is_none());
    }

    #[test]
    fn test_absent_sections_are_omitted() {
        let output = RunOutput {
            thread_id: None,
            ci: None,
            fix_plan: None,
            runs: Vec::new(),
        };
        let value = serde_json::to_value(&output).unwrap();
        assert!(value["threadId"].is_null());
        assert!(value.get("ci").is_none());
        assert!(value.get("fixPlan").is_none());

        let back: RunOutput = serde_json::from_value(value).unwrap();
        assert_eq!(back, output);
    }
}
