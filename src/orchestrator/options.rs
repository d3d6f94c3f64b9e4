//! Invocation options and their validation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_CI_CONTEXT_LINES: i64 = 8;
pub const DEFAULT_CI_MAX_BLOCKS: i64 = 6;

/// Prompt used in fix-plan mode when the caller does not supply one
pub const DEFAULT_FIX_PLAN_PROMPT: &str = "Review the CI failure evidence and the preliminary fix plan below. \
Confirm or correct each step so that running the commands in order reproduces and fixes the failure.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    Diagnose,
    FixPlan,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Diagnose => write!(f, "diagnose"),
            Mode::FixPlan => write!(f, "fix-plan"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("--prompt is required in diagnose mode.")]
    MissingPrompt,

    #[error("--ci-log is required in fix-plan mode.")]
    MissingCiLog,

    #[error("{flag} must be a positive integer (got {value}).")]
    NotPositive { flag: &'static str, value: i64 },

    /// Unknown flags or unparsable values rejected by the argument parser
    #[error("{0}")]
    InvalidArguments(String),
}

/// Options exactly as supplied by the caller, before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsInput {
    pub mode: Mode,
    pub prompt: Option<String>,
    pub followup: Option<String>,
    pub thread_id: Option<String>,
    pub out_path: Option<PathBuf>,
    pub ci_log_path: Option<PathBuf>,
    pub ci_context_lines: i64,
    pub ci_max_blocks: i64,
}

impl Default for OptionsInput {
    fn default() -> Self {
        Self {
            mode: Mode::Diagnose,
            prompt: None,
            followup: None,
            thread_id: None,
            out_path: None,
            ci_log_path: None,
            ci_context_lines: DEFAULT_CI_CONTEXT_LINES,
            ci_max_blocks: DEFAULT_CI_MAX_BLOCKS,
        }
    }
}

/// Validated options for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub mode: Mode,
    pub prompt: String,
    pub followup: Option<String>,
    pub thread_id: Option<String>,
    pub out_path: Option<PathBuf>,
    pub ci_log_path: Option<PathBuf>,
    pub ci_context_lines: usize,
    pub ci_max_blocks: usize,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn positive(flag: &'static str, value: i64) -> Result<usize, ValidationError> {
    if value <= 0 {
        return Err(ValidationError::NotPositive { flag, value });
    }
    usize::try_from(value).map_err(|_| ValidationError::NotPositive { flag, value })
}

impl OptionsInput {
    /// Validates the raw options. Touches neither the filesystem nor the network.
    pub fn validate(self) -> Result<Options, ValidationError> {
        let ci_context_lines = positive("--ci-context", self.ci_context_lines)?;
        let ci_max_blocks = positive("--ci-max-blocks", self.ci_max_blocks)?;
        let ci_log_path = self.ci_log_path.filter(|p| !p.as_os_str().is_empty());

        let prompt = match self.mode {
            Mode::Diagnose => non_blank(self.prompt).ok_or(ValidationError::MissingPrompt)?,
            Mode::FixPlan => {
                if ci_log_path.is_none() {
                    return Err(ValidationError::MissingCiLog);
                }
                non_blank(self.prompt).unwrap_or_else(|| DEFAULT_FIX_PLAN_PROMPT.to_string())
            }
        };

        Ok(Options {
            mode: self.mode,
            prompt,
            followup: non_blank(self.followup),
            thread_id: non_blank(self.thread_id),
            out_path: self.out_path,
            ci_log_path,
            ci_context_lines,
            ci_max_blocks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagnose(prompt: &str) -> OptionsInput {
        OptionsInput {
            prompt: Some(prompt.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_diagnose_defaults() {
        let options = diagnose("why?").validate().unwrap();
        assert_eq!(options.mode, Mode::Diagnose);
        assert_eq!(options.prompt, "why?");
        assert_eq!(options.ci_context_lines, 8);
        assert_eq!(options.ci_max_blocks, 6);
        assert!(options.ci_log_path.is_none());
    }

    #[test]
    fn test_diagnose_requires_prompt() {
        assert_eq!(
            OptionsInput::default().validate(),
            Err(ValidationError::MissingPrompt)
        );
        assert_eq!(diagnose("   ").validate(), Err(ValidationError::MissingPrompt));
    }

    #[test]
    fn test_fix_plan_requires_ci_log() {
        let input = OptionsInput {
            mode: Mode::FixPlan,
            ..Default::default()
        };
        let err = input.validate().unwrap_err();
        assert_eq!(err, ValidationError::MissingCiLog);
        assert_eq!(err.to_string(), "--ci-log is required in fix-plan mode.");
    }

    #[test]
    fn test_fix_plan_default_prompt() {
        let input = OptionsInput {
            mode: Mode::FixPlan,
            ci_log_path: Some(PathBuf::from("ci.log")),
            ..Default::default()
        };
        let options = input.validate().unwrap();
        assert_eq!(options.prompt, DEFAULT_FIX_PLAN_PROMPT);
    }

    #[test]
    fn test_non_positive_ints_rejected() {
        let input = OptionsInput {
            ci_context_lines: 0,
            ..diagnose("x")
        };
        assert_eq!(
            input.validate(),
            Err(ValidationError::NotPositive {
                flag: "--ci-context",
                value: 0
            })
        );

        let input = OptionsInput {
            ci_max_blocks: -2,
            ..diagnose("x")
        };
        let err = input.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "--ci-max-blocks must be a positive integer (got -2)."
        );
    }

    #[test]
    fn test_blank_optionals_dropped() {
        let input = OptionsInput {
            followup: Some("".to_string()),
            thread_id: Some("  ".to_string()),
            ..diagnose("x")
        };
        let options = input.validate().unwrap();
        assert!(options.followup.is_none());
        assert!(options.thread_id.is_none());
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(Mode::Diagnose.to_string(), "diagnose");
        assert_eq!(Mode::FixPlan.to_string(), "fix-plan");
    }
}
