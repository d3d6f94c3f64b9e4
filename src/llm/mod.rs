//! Reasoning backend abstraction
//!
//! The orchestrator only needs threads it can start, resume and run prompts
//! on. [`GenAIReasoningClient`] implements that on top of the `genai` crate;
//! [`MockReasoningClient`] scripts responses for tests.

mod client;
mod error;
mod genai;
mod mock;
mod store;
mod types;

pub use client::{ReasoningClient, ReasoningThread};
pub use error::ReasoningError;
pub use self::genai::{GenAIReasoningClient, SYSTEM_PROMPT};
pub use mock::{MockReasoningClient, MockResponse, SentPrompt};
pub use store::TranscriptStore;
pub use types::{ChatMessage, MessageRole, ThreadTranscript};
