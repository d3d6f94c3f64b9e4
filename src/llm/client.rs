use super::error::ReasoningError;
use async_trait::async_trait;

/// A conversation with the reasoning backend
#[async_trait]
pub trait ReasoningThread: Send {
    fn id(&self) -> &str;

    /// Sends `prompt` as the next user turn and returns the backend's result.
    ///
    /// The result is opaque to callers; it is stored as-is in the run output.
    async fn run(&mut self, prompt: &str) -> Result<serde_json::Value, ReasoningError>;
}

#[async_trait]
pub trait ReasoningClient: Send + Sync {
    async fn start_thread(&self) -> Result<Box<dyn ReasoningThread>, ReasoningError>;

    async fn resume_thread(&self, id: &str) -> Result<Box<dyn ReasoningThread>, ReasoningError>;

    fn name(&self) -> &str;

    fn model_info(&self) -> Option<String> {
        None
    }
}
