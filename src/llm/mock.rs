use super::client::{ReasoningClient, ReasoningThread};
use super::error::ReasoningError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Scripted reasoning backend for tests
///
/// Responses are consumed in order across all threads; every prompt sent is
/// recorded together with the id of the thread it was sent on.
#[derive(Clone)]
pub struct MockReasoningClient {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    prompts: Arc<Mutex<Vec<SentPrompt>>>,
    started: Arc<AtomicUsize>,
    name: String,
}

#[derive(Debug)]
pub enum MockResponse {
    Text(String),
    Error(ReasoningError),
}

impl MockResponse {
    pub fn text(content: impl Into<String>) -> Self {
        MockResponse::Text(content.into())
    }

    pub fn error(error: ReasoningError) -> Self {
        MockResponse::Error(error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentPrompt {
    pub thread_id: String,
    pub prompt: String,
}

impl MockReasoningClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            started: Arc::new(AtomicUsize::new(0)),
            name: "MockReasoning".to_string(),
        }
    }

    pub fn add_response(&self, response: MockResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn add_responses(&self, responses: impl IntoIterator<Item = MockResponse>) {
        let mut queue = self.responses.lock().unwrap();
        for response in responses {
            queue.push_back(response);
        }
    }

    pub fn remaining_responses(&self) -> usize {
        self.responses.lock().unwrap().len()
    }

    pub fn sent_prompts(&self) -> Vec<SentPrompt> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn threads_started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    fn thread(&self, id: String) -> Box<dyn ReasoningThread> {
        Box::new(MockThread {
            id,
            client: self.clone(),
        })
    }
}

impl Default for MockReasoningClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReasoningClient for MockReasoningClient {
    async fn start_thread(&self) -> Result<Box<dyn ReasoningThread>, ReasoningError> {
        let n = self.started.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(self.thread(format!("mock-thread-{}", n)))
    }

    async fn resume_thread(&self, id: &str) -> Result<Box<dyn ReasoningThread>, ReasoningError> {
        Ok(self.thread(id.to_string()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

struct MockThread {
    id: String,
    client: MockReasoningClient,
}

#[async_trait]
impl ReasoningThread for MockThread {
    fn id(&self) -> &str {
        &self.id
    }

    async fn run(&mut self, prompt: &str) -> Result<serde_json::Value, ReasoningError> {
        self.client.prompts.lock().unwrap().push(SentPrompt {
            thread_id: self.id.clone(),
            prompt: prompt.to_string(),
        });

        let response = self
            .client
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| {
                ReasoningError::Other("MockReasoningClient: No more responses in queue".to_string())
            })?;

        match response {
            MockResponse::Text(content) => Ok(serde_json::json!({ "final_response": content })),
            MockResponse::Error(error) => Err(error),
        }
    }
}
