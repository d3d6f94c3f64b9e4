//! GenAI-backed reasoning threads
//!
//! Each thread is a chat transcript replayed to the provider on every run, so
//! any provider supported by the `genai` crate (OpenAI, Anthropic, Gemini,
//! Groq, xAI, Ollama) can act as the reasoning backend. Transcripts are kept in
//! a [`TranscriptStore`] so a later invocation can resume the conversation.

use super::client::{ReasoningClient, ReasoningThread};
use super::error::ReasoningError;
use super::store::TranscriptStore;
use super::types::{ChatMessage, MessageRole, ThreadTranscript};
use async_trait::async_trait;
use genai::adapter::AdapterKind;
use genai::chat::{ChatMessage as GenAIChatMessage, ChatRequest as GenAIChatRequest};
use genai::resolver::{AuthData, Endpoint, ServiceTargetResolver};
use genai::{Client, ModelIden, ServiceTarget};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub const SYSTEM_PROMPT: &str = "You are a senior build engineer diagnosing continuous-integration \
failures. Base every conclusion on the log evidence provided, prefer concrete repository commands \
over general advice, and say so explicitly when the evidence is insufficient.";

/// Shared state between the client and the threads it hands out
struct Backend {
    client: Client,
    model: String,
    provider: AdapterKind,
    timeout: Duration,
    store: TranscriptStore,
    correlation_id: String,
}

pub struct GenAIReasoningClient {
    backend: Arc<Backend>,
}

impl GenAIReasoningClient {
    /// Creates a client for `provider`/`model`.
    ///
    /// When `base_url` is set, requests are routed to that endpoint using the
    /// provider's standard API-key variable for authentication. Every event the
    /// client logs carries `correlation_id`.
    pub fn new(
        provider: AdapterKind,
        model: String,
        timeout: Duration,
        base_url: Option<String>,
        store: TranscriptStore,
        correlation_id: impl Into<String>,
    ) -> Self {
        let correlation_id = correlation_id.into();
        let client = if let Some(endpoint_url) = base_url {
            debug!(
                correlation_id = %correlation_id,
                "Using custom endpoint for {}: {}",
                provider.as_str(),
                endpoint_url
            );

            let model_clone = model.clone();
            let resolver = ServiceTargetResolver::from_resolver_fn(
                move |_service_target: ServiceTarget| -> Result<ServiceTarget, genai::resolver::Error> {
                    let endpoint = Endpoint::from_owned(endpoint_url.clone());

                    let auth = match provider.default_key_env_name() {
                        Some(api_key_var) => AuthData::from_env(api_key_var),
                        None => AuthData::from_single(""),
                    };

                    Ok(ServiceTarget {
                        endpoint,
                        auth,
                        model: ModelIden::new(provider, &model_clone),
                    })
                },
            );

            Client::builder()
                .with_service_target_resolver(resolver)
                .build()
        } else {
            Client::default()
        };

        debug!(
            correlation_id = %correlation_id,
            "Creating GenAI reasoning client: provider={}, model={}, threads={}",
            provider.as_str(),
            model,
            store.dir().display()
        );

        Self {
            backend: Arc::new(Backend {
                client,
                model,
                provider,
                timeout,
                store,
                correlation_id,
            }),
        }
    }
}

#[async_trait]
impl ReasoningClient for GenAIReasoningClient {
    async fn start_thread(&self) -> Result<Box<dyn ReasoningThread>, ReasoningError> {
        let id = uuid::Uuid::new_v4().to_string();
        let transcript = ThreadTranscript::new(id, &self.backend.model, SYSTEM_PROMPT);
        Ok(Box::new(GenAIThread {
            backend: Arc::clone(&self.backend),
            transcript,
        }))
    }

    async fn resume_thread(&self, id: &str) -> Result<Box<dyn ReasoningThread>, ReasoningError> {
        TranscriptStore::validate_id(id)?;
        let transcript = self
            .backend
            .store
            .load(id)
            .await
            .map_err(ReasoningError::transcript)?
            .ok_or_else(|| ReasoningError::ThreadNotFound { id: id.to_string() })?;

        debug!(
            correlation_id = %self.backend.correlation_id,
            "Resuming thread {} with {} previous turn(s)",
            id,
            transcript.turns()
        );

        Ok(Box::new(GenAIThread {
            backend: Arc::clone(&self.backend),
            transcript,
        }))
    }

    fn name(&self) -> &str {
        self.backend.provider.as_str()
    }

    fn model_info(&self) -> Option<String> {
        Some(self.backend.model.clone())
    }
}

impl std::fmt::Debug for GenAIReasoningClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenAIReasoningClient")
            .field("provider", &self.backend.provider)
            .field("model", &self.backend.model)
            .field("timeout", &self.backend.timeout)
            .finish()
    }
}

struct GenAIThread {
    backend: Arc<Backend>,
    transcript: ThreadTranscript,
}

fn convert_message(msg: &ChatMessage) -> GenAIChatMessage {
    match msg.role {
        MessageRole::System => GenAIChatMessage::system(&msg.content),
        MessageRole::User => GenAIChatMessage::user(&msg.content),
        MessageRole::Assistant => GenAIChatMessage::assistant(&msg.content),
    }
}

#[async_trait]
impl ReasoningThread for GenAIThread {
    fn id(&self) -> &str {
        &self.transcript.id
    }

    async fn run(&mut self, prompt: &str) -> Result<serde_json::Value, ReasoningError> {
        let backend = &self.backend;
        let start = Instant::now();

        let mut messages: Vec<GenAIChatMessage> =
            self.transcript.messages.iter().map(convert_message).collect();
        messages.push(GenAIChatMessage::user(prompt));
        let request = GenAIChatRequest::new(messages);

        let response = match tokio::time::timeout(
            backend.timeout,
            backend.client.exec_chat(&backend.model, request, None),
        )
        .await
        {
            Ok(Ok(resp)) => resp,
            Ok(Err(e)) => {
                warn!(
                    correlation_id = %backend.correlation_id,
                    "{} API error: {}",
                    backend.provider.as_str(),
                    e
                );
                return Err(ReasoningError::Api {
                    provider: backend.provider.as_str().to_string(),
                    message: e.to_string(),
                });
            }
            Err(_) => {
                warn!(
                    correlation_id = %backend.correlation_id,
                    "{} request timed out after {}s",
                    backend.provider.as_str(),
                    backend.timeout.as_secs()
                );
                return Err(ReasoningError::Timeout {
                    seconds: backend.timeout.as_secs(),
                });
            }
        };

        let content = response.first_text().unwrap_or_default().to_string();

        self.transcript.push(ChatMessage::user(prompt));
        self.transcript.push(ChatMessage::assistant(&content));
        backend
            .store
            .save(&self.transcript)
            .await
            .map_err(ReasoningError::transcript)?;

        Ok(serde_json::json!({
            "final_response": content,
            "model": backend.model,
            "elapsed_ms": start.elapsed().as_millis() as u64,
        }))
    }
}
