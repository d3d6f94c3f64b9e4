//! On-disk thread transcripts, one JSON file per thread id

use super::error::ReasoningError;
use super::types::ThreadTranscript;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct TranscriptStore {
    dir: PathBuf,
}

impl TranscriptStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Rejects ids that could escape the store directory
    pub fn validate_id(id: &str) -> Result<(), ReasoningError> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(())
        } else {
            Err(ReasoningError::InvalidThreadId { id: id.to_string() })
        }
    }

    fn transcript_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    pub async fn load(&self, id: &str) -> Result<Option<ThreadTranscript>> {
        let path = self.transcript_path(id);
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(None);
        }

        let contents = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read transcript: {}", path.display()))?;
        let transcript = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse transcript: {}", path.display()))?;

        Ok(Some(transcript))
    }

    pub async fn save(&self, transcript: &ThreadTranscript) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create thread directory: {}", self.dir.display()))?;

        let path = self.transcript_path(&transcript.id);
        let contents =
            serde_json::to_string_pretty(transcript).context("Failed to serialize transcript")?;
        tokio::fs::write(&path, contents)
            .await
            .with_context(|| format!("Failed to write transcript: {}", path.display()))?;

        Ok(())
    }
}
