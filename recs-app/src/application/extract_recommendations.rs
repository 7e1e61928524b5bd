use crate::domain::ExtractedRecommendation;
use crate::infrastructure::openai::OpenAiClient;
use recs_errors::AppError;
use std::sync::Arc;

pub struct ExtractRecommendations {
    ai: Option<Arc<OpenAiClient>>,
}

impl ExtractRecommendations {
    pub fn new(ai: Option<Arc<OpenAiClient>>) -> Self {
        Self { ai }
    }

    /// Structured entries for the confirmation page. Never fails once the text is
    /// non-empty: without a usable AI reply the whole text becomes one catch-all entry.
    pub async fn execute(
        &self,
        text: &str,
        destination: &str,
    ) -> Result<Vec<ExtractedRecommendation>, AppError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::validation("Please enter some recommendations."));
        }

        let Some(ai) = &self.ai else {
            tracing::warn!("OPENAI_API_KEY not set, keeping recommendations as raw text");
            return Ok(vec![ExtractedRecommendation::catch_all(destination, text)]);
        };

        match ai.extract_recommendations(text, destination).await {
            Ok(entries) => {
                let entries: Vec<_> = entries
                    .into_iter()
                    .filter(|e| !e.name.trim().is_empty())
                    .collect();
                if entries.is_empty() {
                    Ok(vec![ExtractedRecommendation::catch_all(destination, text)])
                } else {
                    tracing::info!("Extracted {} recommendations for {}", entries.len(), destination);
                    Ok(entries)
                }
            }
            Err(err) => {
                tracing::error!("Recommendation extraction failed: {}", err);
                Ok(vec![ExtractedRecommendation::catch_all(destination, text)])
            }
        }
    }

    pub fn transcription_available(&self) -> bool {
        self.ai.is_some()
    }

    pub async fn transcribe(
        &self,
        audio: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> Result<String, AppError> {
        if audio.is_empty() {
            return Err(AppError::validation("Empty audio file"));
        }
        let Some(ai) = &self.ai else {
            return Err(AppError::Transcription("OPENAI_API_KEY not set".to_string()));
        };
        ai.transcribe(audio, file_name, content_type).await
    }
}
