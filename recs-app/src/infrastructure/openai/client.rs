use super::prompt::{DESTINATION_SYSTEM_PROMPT, EXTRACTION_SYSTEM_PROMPT};
use super::types::{ChatCompletionRequest, ChatCompletionResponse, TranscriptionResponse};
use super::{build_destination_prompt, build_extraction_prompt};
use crate::domain::{DestinationSuggestion, ExtractedRecommendation};
use recs_errors::AppError;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use std::time::Duration;

const OPENAI_API_URL: &str = "https://api.openai.com/v1";
const CHAT_MODEL: &str = "gpt-4o";
const TRANSCRIPTION_MODEL: &str = "whisper-1";

pub struct OpenAiClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, OPENAI_API_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self {
            http_client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Turns prose into structured entries. Returns an error when the reply cannot be
    /// parsed; the caller decides on the fallback.
    pub async fn extract_recommendations(
        &self,
        text: &str,
        destination: &str,
    ) -> Result<Vec<ExtractedRecommendation>, AppError> {
        let prompt = build_extraction_prompt(text, destination);
        let content = self.chat(EXTRACTION_SYSTEM_PROMPT, prompt).await?;
        parse_json_array(&content).ok_or_else(|| {
            tracing::error!("Failed to extract JSON from OpenAI response");
            AppError::AiService("reply did not contain a JSON array".to_string())
        })
    }

    pub async fn destination_suggestions(
        &self,
        destination: &str,
    ) -> Result<Vec<DestinationSuggestion>, AppError> {
        let prompt = build_destination_prompt(destination);
        let content = self.chat(DESTINATION_SYSTEM_PROMPT, prompt).await?;
        parse_json_array(&content)
            .ok_or_else(|| AppError::AiService("reply did not contain a JSON array".to_string()))
    }

    pub async fn transcribe(
        &self,
        audio: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> Result<String, AppError> {
        let part = Part::bytes(audio)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|e| AppError::Transcription(e.to_string()))?;
        let form = Form::new()
            .text("model", TRANSCRIPTION_MODEL)
            .part("file", part);

        let response = self
            .http_client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Transcription(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("OpenAI transcription error: {} - {}", status, body);
            return Err(AppError::Transcription(format!("API error: {}", status)));
        }

        let transcription: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| AppError::Transcription(e.to_string()))?;

        let text = transcription.text.trim().to_string();
        if text.is_empty() {
            return Err(AppError::Transcription("empty transcription".to_string()));
        }
        Ok(text)
    }

    async fn chat(&self, system: &str, prompt: String) -> Result<String, AppError> {
        let request = ChatCompletionRequest::new(CHAT_MODEL, system, prompt);

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::AiService(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("OpenAI error: {} - {}", status, body);
            return Err(AppError::AiService(format!("API error: {}", status)));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::AiService(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AppError::AiService("No response from AI".to_string()))
    }
}

/// Decodes the JSON array found between the first `[` and the last `]` of a model reply.
/// Models often wrap the array in prose or code fences.
pub fn parse_json_array<T: DeserializeOwned>(content: &str) -> Option<Vec<T>> {
    let start = content.find('[')?;
    let end = content.rfind(']')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str(&content[start..=end]) {
        Ok(items) => Some(items),
        Err(e) => {
            tracing::warn!("AI reply is not a valid JSON array: {}", e);
            None
        }
    }
}
