//! Abstractions for generating plain-language report summaries.
//!
//! The summary requester pairs a fixed system instruction with the assembled keyword list and
//! sends both to an OpenAI-compatible chat-completions endpoint. The first returned choice is
//! treated as the summary.

use crate::config::Config;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on generated tokens per summary.
pub const MAX_OUTPUT_TOKENS: u32 = 1500;
/// Sampling temperature used for every summary.
pub const TEMPERATURE: f32 = 0.7;

/// System instruction sent ahead of every keyword list.
pub const SYSTEM_PROMPT: &str = r#"You are an AI assistant specializing in medical report interpretation. Your task is to analyze an array of keywords extracted from a user-uploaded medical report and provide a clear, easily understandable summary. Your response should:

1. Be tailored for individuals without medical expertise
2. Explain each key finding or test result in simple terms
3. Provide context for normal ranges and interpret values that are out of range
4. Describe potential implications or next steps for abnormal results
5. Use bullet points or numbered lists for clarity
6. Organize information into logical sections (e.g., "Blood Tests", "Imaging Results")
7. Highlight any critical or urgent findings
8. Avoid medical jargon, or explain it when necessary
9. Include a brief disclaimer about consulting a healthcare professional for personalized advice

Format your response with appropriate headers, subheaders, and spacing to enhance readability. If there are multiple related items, group them together for a more coherent explanation.

Remember, your goal is to inform and educate, not to diagnose or provide medical advice. Always encourage the user to discuss the results with their healthcare provider for a comprehensive interpretation and personalized recommendations."#;

/// Errors surfaced while requesting a summary.
#[derive(Debug, Error)]
pub enum SummarizationClientError {
    /// Provider could not be reached.
    #[error("Summarization provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Provider returned an error response.
    #[error("Failed to generate summary: {0}")]
    GenerationFailed(String),
    /// Provider response could not be parsed or carried no content.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// Request assembled for one uploaded report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRequest {
    /// Fixed instruction describing the summary format.
    pub system_instruction: &'static str,
    /// Comma-separated keywords extracted from the report.
    pub keyword_list: String,
}

impl SummaryRequest {
    /// Build a request around the standard system prompt.
    pub fn new(keyword_list: impl Into<String>) -> Self {
        Self {
            system_instruction: SYSTEM_PROMPT,
            keyword_list: keyword_list.into(),
        }
    }

    /// Content of the user turn sent to the model.
    pub fn user_message(&self) -> String {
        format!("Keywords: {}", self.keyword_list)
    }
}

/// Interface implemented by summary providers.
#[async_trait]
pub trait SummarizationClient: Send + Sync {
    /// Generate a summary for the given request.
    async fn generate_summary(
        &self,
        request: &SummaryRequest,
    ) -> Result<String, SummarizationClientError>;
}

/// Client for the OpenAI chat-completions API (or any compatible server).
pub struct OpenAiSummarizationClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiSummarizationClient {
    /// Build a client from the shared configuration.
    pub fn from_config(config: &Config) -> Result<Self, SummarizationClientError> {
        Self::new(
            config.openai_base_url.clone(),
            config.openai_api_key.clone(),
            config.openai_model.clone(),
        )
    }

    /// Build a client for an explicit endpoint, key, and model.
    pub fn new(
        base_url: String,
        api_key: String,
        model: String,
    ) -> Result<Self, SummarizationClientError> {
        let http = Client::builder()
            .user_agent("mediclarity/summary")
            .build()
            .map_err(|error| {
                SummarizationClientError::ProviderUnavailable(format!(
                    "failed to construct HTTP client: {error}"
                ))
            })?;
        Ok(Self {
            http,
            base_url,
            api_key,
            model,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl SummarizationClient for OpenAiSummarizationClient {
    async fn generate_summary(
        &self,
        request: &SummaryRequest,
    ) -> Result<String, SummarizationClientError> {
        let user_message = request.user_message();
        let payload = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system_instruction,
                },
                ChatMessage {
                    role: "user",
                    content: &user_message,
                },
            ],
            max_tokens: MAX_OUTPUT_TOKENS,
            temperature: TEMPERATURE,
        };

        tracing::debug!(
            model = %self.model,
            keyword_chars = request.keyword_list.len(),
            "Requesting report summary"
        );

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                SummarizationClientError::ProviderUnavailable(format!(
                    "failed to reach {}: {error}",
                    self.base_url
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizationClientError::GenerationFailed(format!(
                "provider returned {status}: {body}"
            )));
        }

        let body: ChatCompletionResponse = response.json().await.map_err(|error| {
            SummarizationClientError::InvalidResponse(format!(
                "failed to decode chat completion: {error}"
            ))
        })?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                SummarizationClientError::InvalidResponse("response contained no choices".into())
            })
    }
}
