//! LLM Client - HTTP clients for generative model APIs
//!
//! Uses reqwest to call model APIs. Compatible with:
//! - Google Gemini (`generateContent`)
//! - OpenAI
//! - Azure OpenAI, DeepSeek and other OpenAI-compatible APIs

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::sync::Arc;
use std::time::Duration;

use super::models::*;
use crate::config::LlmConfig;
use crate::utils::StringExt;

/// Model invocation capability: one prompt in, raw text out.
#[async_trait]
pub trait LLMClient: Send + Sync {
    fn provider(&self) -> LLMProviderKind;

    fn model(&self) -> &str;

    /// Send a single prompt and return the model's raw text reply
    async fn complete(&self, prompt: &str) -> Result<String, LLMError>;
}

/// Build the process-wide client from configuration.
///
/// Returns `None` when no API key is configured or the client cannot be created;
/// callers then run without a model.
pub fn build_client(config: &LlmConfig) -> Option<Arc<dyn LLMClient>> {
    let Some(api_key) = config.api_key.clean() else {
        tracing::info!("No {} API key provided", config.provider.as_str());
        return None;
    };

    let client = match config.provider {
        LLMProviderKind::Gemini => {
            GeminiClient::new(config, api_key).map(|c| Arc::new(c) as Arc<dyn LLMClient>)
        },
        LLMProviderKind::OpenAI => {
            OpenAIClient::new(config, api_key).map(|c| Arc::new(c) as Arc<dyn LLMClient>)
        },
    };

    match client {
        Ok(client) => {
            tracing::info!(
                "Successfully initialized {} model {}",
                client.provider().as_str(),
                client.model()
            );
            Some(client)
        },
        Err(e) => {
            tracing::warn!("Failed to initialize {} model: {}", config.provider.as_str(), e);
            None
        },
    }
}

// ============================================================================
// Shared transport
// ============================================================================

struct HttpTransport {
    http_client: Client,
    timeout_secs: u64,
}

impl HttpTransport {
    fn new(timeout_secs: u64) -> Result<Self, LLMError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| LLMError::ApiError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http_client, timeout_secs })
    }

    async fn send<Resp: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Resp, LLMError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                LLMError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                LLMError::ApiError(format!("Connection failed: {}", e))
            } else {
                LLMError::ApiError(e.to_string())
            }
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(LLMError::RateLimited(retry_after));
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(LLMError::ApiError("Invalid API key".to_string()));
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LLMError::ApiError(format!("API error {}: {}", status, error_text)));
        }

        response
            .json()
            .await
            .map_err(|e| LLMError::ParseError(e.to_string()))
    }
}

// ============================================================================
// Gemini
// ============================================================================

/// Google Gemini client (`models/{model}:generateContent`)
pub struct GeminiClient {
    transport: HttpTransport,
    api_base: String,
    api_key: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
}

impl GeminiClient {
    pub fn new(config: &LlmConfig, api_key: String) -> Result<Self, LLMError> {
        Ok(Self {
            transport: HttpTransport::new(config.timeout_secs)?,
            api_base: config.effective_api_base(),
            api_key,
            model: config.effective_model(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl LLMClient for GeminiClient {
    fn provider(&self) -> LLMProviderKind {
        LLMProviderKind::Gemini
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String, LLMError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        );

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part { text: prompt.to_string() }],
            }],
            generation_config: Some(GenerationConfig {
                temperature: Some(self.temperature),
                max_output_tokens: Some(self.max_tokens),
            }),
        };

        tracing::debug!("Calling Gemini API: {} with model {}", url, self.model);

        let request = self
            .transport
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body);

        let response: GenerateContentResponse = self.transport.send(request).await?;
        response.into_text()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate
    pub(crate) fn into_text(self) -> Result<String, LLMError> {
        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() { Err(LLMError::EmptyResponse) } else { Ok(text) }
    }
}

// ============================================================================
// OpenAI-compatible
// ============================================================================

/// Chat completions client for OpenAI-compatible APIs
pub struct OpenAIClient {
    transport: HttpTransport,
    api_base: String,
    api_key: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
}

impl OpenAIClient {
    pub fn new(config: &LlmConfig, api_key: String) -> Result<Self, LLMError> {
        Ok(Self {
            transport: HttpTransport::new(config.timeout_secs)?,
            api_base: config.effective_api_base(),
            api_key,
            model: config.effective_model(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl LLMClient for OpenAIClient {
    fn provider(&self) -> LLMProviderKind {
        LLMProviderKind::OpenAI
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String, LLMError> {
        let chat_request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage { role: "user".to_string(), content: prompt.to_string() }],
            max_tokens: Some(self.max_tokens),
            temperature: Some(self.temperature),
            response_format: Some(ResponseFormat { r#type: "json_object".to_string() }),
        };

        let url = format!("{}/chat/completions", self.api_base.trim_end_matches('/'));

        tracing::debug!("Calling LLM API: {} with model {}", url, self.model);

        let request = self
            .transport
            .http_client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&chat_request);

        let response: ChatCompletionResponse = self.transport.send(request).await?;
        response.into_text()
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    r#type: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl ChatCompletionResponse {
    pub(crate) fn into_text(self) -> Result<String, LLMError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(LLMError::EmptyResponse)
    }
}
