//! OpenAI implementation of the AI trait.
//!
//! Free-text completions use the plain chat-completions endpoint; structured
//! completions use the `json_schema` response format with `strict: true`.
//!
//! # Example
//!
//! ```rust,ignore
//! use research::ai::OpenAI;
//!
//! let ai = OpenAI::from_env()?.with_model("gpt-4o");
//! let workflow = ResearchWorkflow::new(provider, ai);
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{InferenceError, InferenceResult};
use crate::schema::OutputSchema;
use crate::security::SecretString;
use crate::traits::ai::{Message, AI};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// OpenAI-based AI implementation.
#[derive(Clone)]
pub struct OpenAI {
    client: Client,
    api_key: SecretString,
    model: String,
    base_url: String,
    temperature: f32,
}

impl OpenAI {
    /// Create a new OpenAI client with the given API key.
    pub fn new(api_key: impl Into<SecretString>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Create from environment variable `OPENAI_API_KEY`.
    pub fn from_env() -> InferenceResult<Self> {
        SecretString::from_env("OPENAI_API_KEY")
            .map(Self::new)
            .ok_or_else(|| InferenceError::Config("OPENAI_API_KEY not set".into()))
    }

    /// Set the chat model (default: gpt-4o-mini).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL (for Azure, proxies, compatible servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the sampling temperature (default: 0.1).
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Replace the HTTP client (timeouts, proxies).
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    fn request<'a>(
        &'a self,
        messages: &'a [Message],
        response_format: Option<ResponseFormat<'a>>,
    ) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            response_format,
        }
    }

    /// Send a chat-completions request and return the first choice's text.
    async fn chat(&self, request: &ChatRequest<'_>) -> InferenceResult<String> {
        let start = std::time::Instant::now();

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", self.api_key.bearer())
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "OpenAI request failed");
                InferenceError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "OpenAI API error");
            return Err(InferenceError::Api(format!("{}: {}", status, error_text)));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::Api(format!("invalid response body: {}", e)))?;

        debug!(
            model = %self.model,
            structured = request.response_format.is_some(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "OpenAI completion finished"
        );

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(InferenceError::EmptyResponse)
    }
}

#[async_trait]
impl AI for OpenAI {
    async fn complete(&self, messages: &[Message]) -> InferenceResult<String> {
        self.chat(&self.request(messages, None)).await
    }

    async fn complete_json(
        &self,
        messages: &[Message],
        schema: &OutputSchema,
    ) -> InferenceResult<String> {
        let format = ResponseFormat::json_schema(&schema.name, &schema.schema);
        self.chat(&self.request(messages, Some(format))).await
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// Request/Response types

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat<'a>>,
}

#[derive(Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    format_type: &'static str,
    json_schema: JsonSchemaFormat<'a>,
}

impl<'a> ResponseFormat<'a> {
    fn json_schema(name: &'a str, schema: &'a serde_json::Value) -> Self {
        Self {
            format_type: "json_schema",
            json_schema: JsonSchemaFormat {
                name,
                strict: true,
                schema,
            },
        }
    }
}

#[derive(Serialize)]
struct JsonSchemaFormat<'a> {
    name: &'a str,
    strict: bool,
    schema: &'a serde_json::Value,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}
