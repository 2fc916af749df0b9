//! AI trait for language-model operations.
//!
//! The pipeline needs exactly two capabilities from a model:
//! - Free-text completion (tool discovery, synthesis)
//! - Schema-constrained completion (per-company analysis)
//!
//! Implementations supply raw text for both; the provided
//! [`AI::complete_structured`] turns the JSON into a typed value or fails.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{InferenceError, InferenceResult};
use crate::schema::{OutputSchema, StructuredOutput};

/// Speaker of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Language-model capability.
#[async_trait]
pub trait AI: Send + Sync {
    /// Complete a conversation, returning the assistant's text.
    async fn complete(&self, messages: &[Message]) -> InferenceResult<String>;

    /// Complete a conversation constrained to a JSON schema, returning the
    /// raw JSON text.
    async fn complete_json(
        &self,
        messages: &[Message],
        schema: &OutputSchema,
    ) -> InferenceResult<String>;

    /// Complete a conversation into a typed value.
    ///
    /// Either every required field of `T` is present or this returns
    /// [`InferenceError::StructuredOutput`]; a partially-typed value is never
    /// produced.
    async fn complete_structured<T>(&self, messages: &[Message]) -> InferenceResult<T>
    where
        T: StructuredOutput + Send,
        Self: Sized,
    {
        let schema = OutputSchema::of::<T>();
        debug!(type_name = %schema.name, "Requesting structured completion");

        let raw = self.complete_json(messages, &schema).await?;
        parse_json_response(&raw).map_err(|e| InferenceError::StructuredOutput {
            type_name: schema.name.clone(),
            reason: e.to_string(),
        })
    }

    /// Model name (for logging).
    fn model(&self) -> &str {
        "unknown"
    }
}

/// Parse JSON that may be wrapped in a markdown code fence.
pub fn parse_json_response<T: serde::de::DeserializeOwned>(
    response: &str,
) -> Result<T, serde_json::Error> {
    serde_json::from_str(response).or_else(|_| {
        let unfenced = response
            .trim()
            .trim_start_matches("```json")
            .trim_start_matches("```")
            .trim_end_matches("```")
            .trim();
        serde_json::from_str(unfenced)
    })
}
