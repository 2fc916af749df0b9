//! Language-model adapters.
//!
//! Reference implementations of the [`AI`](crate::traits::ai::AI) trait.
//! Callers can use these directly or implement their own.

#[cfg(feature = "openai")]
mod openai;

#[cfg(feature = "openai")]
pub use openai::{OpenAI, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
