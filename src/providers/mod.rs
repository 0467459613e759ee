/*!
 * Provider implementations for the inference endpoint.
 *
 * This module contains client implementations behind a common trait:
 * - OpenAI: OpenAI-compatible chat-completions API (Groq, OpenAI, LM Studio)
 * - Mock: Scripted responses for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all LLM providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably in the translation service.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Send a single prompt and return the completion text
    ///
    /// # Arguments
    /// * `prompt` - The full prompt, sent as one user message
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The first completion's text or an error
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Short name used in log messages
    fn name(&self) -> &str;
}

pub mod mock;
pub mod openai;
