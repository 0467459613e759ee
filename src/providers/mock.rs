/*!
 * Mock provider implementation for testing.
 *
 * `MockProvider` replays a script of outcomes, one per call, and records
 * every prompt it receives:
 * - `MockProvider::working(text)` - Always succeeds with the same text
 * - `MockProvider::scripted(outcomes)` - Plays the outcomes in order
 * - `MockProvider::failing(status)` - Always fails with an API error
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::Provider;

/// One scripted reply
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Succeed with this completion text
    Text(String),
    /// Fail with a rate limit, optionally advertising a retry interval
    RateLimited { retry_after_secs: Option<u64> },
    /// Fail with a non-retryable API error
    ApiError { status_code: u16, message: String },
}

/// Mock provider for testing translation behavior
#[derive(Debug, Clone)]
pub struct MockProvider {
    /// Outcomes still to be played
    script: Arc<Mutex<VecDeque<MockOutcome>>>,
    /// Outcome used once the script runs out
    fallback: MockOutcome,
    /// Number of calls made
    call_count: Arc<AtomicUsize>,
    /// Prompts received, in call order
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    /// Create a provider that plays `script` and then repeats `fallback`
    pub fn new(script: Vec<MockOutcome>, fallback: MockOutcome) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            fallback,
            call_count: Arc::new(AtomicUsize::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working(text: impl Into<String>) -> Self {
        Self::new(Vec::new(), MockOutcome::Text(text.into()))
    }

    /// Create a provider that plays the outcomes in order and then keeps
    /// repeating the last one
    pub fn scripted(outcomes: Vec<MockOutcome>) -> Self {
        let fallback = outcomes.last().cloned().unwrap_or(MockOutcome::Text(String::new()));
        Self::new(outcomes, fallback)
    }

    /// Create a failing mock provider that always errors
    pub fn failing(status_code: u16) -> Self {
        Self::new(Vec::new(), MockOutcome::ApiError {
            status_code,
            message: "{\"error\":{\"message\":\"mock failure\"}}".to_string(),
        })
    }

    /// Get the number of calls made
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Get the prompts received so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().push(prompt.to_string());

        let outcome = self.script.lock().pop_front().unwrap_or_else(|| self.fallback.clone());

        match outcome {
            MockOutcome::Text(text) => Ok(text),
            MockOutcome::RateLimited { retry_after_secs } => Err(ProviderError::RateLimitExceeded {
                message: "Rate limit reached for model".to_string(),
                retry_after_secs,
            }),
            MockOutcome::ApiError { status_code, message } => Err(ProviderError::ApiError {
                status_code,
                message,
            }),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
