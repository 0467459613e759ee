/*!
 * Core translation service implementation.
 *
 * This module contains the TranslationService struct, which sends prompts to
 * a provider and owns the rate-limit back-off protocol.
 */

use log::{error, warn};
use std::time::Duration;

use crate::app_config::InferenceConfig;
use crate::errors::{ProviderError, TranslationError};
use crate::providers::Provider;

/// Longest single back-off; larger advertised intervals are clamped to it
pub const MAX_BACKOFF: Duration = Duration::from_secs(24 * 60 * 60);

/// How rate-limited requests are retried
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Interval used when the endpoint does not advertise one
    pub default_retry_after: Duration,

    /// Factor applied to the advertised interval
    pub multiplier: f64,

    /// Maximum retries after a rate limit per prompt; `None` retries forever
    pub max_retries: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            default_retry_after: Duration::from_secs(10),
            multiplier: 3.0,
            max_retries: None,
        }
    }
}

impl RetryPolicy {
    /// Build the policy from the inference settings
    pub fn from_config(config: &InferenceConfig) -> Self {
        Self {
            default_retry_after: Duration::from_secs(config.default_retry_after_secs),
            multiplier: config.retry_multiplier,
            max_retries: config.max_rate_limit_retries,
        }
    }

    /// Delay before retrying after the endpoint advertised `retry_after_secs`,
    /// never longer than [`MAX_BACKOFF`]
    pub fn backoff_delay(&self, retry_after_secs: Option<u64>) -> Duration {
        let base = retry_after_secs
            .map(Duration::from_secs)
            .unwrap_or(self.default_retry_after);

        Duration::try_from_secs_f64(base.as_secs_f64() * self.multiplier.max(0.0))
            .map_or(MAX_BACKOFF, |delay| delay.min(MAX_BACKOFF))
    }
}

/// Translation service sending one prompt at a time to a provider
#[derive(Debug)]
pub struct TranslationService<P: Provider> {
    /// Provider performing the completions
    provider: P,

    /// Back-off protocol for rate limits
    policy: RetryPolicy,
}

impl<P: Provider> TranslationService<P> {
    /// Create a new translation service
    pub fn new(provider: P, policy: RetryPolicy) -> Self {
        Self { provider, policy }
    }

    /// Access the underlying provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Retry policy in use
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Translate a prompt, backing off and retrying the same prompt whenever
    /// the provider reports a rate limit.
    ///
    /// Any other provider error is returned immediately; callers treat it as
    /// fatal for the whole run.
    pub async fn translate(&self, prompt: &str) -> Result<String, TranslationError> {
        let mut rate_limited = 0u32;

        loop {
            match self.provider.complete(prompt).await {
                Ok(text) => return Ok(text),
                Err(ProviderError::RateLimitExceeded { message, retry_after_secs }) => {
                    rate_limited += 1;

                    if self.policy.max_retries.is_some_and(|max| rate_limited > max) {
                        error!("Rate limit persisted after {} attempts: {}", rate_limited, message);
                        return Err(TranslationError::RetriesExhausted { attempts: rate_limited });
                    }

                    let delay = self.policy.backoff_delay(retry_after_secs);
                    warn!(
                        "Rate limit exceeded on {}! Retrying in {:.1} seconds...",
                        self.provider.name(),
                        delay.as_secs_f64()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    error!("Failed to translate document: {}", e);
                    return Err(TranslationError::Provider(e));
                }
            }
        }
    }
}
