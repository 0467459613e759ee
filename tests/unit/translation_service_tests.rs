/*!
 * Tests for the translation service and its rate-limit back-off
 */

use std::time::Duration;
use tokio::time::Instant;

use docsling::app_config::InferenceConfig;
use docsling::errors::{ProviderError, TranslationError};
use docsling::providers::mock::{MockOutcome, MockProvider};
use docsling::providers::openai::parse_retry_after;
use docsling::translation::{MAX_BACKOFF, RetryPolicy, TranslationService};

fn service(provider: MockProvider) -> TranslationService<MockProvider> {
    TranslationService::new(provider, RetryPolicy::default())
}

#[test]
fn test_retryPolicy_default_shouldMatchInferenceDefaults() {
    let from_config = RetryPolicy::from_config(&InferenceConfig::default());
    assert_eq!(from_config, RetryPolicy::default());
    assert_eq!(from_config.default_retry_after, Duration::from_secs(10));
    assert_eq!(from_config.max_retries, None);
}

#[test]
fn test_backoffDelay_shouldScaleAdvertisedOrDefaultInterval() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.backoff_delay(Some(2)), Duration::from_secs(6));
    assert_eq!(policy.backoff_delay(None), Duration::from_secs(30));
    assert_eq!(policy.backoff_delay(Some(0)), Duration::ZERO);

    let halved = RetryPolicy { multiplier: 0.5, ..RetryPolicy::default() };
    assert_eq!(halved.backoff_delay(Some(3)), Duration::from_millis(1500));
}

#[tokio::test(start_paused = true)]
async fn test_translate_withSuccess_shouldReturnTextUnmodifiedOnFirstCall() {
    let provider = MockProvider::working("  # Olá\n\nTexto  ");
    let service = service(provider.clone());

    let text = service.translate("prompt").await.expect("translation should succeed");

    assert_eq!(text, "  # Olá\n\nTexto  ");
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_translate_withRateLimit_shouldWaitMultipliedRetryAfterAndResendSamePrompt() {
    let provider = MockProvider::scripted(vec![
        MockOutcome::RateLimited { retry_after_secs: Some(2) },
        MockOutcome::Text("translated".to_string()),
    ]);
    let service = service(provider.clone());

    let start = Instant::now();
    let text = service.translate("the prompt").await.expect("translation should succeed");
    let elapsed = start.elapsed();

    assert_eq!(text, "translated");
    assert_eq!(provider.call_count(), 2);
    assert_eq!(provider.prompts(), vec!["the prompt", "the prompt"]);
    assert!(elapsed >= Duration::from_secs(6), "waited only {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(6100), "waited {:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn test_translate_withRateLimitWithoutInterval_shouldUseDefaultInterval() {
    let provider = MockProvider::scripted(vec![
        MockOutcome::RateLimited { retry_after_secs: None },
        MockOutcome::Text("ok".to_string()),
    ]);
    let service = service(provider.clone());

    let start = Instant::now();
    service.translate("p").await.expect("translation should succeed");
    let elapsed = start.elapsed();

    assert!(elapsed >= Duration::from_secs(30));
    assert!(elapsed < Duration::from_millis(30100));
}

#[tokio::test(start_paused = true)]
async fn test_translate_withRepeatedRateLimits_shouldKeepRetryingUntilSuccess() {
    let provider = MockProvider::scripted(vec![
        MockOutcome::RateLimited { retry_after_secs: Some(1) },
        MockOutcome::RateLimited { retry_after_secs: Some(1) },
        MockOutcome::RateLimited { retry_after_secs: Some(1) },
        MockOutcome::Text("finally".to_string()),
    ]);
    let service = service(provider.clone());

    let start = Instant::now();
    let text = service.translate("p").await.expect("translation should succeed");

    assert_eq!(text, "finally");
    assert_eq!(provider.call_count(), 4);
    assert!(start.elapsed() >= Duration::from_secs(9));
}

#[test]
fn test_backoffDelay_withHugeInterval_shouldClampInsteadOfOverflowing() {
    let policy = RetryPolicy::default();
    let advertised = parse_retry_after("99999999999999999999");

    assert_eq!(advertised, Some(u64::MAX));
    assert_eq!(policy.backoff_delay(advertised), MAX_BACKOFF);
    assert_eq!(policy.backoff_delay(Some(MAX_BACKOFF.as_secs())), MAX_BACKOFF);
}

#[test]
fn test_backoffDelay_withHugeMultiplier_shouldClampInsteadOfOverflowing() {
    let policy = RetryPolicy { multiplier: 1e300, ..RetryPolicy::default() };
    assert_eq!(policy.backoff_delay(Some(2)), MAX_BACKOFF);

    let infinite = RetryPolicy { multiplier: f64::INFINITY, ..RetryPolicy::default() };
    assert_eq!(infinite.backoff_delay(None), MAX_BACKOFF);
}

#[tokio::test(start_paused = true)]
async fn test_translate_withHugeRetryAfter_shouldWaitClampedDelayAndSucceed() {
    let provider = MockProvider::scripted(vec![
        MockOutcome::RateLimited { retry_after_secs: Some(u64::MAX) },
        MockOutcome::Text("ok".to_string()),
    ]);
    let service = service(provider.clone());

    let start = Instant::now();
    let text = service.translate("p").await.expect("translation should succeed");
    let elapsed = start.elapsed();

    assert_eq!(text, "ok");
    assert_eq!(provider.call_count(), 2);
    assert!(elapsed >= MAX_BACKOFF);
    assert!(elapsed < MAX_BACKOFF + Duration::from_millis(100));
}

#[tokio::test(start_paused = true)]
async fn test_translate_withRetryCeiling_shouldStopWithRetriesExhausted() {
    let provider = MockProvider::scripted(vec![MockOutcome::RateLimited { retry_after_secs: Some(1) }]);
    let policy = RetryPolicy { max_retries: Some(3), ..RetryPolicy::default() };
    let service = TranslationService::new(provider.clone(), policy);

    let result = service.translate("p").await;

    // The first request plus three retries
    assert!(matches!(result, Err(TranslationError::RetriesExhausted { attempts: 4 })));
    assert_eq!(provider.call_count(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_translate_withOneRetryAllowed_shouldRecoverFromSingleRateLimit() {
    let provider = MockProvider::scripted(vec![
        MockOutcome::RateLimited { retry_after_secs: Some(1) },
        MockOutcome::Text("ok".to_string()),
    ]);
    let policy = RetryPolicy { max_retries: Some(1), ..RetryPolicy::default() };
    let service = TranslationService::new(provider.clone(), policy);

    let text = service.translate("p").await.expect("one retry should be allowed");

    assert_eq!(text, "ok");
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_translate_withZeroRetries_shouldFailOnFirstRateLimit() {
    let provider = MockProvider::scripted(vec![
        MockOutcome::RateLimited { retry_after_secs: Some(1) },
        MockOutcome::Text("never reached".to_string()),
    ]);
    let policy = RetryPolicy { max_retries: Some(0), ..RetryPolicy::default() };
    let service = TranslationService::new(provider.clone(), policy);

    let result = service.translate("p").await;

    assert!(matches!(result, Err(TranslationError::RetriesExhausted { attempts: 1 })));
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_translate_withNonRateLimitError_shouldFailAfterSingleCall() {
    let provider = MockProvider::failing(400);
    let service = service(provider.clone());

    let start = Instant::now();
    let result = service.translate("p").await;

    match result {
        Err(TranslationError::Provider(ProviderError::ApiError { status_code, .. })) => assert_eq!(status_code, 400),
        other => panic!("expected provider error, got {:?}", other),
    }
    assert_eq!(provider.call_count(), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_translate_withRateLimitThenFatalError_shouldNotRetryFatalError() {
    let provider = MockProvider::scripted(vec![
        MockOutcome::RateLimited { retry_after_secs: Some(1) },
        MockOutcome::ApiError { status_code: 500, message: "boom".to_string() },
    ]);
    let service = service(provider.clone());

    let result = service.translate("p").await;

    assert!(matches!(result, Err(TranslationError::Provider(_))));
    assert_eq!(provider.call_count(), 2);
}
