/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use docsling::app_config::{Config, LogLevel};
use docsling::errors::AppError;
use docsling::language_utils::LanguageEntry;
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.docs_root.to_string_lossy(), "docs");
    assert_eq!(config.language_codes(), vec!["ru", "pt-br", "cn", "es", "de", "jp"]);
    assert_eq!(config.link_prefix, "/docs/");

    assert_eq!(config.inference.endpoint, "https://api.groq.com/openai/v1/chat/completions");
    assert_eq!(config.inference.api_key_env, "GROQ_API_KEY");
    assert_eq!(config.inference.temperature, 0.1);
    assert_eq!(config.inference.top_p, 0.75);
    assert_eq!(config.inference.max_tokens, 65536);
    assert_eq!(config.inference.reasoning_effort, "low");
    assert_eq!(config.inference.rate_limit_delay_ms, 500);
    assert_eq!(config.inference.retry_multiplier, 3.0);
    assert_eq!(config.inference.default_retry_after_secs, 10);
    assert_eq!(config.inference.max_rate_limit_retries, None);

    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    // Duplicate code, ignoring case
    config.languages.push(LanguageEntry::new("Spanish again", "ES"));
    assert!(matches!(config.validate(), Err(AppError::Config(_))));
    config.languages.pop();

    // Code with a separator
    config.languages.push(LanguageEntry::new("Broken", "zh/hans"));
    assert!(config.validate().is_err());
    config.languages.pop();

    // Missing display name
    config.languages.push(LanguageEntry::new(" ", "fr"));
    assert!(config.validate().is_err());
    config.languages.pop();

    // No languages at all
    let saved = std::mem::take(&mut config.languages);
    assert!(config.validate().is_err());
    config.languages = saved;

    // Bad endpoint
    config.inference.endpoint = "not a url".to_string();
    assert!(config.validate().is_err());
    config.inference.endpoint = "ftp://example.com/v1".to_string();
    assert!(config.validate().is_err());
    config.inference.endpoint = "http://localhost:1234/v1/chat/completions".to_string();
    assert!(config.validate().is_ok());

    // Sampling parameters
    config.inference.top_p = 1.5;
    assert!(config.validate().is_err());
    config.inference.top_p = 0.75;

    config.inference.retry_multiplier = -1.0;
    assert!(config.validate().is_err());
    config.inference.retry_multiplier = 3.0;

    // Link prefix must be slash-delimited
    config.link_prefix = "/docs".to_string();
    assert!(config.validate().is_err());
    config.link_prefix = "/docs/".to_string();

    assert!(config.validate().is_ok());
}

#[test]
fn test_select_languages_withNoCode_shouldReturnAllInOrder() -> Result<()> {
    let config = Config::default();
    let selected = config.select_languages(None)?;
    assert_eq!(selected, config.languages);
    Ok(())
}

#[test]
fn test_select_languages_withKnownCode_shouldReturnThatLanguage() -> Result<()> {
    let config = Config::default();
    let selected = config.select_languages(Some("PT-BR"))?;

    assert_eq!(selected, vec![LanguageEntry::new("Brazilian Portuguese", "pt-br")]);
    Ok(())
}

#[test]
fn test_select_languages_withUnknownCode_shouldListAvailableCodes() {
    let config = Config::default();

    match config.select_languages(Some("fr")) {
        Err(AppError::Config(message)) => {
            assert!(message.contains("Unknown language code: fr"));
            assert!(message.contains("pt-br"));
        }
        other => panic!("expected configuration error, got {:?}", other),
    }
}

#[test]
fn test_api_key_withMissingVariable_shouldReturnConfigError() {
    let mut config = Config::default();
    config.inference.api_key_env = "DOCSLING_TEST_KEY_THAT_IS_NEVER_SET".to_string();

    match config.inference.api_key() {
        Err(AppError::Config(message)) => assert!(message.contains("DOCSLING_TEST_KEY_THAT_IS_NEVER_SET")),
        other => panic!("expected configuration error, got {:?}", other),
    }
}

#[test]
fn test_api_key_withPaddedVariable_shouldReturnTrimmedKey() {
    let name = "DOCSLING_TEST_PADDED_KEY";
    // SAFETY: the variable name is used by this test only
    unsafe { std::env::set_var(name, "  gsk_test_key \n") };

    let mut config = Config::default();
    config.inference.api_key_env = name.to_string();

    assert_eq!(config.inference.api_key().ok().as_deref(), Some("gsk_test_key"));
}

#[test]
fn test_api_key_withBlankVariable_shouldReturnConfigError() {
    let name = "DOCSLING_TEST_BLANK_KEY";
    // SAFETY: the variable name is used by this test only
    unsafe { std::env::set_var(name, "   ") };

    let mut config = Config::default();
    config.inference.api_key_env = name.to_string();

    assert!(matches!(config.inference.api_key(), Err(AppError::Config(_))));
}

#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;

    assert!(path.exists());
    assert_eq!(config.language_codes(), Config::default().language_codes());

    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(reloaded.inference.model, config.inference.model);
    Ok(())
}

#[test]
fn test_load_or_create_withPartialFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{
            "docs_root": "site/docs",
            "languages": [{ "name": "Spanish", "code": "es" }],
            "inference": { "model": "llama-3.3-70b", "max_rate_limit_retries": 5 },
            "log_level": "debug"
        }"#,
    )?;

    let config = Config::load_or_create(&path)?;

    assert_eq!(config.docs_root.to_string_lossy(), "site/docs");
    assert_eq!(config.language_codes(), vec!["es"]);
    assert_eq!(config.inference.model, "llama-3.3-70b");
    assert_eq!(config.inference.max_rate_limit_retries, Some(5));
    assert_eq!(config.inference.temperature, 0.1);
    assert_eq!(config.link_prefix, "/docs/");
    assert_eq!(config.log_level, LogLevel::Debug);
    Ok(())
}

#[test]
fn test_load_or_create_withMalformedFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;

    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}
