/*!
 * # docsling - documentation translation with AI
 *
 * A Rust library for keeping translated copies of a documentation tree in
 * sync with its source documents using an LLM inference endpoint.
 *
 * ## Features
 *
 * - Enumerate markdown and YAML documents under a documentation root
 * - Skip documents that already live in a translated subtree
 * - Translate only what is missing (`root/<code>/<relative path>`)
 * - Back off and retry when the endpoint reports a rate limit
 * - Rewrite internal documentation links into the translated subtree
 * - Remove translations of sources that git reports as modified
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `language_utils`: Language table entries and the translated-path classifier
 * - `file_utils`: File system operations and document enumeration
 * - `translation`: Translation pipeline:
 *   - `translation::core`: Translation service and rate-limit back-off
 *   - `translation::planner`: Translation targets and the idempotence gate
 *   - `translation::writeback`: Link rewriting and output persistence
 *   - `translation::prompts`: Prompt templates
 *   - `translation::cleanup`: Removal of outdated translations
 * - `app_controller`: Main application controller
 * - `providers`: Client implementations for inference endpoints:
 *   - `providers::openai`: OpenAI-compatible chat-completions client
 *   - `providers::mock`: Scripted provider for tests
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunSummary};
pub use errors::{AppError, ProviderError, TranslationError};
pub use file_utils::{DocumentEnumerator, SourceDocument};
pub use language_utils::{LanguageEntry, PathClassifier};
pub use translation::TranslationService;
