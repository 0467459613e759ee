/*!
 * Translation of documentation using an inference provider.
 *
 * This module contains the translation pipeline pieces used by the
 * controller:
 *
 * - `core`: Translation service and rate-limit back-off
 * - `planner`: Translation targets and the idempotence gate
 * - `writeback`: Link rewriting and output persistence
 * - `prompts`: Prompt templates
 * - `cleanup`: Removal of translations whose source changed
 */

// Re-export main types for easier usage
pub use self::core::{MAX_BACKOFF, RetryPolicy, TranslationService};
pub use self::planner::{TranslationTarget, needs_translation};
pub use self::prompts::PromptTemplate;
pub use self::writeback::WriteBackSink;

// Submodules
pub mod cleanup;
pub mod core;
pub mod planner;
pub mod prompts;
pub mod writeback;
