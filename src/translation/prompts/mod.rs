/*!
 * Prompt construction for documentation translation.
 *
 * This module provides the prompt template sent to the inference endpoint
 * for every translation target.
 */

pub mod templates;

// Re-export main types
pub use templates::PromptTemplate;
