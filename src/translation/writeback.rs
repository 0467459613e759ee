/*!
 * Persisting translated documents into the mirrored language subtree.
 */

use log::debug;
use std::path::PathBuf;

use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::translation::planner::TranslationTarget;

/// Writes translations and points internal links into the translated subtree
#[derive(Debug, Clone)]
pub struct WriteBackSink {
    /// Canonical documentation link root, e.g. "/docs/"
    link_prefix: String,
}

impl WriteBackSink {
    pub fn new(link_prefix: impl Into<String>) -> Self {
        Self {
            link_prefix: link_prefix.into(),
        }
    }

    /// Replace every occurrence of the link prefix with its language-prefixed form
    pub fn rewrite_links(&self, text: &str, language_code: &str) -> String {
        if self.link_prefix.is_empty() {
            return text.to_string();
        }

        text.replace(&self.link_prefix, &format!("{}{}/", self.link_prefix, language_code))
    }

    /// Rewrite links, create missing directories and write the text verbatim
    pub fn write(&self, target: &TranslationTarget<'_>, translated: &str) -> Result<PathBuf, AppError> {
        let content = self.rewrite_links(translated, &target.language.code);

        FileManager::write_to_file(&target.output_path, &content)
            .map_err(|e| AppError::File(format!("{:#}", e)))?;

        debug!("Wrote {} bytes to {:?}", content.len(), target.output_path);
        Ok(target.output_path.clone())
    }
}

impl Default for WriteBackSink {
    fn default() -> Self {
        Self::new("/docs/")
    }
}
