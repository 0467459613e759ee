/*!
 * Translation planning: which (document, language) pairs still need work.
 */

use std::path::{Path, PathBuf};

use crate::file_utils::{FileManager, SourceDocument};
use crate::language_utils::LanguageEntry;

/// One unit of work: a document and the language it is translated into
#[derive(Debug, Clone)]
pub struct TranslationTarget<'a> {
    pub document: &'a SourceDocument,
    pub language: &'a LanguageEntry,
    /// Where the translation lives: root / code / relative path
    pub output_path: PathBuf,
}

impl<'a> TranslationTarget<'a> {
    pub fn new<P: AsRef<Path>>(root: P, document: &'a SourceDocument, language: &'a LanguageEntry) -> Self {
        Self {
            document,
            language,
            output_path: FileManager::translation_output_path(root, &document.relative_path, &language.code),
        }
    }
}

/// Returns false iff a file already exists at the target's output path.
///
/// Only existence is checked, so a stale or partial translation counts as
/// done until it is removed.
pub fn needs_translation(target: &TranslationTarget<'_>) -> bool {
    !target.output_path.exists()
}
