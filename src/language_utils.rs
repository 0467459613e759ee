use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::AppError;

/// Language utilities for translation target handling
///
/// This module holds the configured language table entries and the
/// classifier that recognizes translated output subtrees by their
/// language-code directory segment.
/// A target language: display name plus the path segment it is written under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageEntry {
    /// Display name embedded in prompts (e.g. "Brazilian Portuguese")
    pub name: String,
    /// Directory segment for translated output (e.g. "pt-br")
    pub code: String,
}

impl LanguageEntry {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }
}

/// Validate that a language code can be used as a single path segment
pub fn validate_language_code(code: &str) -> Result<(), AppError> {
    if code.trim().is_empty() {
        return Err(AppError::Config("Language code must not be empty".to_string()));
    }

    if code != code.trim() {
        return Err(AppError::Config(format!("Language code has surrounding whitespace: '{}'", code)));
    }

    if code.contains('/') || code.contains('\\') {
        return Err(AppError::Config(format!("Language code contains a path separator: '{}'", code)));
    }

    if code == "." || code == ".." {
        return Err(AppError::Config(format!("Language code is not a valid directory name: '{}'", code)));
    }

    Ok(())
}

/// Find a language entry by code, ignoring ASCII case
pub fn find_language<'a>(languages: &'a [LanguageEntry], code: &str) -> Option<&'a LanguageEntry> {
    languages.iter().find(|l| l.code.eq_ignore_ascii_case(code.trim()))
}

/// Build the case-insensitive pattern matching any of `codes` as a segment
/// delimited by a separator on both sides
fn segment_pattern(codes: &[&str]) -> Result<Regex, AppError> {
    let alternatives = codes
        .iter()
        .map(|c| regex::escape(c))
        .collect::<Vec<_>>()
        .join("|");

    Regex::new(&format!(r"(?i)[\\/]({})[\\/]", alternatives))
        .map_err(|e| AppError::Config(format!("Failed to compile language exclusion rule: {}", e)))
}

/// Decides whether a path belongs to a translated subtree
///
/// The exclusion rule and the per-language rules are compiled from the same
/// code list, so a path selected for one language is always excluded as a
/// source document.
#[derive(Debug, Clone)]
pub struct PathClassifier {
    /// Rule matching any configured code
    exclusion: Regex,
    /// One rule per configured code, in table order
    per_language: Vec<(String, Regex)>,
}

impl PathClassifier {
    /// Compile the classifier from the configured language table
    pub fn new(languages: &[LanguageEntry]) -> Result<Self, AppError> {
        if languages.is_empty() {
            return Err(AppError::Config("At least one language must be configured".to_string()));
        }

        for language in languages {
            validate_language_code(&language.code)?;
        }

        let codes: Vec<&str> = languages.iter().map(|l| l.code.as_str()).collect();
        let exclusion = segment_pattern(&codes)?;

        let per_language = codes
            .iter()
            .map(|&code| Ok((code.to_string(), segment_pattern(&[code])?)))
            .collect::<Result<Vec<_>, AppError>>()?;

        Ok(Self {
            exclusion,
            per_language,
        })
    }

    /// Returns true if the path contains any configured code as a full segment
    pub fn is_excluded<P: AsRef<Path>>(&self, path: P) -> bool {
        self.exclusion.is_match(&path.as_ref().to_string_lossy())
    }

    /// Returns true if the path contains `code` as a full segment
    ///
    /// Codes that are not configured never match.
    pub fn matches_language<P: AsRef<Path>>(&self, path: P, code: &str) -> bool {
        let path = path.as_ref().to_string_lossy();
        self.per_language
            .iter()
            .find(|(c, _)| c.eq_ignore_ascii_case(code))
            .is_some_and(|(_, rule)| rule.is_match(&path))
    }

    /// The first configured code found as a segment of the path
    pub fn language_of<P: AsRef<Path>>(&self, path: P) -> Option<&str> {
        let path = path.as_ref().to_string_lossy();
        self.per_language
            .iter()
            .find(|(_, rule)| rule.is_match(&path))
            .map(|(code, _)| code.as_str())
    }

    /// Number of configured codes
    pub fn len(&self) -> usize {
        self.per_language.len()
    }

    pub fn is_empty(&self) -> bool {
        self.per_language.is_empty()
    }
}
