use anyhow::{Result, Context};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::errors::AppError;
use crate::language_utils::PathClassifier;

// @module: File and directory utilities

/// Extensions of documents that are sent for translation (markdown, YAML)
pub const DOCUMENT_EXTENSIONS: [&str; 2] = ["md", "yml"];

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @generates: Mirrored output path for a translated document
    // @params: root, relative_path ('/'-separated), language_code
    pub fn translation_output_path<P: AsRef<Path>>(
        root: P,
        relative_path: &str,
        language_code: &str,
    ) -> PathBuf {
        let mut output = root.as_ref().join(language_code);
        for segment in relative_path.split(['/', '\\']).filter(|s| !s.is_empty()) {
            output.push(segment);
        }
        output
    }

    /// Path of `path` relative to `root`, always joined with '/'
    pub fn normalize_relative_path<P1: AsRef<Path>, P2: AsRef<Path>>(root: P1, path: P2) -> Option<String> {
        let relative = path.as_ref().strip_prefix(root.as_ref()).ok()?;
        let segments: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();

        if segments.is_empty() {
            None
        } else {
            Some(segments.join("/"))
        }
    }

    /// Whether the file has one of the recognized document extensions
    pub fn is_document_file<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .map(|ext| ext.to_string_lossy())
            .is_some_and(|ext| DOCUMENT_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Remove a file
    pub fn remove_file<P: AsRef<Path>>(path: P) -> Result<()> {
        fs::remove_file(&path)
            .with_context(|| format!("Failed to remove file: {:?}", path.as_ref()))
    }
}

/// A document found under the documentation root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// Location on disk
    pub absolute_path: PathBuf,
    /// Location relative to the root, '/'-separated
    pub relative_path: String,
    /// UTF-8 text of the document
    pub content: String,
}

impl SourceDocument {
    /// File identity hint used in prompts, e.g. "/guides/setup.md"
    pub fn display_name(&self) -> String {
        format!("/{}", self.relative_path)
    }
}

/// Walks a documentation root and yields the source documents in it
///
/// Directories are always descended into. Exclusion is decided per file on
/// the root-relative path, so the root's own location never matters.
pub struct DocumentEnumerator<'a> {
    root: PathBuf,
    classifier: &'a PathClassifier,
}

impl<'a> DocumentEnumerator<'a> {
    pub fn new<P: AsRef<Path>>(root: P, classifier: &'a PathClassifier) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            classifier,
        }
    }

    /// Lazily enumerate source documents depth-first, sorted by file name
    pub fn enumerate(&self) -> Result<impl Iterator<Item = Result<SourceDocument, AppError>> + '_, AppError> {
        if !FileManager::dir_exists(&self.root) {
            return Err(AppError::File(format!(
                "Documentation root does not exist or is not a directory: {:?}",
                self.root
            )));
        }

        let entries = WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => return Some(Err(AppError::from(e))),
                };

                if !entry.file_type().is_file() || !FileManager::is_document_file(entry.path()) {
                    return None;
                }

                let relative_path = FileManager::normalize_relative_path(&self.root, entry.path())?;
                if self.classifier.is_excluded(format!("/{}", relative_path)) {
                    debug!("Skipping translated output: {}", relative_path);
                    return None;
                }

                Some(Self::read_document(entry.path(), relative_path))
            });

        Ok(entries)
    }

    fn read_document(path: &Path, relative_path: String) -> Result<SourceDocument, AppError> {
        let content = FileManager::read_to_string(path)
            .map_err(|e| AppError::File(format!("{:#}", e)))?;

        Ok(SourceDocument {
            absolute_path: path.to_path_buf(),
            relative_path,
            content,
        })
    }
}
