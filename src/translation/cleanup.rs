/*!
 * Removal of translations whose source document has changed.
 *
 * Translations are only ever produced for missing output files, so an
 * edited source keeps its outdated translations until they are deleted.
 * This module asks git which sources are modified and removes the matching
 * translated files in every configured language.
 */

use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::language_utils::{LanguageEntry, PathClassifier};

/// Source documents under `root` that git reports as modified, relative to
/// `root` and '/'-separated.
///
/// Paths are read NUL-separated so non-ASCII names arrive unquoted.
///
/// When git is unavailable or `root` is not inside a work tree, a warning is
/// logged and nothing is returned.
pub fn modified_documents<P: AsRef<Path>>(root: P, classifier: &PathClassifier) -> Vec<String> {
    let root = root.as_ref();

    let output = Command::new("git")
        .arg("ls-files")
        .arg("-m")
        .arg("-z")
        .current_dir(root)
        .output();

    match output {
        Ok(output) if output.status.success() => {
            let stdout = String::from_utf8_lossy(&output.stdout);
            filter_modified(stdout.split('\0'), classifier)
        }
        Ok(output) => {
            warn!(
                "Could not get modified files from git ({}). Skipping cleanup.",
                String::from_utf8_lossy(&output.stderr).trim()
            );
            Vec::new()
        }
        Err(e) => {
            warn!("Could not run git: {}. Skipping cleanup.", e);
            Vec::new()
        }
    }
}

/// Keep the listed paths that are source documents, not translated output
pub fn filter_modified<'a, I>(lines: I, classifier: &PathClassifier) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .map(|line| line.trim().replace('\\', "/"))
        .filter(|line| !line.is_empty())
        .filter(|line| FileManager::is_document_file(line))
        .filter(|line| !classifier.is_excluded(format!("/{}", line)))
        .collect()
}

/// Existing translations of the given source documents, in every language
pub fn stale_translations<P: AsRef<Path>>(
    root: P,
    modified: &[String],
    languages: &[LanguageEntry],
) -> Vec<PathBuf> {
    let root = root.as_ref();

    modified
        .iter()
        .flat_map(|relative| {
            languages
                .iter()
                .map(move |language| FileManager::translation_output_path(root, relative, &language.code))
        })
        .filter(|path| FileManager::file_exists(path))
        .collect()
}

/// Delete the translations of every modified source document
///
/// Returns the number of files removed.
pub fn clean<P: AsRef<Path>>(root: P, languages: &[LanguageEntry]) -> Result<usize, AppError> {
    let root = root.as_ref();
    let classifier = PathClassifier::new(languages)?;

    let modified = modified_documents(root, &classifier);
    if modified.is_empty() {
        info!("No modified files to clean");
        return Ok(0);
    }

    remove_translations(root, &modified, languages)
}

/// Delete the existing translations of `modified` and return how many were removed
pub fn remove_translations<P: AsRef<Path>>(
    root: P,
    modified: &[String],
    languages: &[LanguageEntry],
) -> Result<usize, AppError> {
    let stale = stale_translations(root, modified, languages);

    for path in &stale {
        FileManager::remove_file(path).map_err(|e| AppError::File(format!("{:#}", e)))?;
        debug!("Removed: {:?}", path);
    }

    info!("Cleaned {} translation file(s)", stale.len());
    Ok(stale.len())
}
