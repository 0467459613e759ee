use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use std::path::Path;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::errors::AppError;
use crate::file_utils::DocumentEnumerator;
use crate::language_utils::{LanguageEntry, PathClassifier};
use crate::providers::Provider;
use crate::translation::{
    PromptTemplate, RetryPolicy, TranslationService, TranslationTarget, WriteBackSink, needs_translation,
};

// @module: Application controller for documentation translation

/// Counters reported at the end of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Source documents visited
    pub documents: usize,
    /// Targets written during this run
    pub translated: usize,
    /// Targets whose output already existed
    pub skipped: usize,
}

/// Main application controller for documentation translation
pub struct Controller<P: Provider> {
    // @field: App configuration
    config: Config,
    // @field: Exclusion rules built from the full language table
    classifier: PathClassifier,
    // @field: Inference with rate-limit back-off
    translator: TranslationService<P>,
    // @field: Output persistence
    sink: WriteBackSink,
    // @field: Prompt for every target
    prompt: PromptTemplate,
    // @field: Draw a spinner while running
    show_progress: bool,
}

impl<P: Provider> Controller<P> {
    // @method: Create a new controller with the given configuration and provider
    pub fn with_config(config: Config, provider: P) -> Result<Self, AppError> {
        config.validate()?;

        let classifier = PathClassifier::new(&config.languages)?;
        let translator = TranslationService::new(provider, RetryPolicy::from_config(&config.inference));
        let sink = WriteBackSink::new(config.link_prefix.clone());

        Ok(Self {
            config,
            classifier,
            translator,
            sink,
            prompt: PromptTemplate::documentation_translator(),
            show_progress: false,
        })
    }

    /// Enable or disable the progress spinner
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Use a different prompt template
    pub fn with_prompt(mut self, prompt: PromptTemplate) -> Self {
        self.prompt = prompt;
        self
    }

    /// The translation service, for inspecting the provider
    pub fn translator(&self) -> &TranslationService<P> {
        &self.translator
    }

    /// Translate every source document under `root` into each of `languages`
    ///
    /// Work is strictly sequential. The first error stops the run; output
    /// already written stays on disk and is skipped next time.
    pub async fn run<R: AsRef<Path>>(&self, root: R, languages: &[LanguageEntry]) -> Result<RunSummary, AppError> {
        let root = root.as_ref();
        let start_time = Instant::now();
        let delay = self.config.inference.rate_limit_delay();

        let enumerator = DocumentEnumerator::new(root, &self.classifier);
        let documents = enumerator.enumerate()?;

        let progress = self.create_progress_bar();
        let mut summary = RunSummary::default();

        for document in documents {
            let document = document?;
            summary.documents += 1;

            for language in languages {
                let target = TranslationTarget::new(root, &document, language);

                if !needs_translation(&target) {
                    debug!("Already translated: {:?}", target.output_path);
                    summary.skipped += 1;
                    continue;
                }

                progress.set_message(format!("{} -> {}", document.relative_path, language.code));
                self.translate_target(&target).await?;

                info!("Translated: {} ({})", document.display_name(), language.code);
                summary.translated += 1;
                progress.inc(1);

                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
        }

        progress.finish_and_clear();

        if summary.translated == 0 {
            info!("No files needed translation (all up to date)");
        } else {
            info!(
                "Translated {} file(s) in {}",
                summary.translated,
                Self::format_duration(start_time.elapsed())
            );
        }

        Ok(summary)
    }

    /// Render the prompt, call the endpoint and persist the result
    async fn translate_target(&self, target: &TranslationTarget<'_>) -> Result<(), AppError> {
        let prompt = self.prompt.render(
            &self.config.project_description,
            &target.language.name,
            &target.document.display_name(),
            &target.document.content,
        );

        let translated = self.translator.translate(&prompt).await?;
        self.sink.write(target, &translated)?;
        Ok(())
    }

    fn create_progress_bar(&self) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let progress = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} [{elapsed_precise}] {pos} translated {wide_msg}") {
            progress.set_style(style);
        }
        progress.enable_steady_tick(Duration::from_millis(120));
        progress
    }

    // @returns: Human-readable duration, e.g. "1m 05s"
    fn format_duration(duration: Duration) -> String {
        let secs = duration.as_secs();
        if secs >= 60 {
            format!("{}m {:02}s", secs / 60, secs % 60)
        } else {
            format!("{}.{:01}s", secs, duration.subsec_millis() / 100)
        }
    }
}
