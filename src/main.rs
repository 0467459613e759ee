// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info};
use std::io::Write;
use std::path::PathBuf;

use docsling::app_config::{self, Config};
use docsling::providers::openai::OpenAI;
use docsling::translation::cleanup;
use docsling::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate documentation into all configured languages, or only CODE
    Translate {
        /// Language code from the configured table (e.g. 'pt-br', 'es')
        #[arg(value_name = "CODE")]
        language: Option<String>,
    },

    /// Remove translations of source documents that git reports as modified
    Clean,

    /// Clean outdated translations, then translate all languages (default command)
    All,

    /// List the configured language codes
    Languages,

    /// Generate shell completions for docsling
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// docsling - documentation translation with AI
///
/// Translates markdown and YAML documentation into a mirrored tree per
/// language code using an OpenAI-compatible inference endpoint.
#[derive(Parser, Debug)]
#[command(name = "docsling")]
#[command(version)]
#[command(about = "AI-powered documentation translation tool")]
#[command(long_about = "docsling translates a documentation tree into every configured language, writing
each translation to <root>/<code>/<relative path>. Existing translations are never redone.

EXAMPLES:
    docsling                          # Clean outdated translations, then translate all languages
    docsling translate pt-br          # Translate Brazilian Portuguese only
    docsling clean                    # Remove translations of modified sources
    docsling all                      # Clean, then translate
    docsling -r site/docs translate   # Use another documentation root
    docsling completions bash > docsling.bash

ENVIRONMENT:
    GROQ_API_KEY    API key for the inference endpoint (the variable name is configurable)

CONFIGURATION:
    Configuration is stored in conf.json by default. If the file doesn't exist,
    a default one is created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: PathBuf,

    /// Documentation root (overrides the configuration)
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Tag and ANSI colour for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("ERROR", "\x1B[1;31m"),
            Level::Warn => ("WARNING", "\x1B[1;33m"),
            Level::Info => ("INFO", "\x1B[1;34m"),
            Level::Debug => ("DEBUG", "\x1B[1;36m"),
            Level::Trace => ("TRACE", "\x1B[1;35m"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (tag, colour) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{} {}[{}]\x1B[0m {}", now, colour, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = CustomLogger::init(LevelFilter::Info) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let cli = CommandLineOptions::parse();

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: CommandLineOptions) -> Result<()> {
    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "docsling", &mut std::io::stdout());
        return Ok(());
    }

    // A level given on the command line wins over the config file
    if let Some(level) = &cli.log_level {
        log::set_max_level(level_filter(&level.clone().into()));
    }

    let mut config = Config::load_or_create(&cli.config_path)?;

    if let Some(level) = cli.log_level {
        config.log_level = level.into();
    } else {
        log::set_max_level(level_filter(&config.log_level));
    }

    if let Some(root) = cli.root {
        config.docs_root = root;
    }

    config.validate().context("Configuration validation failed")?;

    match command_or_default(cli.command) {
        Commands::Translate { language } => translate(config, language.as_deref()).await,
        Commands::Clean => clean(&config),
        Commands::All => {
            clean(&config)?;
            translate(config, None).await
        }
        Commands::Languages => {
            for language in &config.languages {
                println!("{:<6} - {}", language.code, language.name);
            }
            Ok(())
        }
        Commands::Completions { .. } => Ok(()),
    }
}

// @returns: The requested command, or clean-then-translate when none was given
fn command_or_default(command: Option<Commands>) -> Commands {
    command.unwrap_or(Commands::All)
}

async fn translate(config: Config, language: Option<&str>) -> Result<()> {
    let languages = config.select_languages(language)?;
    let api_key = config.inference.api_key()?;

    if let Some(code) = language {
        let names: Vec<&str> = languages.iter().map(|l| l.name.as_str()).collect();
        info!("Translating to: {} ({})", names.join(", "), code);
    }

    let root = config.docs_root.clone();
    let provider = OpenAI::new(api_key, config.inference.clone())?;
    let controller = Controller::with_config(config, provider)?.with_progress(true);

    let summary = controller.run(&root, &languages).await?;
    info!(
        "Visited {} document(s): {} translated, {} already up to date",
        summary.documents, summary.translated, summary.skipped
    );

    Ok(())
}

fn clean(config: &Config) -> Result<()> {
    cleanup::clean(&config.docs_root, &config.languages)?;
    Ok(())
}
