// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use indicatif::{ProgressBar, ProgressStyle};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use polyedit::app_config::{self, Config};
use polyedit::file_utils::FileManager;
use polyedit::formats::FormatKind;
use polyedit::segment::{Segment, SegmentFilter};
use polyedit::session::{EditorSession, SourceFiles};
use polyedit::translation::TranslationService;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
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

/// Input files shared by every document command
#[derive(Args, Debug)]
struct DocumentArgs {
    /// Original (source language) file
    #[arg(value_name = "SOURCE")]
    source: PathBuf,

    /// Existing translation file to merge in
    #[arg(short, long, value_name = "TARGET")]
    target: Option<PathBuf>,

    /// Document format (json, xlf, vtt, txt, pdf, docx); guessed from the extension when omitted
    #[arg(short, long)]
    format: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the segments of a document
    Inspect {
        #[command(flatten)]
        document: DocumentArgs,

        /// Only rows whose key contains this text
        #[arg(long)]
        key: Option<String>,

        /// Only rows whose original contains this text
        #[arg(long)]
        original: Option<String>,

        /// Only rows whose translation contains this text
        #[arg(long)]
        translation: Option<String>,

        /// Print the rows as JSON
        #[arg(long)]
        json: bool,
    },

    /// Batch-translate a document and write the result
    Translate {
        #[command(flatten)]
        document: DocumentArgs,

        /// Profile from the config file (defaults to the active profile)
        #[arg(short, long)]
        profile: Option<String>,

        /// Override the profile's model
        #[arg(short, long)]
        model: Option<String>,

        /// Override the profile's target language
        #[arg(short = 'l', long)]
        target_language: Option<String>,

        /// API key, overriding the profile's
        #[arg(long, env = "POLYEDIT_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Row indices to translate (all rows when omitted)
        #[arg(short, long, value_delimiter = ',')]
        select: Vec<usize>,

        /// Output file (derived from the input names when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Load a document with its translation and export it again
    Convert {
        #[command(flatten)]
        document: DocumentArgs,

        /// Output file (derived from the input names when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that a profile's provider accepts its credentials
    Check {
        /// Profile from the config file (defaults to the active profile)
        #[arg(short, long)]
        profile: Option<String>,

        /// API key, overriding the profile's
        #[arg(long, env = "POLYEDIT_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },

    /// Generate shell completions for polyedit
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// polyedit - bilingual translation file editor
///
/// Loads key/value, XLIFF, subtitle, delimited text and document files, batch
/// translates them through OpenAI or Anthropic and writes them back in their
/// original format.
#[derive(Parser, Debug)]
#[command(name = "polyedit")]
#[command(version)]
#[command(about = "Edit and machine-translate localization files")]
#[command(long_about = "polyedit loads a localization file, translates it with a language model and exports it in its original format.

EXAMPLES:
    polyedit inspect messages.json                       # List all segments
    polyedit inspect app.xlf --original welcome --json   # Filter rows, JSON output
    polyedit translate movie.vtt -l de                   # Translate every cue to German
    polyedit translate app.xlf --select 0,4,7            # Translate three units only
    polyedit convert en.txt -t fr.txt -o merged.txt      # Merge and re-export
    polyedit check --profile Anthropic                   # Test the provider connection
    polyedit completions bash > polyedit.bash            # Generate bash completions

CONFIGURATION:
    Profiles are stored in conf.json by default. Use --config-path for another
    file. A default config with two sample profiles is created when missing.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger; the max level can be lowered later
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level: LevelFilter::Trace }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and tag for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, tag) = Self::style_for_level(record.level());
            let _ = writeln!(std::io::stderr(), "{}{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    CustomLogger::init(LevelFilter::Info)?;
    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "polyedit", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = Config::load_or_create(&cli.config_path)?;
    if let Some(level) = cli.log_level {
        config.log_level = level.into();
    }
    log::set_max_level(config.log_level.into());
    config.validate().context("Configuration validation failed")?;

    match cli.command {
        Commands::Inspect {
            document,
            key,
            original,
            translation,
            json,
        } => {
            let session = open_document(&document)?;
            let filter = SegmentFilter {
                key: key.unwrap_or_default(),
                original: original.unwrap_or_default(),
                translation: translation.unwrap_or_default(),
            };
            print_rows(&session, &filter, json)
        }
        Commands::Translate {
            document,
            profile,
            model,
            target_language,
            api_key,
            select,
            output,
        } => {
            let mut profile = resolve_profile(&config, profile, api_key)?;
            if let Some(model) = model {
                profile.model = model;
            }
            if let Some(language) = target_language {
                profile.target_language = language;
            }
            profile.validate()?;

            let mut session = open_document(&document)?;
            for index in select {
                if !session.toggle_selection(index) {
                    warn!("Ignoring selection {}: the document has {} rows", index, session.model().len());
                }
            }
            run_translation(&mut session, &profile).await?;
            write_output(&mut session, &document, output, Some(&profile.target_language))
        }
        Commands::Convert { document, output } => {
            let mut session = open_document(&document)?;
            write_output(&mut session, &document, output, None)
        }
        Commands::Check { profile, api_key } => {
            let profile = resolve_profile(&config, profile, api_key)?;
            run_check(&profile).await
        }
        Commands::Completions { .. } => Ok(()),
    }
}

fn resolve_profile(config: &Config, name: Option<String>, api_key: Option<String>) -> Result<app_config::Profile> {
    let name = name.unwrap_or_else(|| config.active_profile.clone());
    let mut profile = config
        .profile(&name)
        .cloned()
        .ok_or_else(|| anyhow!("Unknown profile: {}", name))?;
    if let Some(key) = api_key {
        profile.api_key = key;
    }
    Ok(profile)
}

// @returns: Ticking spinner with the given message
fn start_spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed_precise}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

async fn run_check(profile: &app_config::Profile) -> Result<()> {
    let service = TranslationService::new(profile.clone());
    info!(
        "Checking profile '{}' against {} ({})",
        profile.name,
        service.provider_name(),
        profile.effective_model()
    );

    let spinner = start_spinner("Contacting the provider");
    let result = service.test_connection().await;
    spinner.finish_and_clear();

    result.with_context(|| format!("Connection check failed for profile '{}'", profile.name))?;
    info!("{} accepted the credentials of profile '{}'", service.provider_name(), profile.name);
    Ok(())
}

fn resolve_format(document: &DocumentArgs) -> Result<FormatKind> {
    match &document.format {
        Some(name) => name.parse(),
        None => FormatKind::from_path(&document.source)
            .ok_or_else(|| anyhow!("Cannot guess the format of {:?}; pass --format", document.source)),
    }
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|name| name.to_string_lossy().to_string())
}

fn open_document(document: &DocumentArgs) -> Result<EditorSession> {
    let format = resolve_format(document)?;
    let source = FileManager::read_bytes(&document.source)?;
    let target = match &document.target {
        Some(path) => Some(FileManager::read_bytes(path)?),
        None => None,
    };

    let files = SourceFiles {
        original: file_name(&document.source),
        target: document.target.as_deref().and_then(file_name),
    };
    let mut session = EditorSession::new(format);
    session
        .load(&source, target.as_deref(), files)
        .with_context(|| format!("Failed to load {:?}", document.source))?;
    Ok(session)
}

fn print_rows(session: &EditorSession, filter: &SegmentFilter, json: bool) -> Result<()> {
    let model = session.model();
    let rows: Vec<(usize, &Segment)> = filter
        .apply(model)
        .into_iter()
        .filter_map(|index| model.get(index).map(|segment| (index, segment)))
        .collect();

    if json {
        let segments: Vec<&Segment> = rows.iter().map(|(_, segment)| *segment).collect();
        println!("{}", serde_json::to_string_pretty(&segments)?);
        return Ok(());
    }

    for (index, segment) in &rows {
        println!("[{}] {}", index, segment.key);
        println!("    original:    {}", segment.original);
        println!("    translation: {}", segment.translation);
    }
    info!("{} of {} rows shown", rows.len(), model.len());
    Ok(())
}

async fn run_translation(session: &mut EditorSession, profile: &app_config::Profile) -> Result<()> {
    let service = TranslationService::new(profile.clone());
    let rows = if session.selection().is_empty() {
        session.model().len()
    } else {
        session.selection().len()
    };
    info!(
        "Translating {} rows to {} with {} ({})",
        rows,
        service.target_language_name(),
        service.provider_name(),
        profile.effective_model()
    );

    let spinner = start_spinner("Waiting for the provider");
    let result = session.translate(&service).await;
    spinner.finish_and_clear();

    let report = result?;
    if report.shortfall.is_empty() {
        info!("Translated {} rows", report.applied.len());
    } else {
        warn!(
            "Translated {} rows, {} marked as failed",
            report.applied.len(),
            report.shortfall.len()
        );
    }
    for (index, missing) in &report.placeholder_warnings {
        warn!("Row {} lost placeholders: {}", index, missing.join(", "));
    }
    Ok(())
}

fn write_output(
    session: &mut EditorSession,
    document: &DocumentArgs,
    output: Option<PathBuf>,
    target_language: Option<&str>,
) -> Result<()> {
    let serialized = session
        .save_with(&polyedit::formats::PlainTextRenderer, target_language)
        .context("Failed to export document")?;
    for warning in &serialized.warnings {
        warn!("{}", warning);
    }

    let path = output.unwrap_or_else(|| {
        let name = session.output_file_name();
        match document.source.parent() {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    });
    FileManager::write_bytes(&path, &serialized.bytes)?;
    info!("Wrote {}", path.display());
    Ok(())
}
