// storelens CLI - categorize app-store reviews and export summary tables

mod exit_codes;
mod report;
mod settings;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use storelens_analysis::{AnalysisError, Taxonomy, Tokenize, WhitespaceTokenizer};

use exit_codes::{analysis_exit_code, EXIT_CONFIG, EXIT_ERROR, EXIT_SUCCESS};
use report::{render_console, RunReport};
use settings::{RunArgs, RunSettings, TokenizerKind};

#[derive(Parser)]
#[command(name = "storelens")]
#[command(about = "Categorize app-store reviews against a keyword taxonomy")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze reviews and write the summary and comment tables (default)
    #[command(after_help = "\
Examples:
  storelens
  storelens run --input reviews.tsv --taxonomy config/categories.toml
  storelens run --tokenizer whitespace --summary-encoding utf8 --json")]
    Run(RunArgs),

    /// Load and validate a taxonomy file, then print its shape
    Validate {
        /// Taxonomy file (TOML)
        taxonomy: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        None => cmd_run(cli.run.into()),
        Some(Commands::Run(args)) => cmd_run(args.into()),
        Some(Commands::Validate { taxonomy }) => {
            init_logging(false);
            cmd_validate(&taxonomy)
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_logging(quiet: bool) {
    let default_filter = if quiet { "warn" } else { "info" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .try_init();
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    /// Create error from an engine error with the matching exit code.
    pub fn analysis(err: AnalysisError) -> Self {
        let code = analysis_exit_code(&err);
        let hint = match &err {
            AnalysisError::ConfigParse(_) => {
                Some("taxonomy uses [[category]] and [[category.subcategory]] tables with key, name, keywords".to_string())
            }
            AnalysisError::TokenizerInit(_) => {
                Some("retry with --tokenizer whitespace for pre-segmented input".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<AnalysisError> for CliError {
    fn from(err: AnalysisError) -> Self {
        Self::analysis(err)
    }
}

// ============================================================================
// run
// ============================================================================

fn cmd_run(settings: RunSettings) -> Result<(), CliError> {
    init_logging(settings.quiet);

    let taxonomy = load_taxonomy(&settings.taxonomy)?;
    let tokenizer = build_tokenizer(settings.tokenizer)?;
    let input = storelens_io::read_input(&settings.input, settings.input_encoding).map_err(|e| {
        CliError::analysis(e).with_hint(format!(
            "expected a tab-separated review file at {}",
            settings.input.display()
        ))
    })?;

    let result = storelens_analysis::run(&input, &taxonomy, tokenizer.as_ref(), &settings.options);

    // Render both tables before touching either destination so an
    // encoding failure leaves both files as they were.
    let summary_bytes = storelens_io::render_records(&result.summary_records, settings.summary_encoding)
        .map_err(|e| output_error(e, &settings.summary))?;
    let comment_bytes = storelens_io::render_records(&result.comment_records, settings.comments_encoding)
        .map_err(|e| output_error(e, &settings.comments))?;
    storelens_io::write_atomic(&settings.summary, &summary_bytes)?;
    storelens_io::write_atomic(&settings.comments, &comment_bytes)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if settings.json {
        let report = RunReport::new(&result, tokenizer_name(settings.tokenizer), &settings.summary, &settings.comments);
        let json = report
            .to_json()
            .map_err(|e| CliError::new(EXIT_ERROR, format!("cannot serialize report: {e}")))?;
        writeln!(handle, "{}", json).map_err(|e| CliError::new(EXIT_ERROR, e.to_string()))?;
    } else if !settings.quiet {
        let text = render_console(&result, settings.options.projection.decimals);
        write!(handle, "{}", text).map_err(|e| CliError::new(EXIT_ERROR, e.to_string()))?;
    }

    if result.summary.has_issues() {
        log::warn!(
            "{} record(s) skipped, {} review(s) could not be tokenized",
            result.summary.records_skipped,
            result.summary.tokenization_failures
        );
    }
    Ok(())
}

fn output_error(err: AnalysisError, path: &Path) -> CliError {
    CliError::analysis(err).with_hint(format!(
        "while rendering {}; choose --summary-encoding/--comments-encoding utf8 to keep every character",
        path.display()
    ))
}

fn load_taxonomy(path: &Path) -> Result<Taxonomy, CliError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        CliError::new(EXIT_CONFIG, format!("cannot read taxonomy {}: {e}", path.display()))
            .with_hint("pass --taxonomy <file> or create config/categories.toml")
    })?;
    let taxonomy = Taxonomy::from_toml(&text)?;
    log::info!(
        "taxonomy {}: {} categories, {} subcategories, {} keywords",
        path.display(),
        taxonomy.categories().len(),
        taxonomy.subcategory_count(),
        taxonomy.keyword_count()
    );
    Ok(taxonomy)
}

fn build_tokenizer(kind: TokenizerKind) -> Result<Box<dyn Tokenize>, CliError> {
    match kind {
        TokenizerKind::Whitespace => Ok(Box::new(WhitespaceTokenizer)),
        TokenizerKind::Morphological => morphological(),
    }
}

#[cfg(feature = "ipadic")]
fn morphological() -> Result<Box<dyn Tokenize>, CliError> {
    let tokenizer = storelens_analysis::MorphologicalTokenizer::new()?;
    Ok(Box::new(tokenizer))
}

#[cfg(not(feature = "ipadic"))]
fn morphological() -> Result<Box<dyn Tokenize>, CliError> {
    Err(CliError::new(exit_codes::EXIT_TOKENIZER, "this build has no morphological analyzer")
        .with_hint("rebuild with --features ipadic, or use --tokenizer whitespace"))
}

fn tokenizer_name(kind: TokenizerKind) -> &'static str {
    match kind {
        TokenizerKind::Morphological => "morphological",
        TokenizerKind::Whitespace => "whitespace",
    }
}

// ============================================================================
// validate
// ============================================================================

fn cmd_validate(path: &Path) -> Result<(), CliError> {
    let taxonomy = load_taxonomy(path)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let io_err = |e: io::Error| CliError::new(EXIT_ERROR, e.to_string());

    writeln!(handle, "ok: {}", path.display()).map_err(io_err)?;
    for category in taxonomy.categories() {
        writeln!(handle, "{} ({})", category.name, category.key).map_err(io_err)?;
        for sub in &category.subcategories {
            writeln!(handle, "  {} ({}): {} keywords", sub.name, sub.key, sub.keyword_count()).map_err(io_err)?;
        }
    }
    writeln!(
        handle,
        "{} categories, {} subcategories, {} keywords",
        taxonomy.categories().len(),
        taxonomy.subcategory_count(),
        taxonomy.keyword_count()
    )
    .map_err(io_err)?;
    Ok(())
}
