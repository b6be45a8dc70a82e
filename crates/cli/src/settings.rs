//! Run settings: every path and knob a run needs, passed explicitly into the pipeline.

use std::path::PathBuf;

use clap::{Args, ValueEnum};

use storelens_analysis::aggregate::DEFAULT_DECIMALS;
use storelens_analysis::project::DEFAULT_TOTAL_LABEL;
use storelens_analysis::{ProjectionOptions, RunOptions};
use storelens_io::{InputEncoding, OutputEncoding};

pub const DEFAULT_INPUT: &str = "input_data.tsv";
pub const DEFAULT_TAXONOMY: &str = "config/categories.toml";
pub const DEFAULT_SUMMARY: &str = "output/summary.csv";
pub const DEFAULT_COMMENTS: &str = "output/comments.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputEncodingArg {
    Auto,
    Utf8,
    ShiftJis,
}

impl From<InputEncodingArg> for InputEncoding {
    fn from(arg: InputEncodingArg) -> Self {
        match arg {
            InputEncodingArg::Auto => Self::Auto,
            InputEncodingArg::Utf8 => Self::Utf8,
            InputEncodingArg::ShiftJis => Self::ShiftJis,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputEncodingArg {
    Utf8,
    ShiftJis,
}

impl From<OutputEncodingArg> for OutputEncoding {
    fn from(arg: OutputEncodingArg) -> Self {
        match arg {
            OutputEncodingArg::Utf8 => Self::Utf8,
            OutputEncodingArg::ShiftJis => Self::ShiftJis,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TokenizerKind {
    /// Japanese morphological analysis (IPADIC)
    Morphological,
    /// Split on whitespace only
    Whitespace,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Review TSV: id, date, author, text, rating (no header row)
    #[arg(long, default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Category taxonomy (TOML)
    #[arg(long, default_value = DEFAULT_TAXONOMY)]
    pub taxonomy: PathBuf,

    /// Summary table output (CSV)
    #[arg(long, default_value = DEFAULT_SUMMARY)]
    pub summary: PathBuf,

    /// Comment listing output (CSV)
    #[arg(long, default_value = DEFAULT_COMMENTS)]
    pub comments: PathBuf,

    /// Encoding of the review input
    #[arg(long, value_enum, default_value_t = InputEncodingArg::Auto)]
    pub input_encoding: InputEncodingArg,

    /// Encoding of the summary table
    #[arg(long, value_enum, default_value_t = OutputEncodingArg::ShiftJis)]
    pub summary_encoding: OutputEncodingArg,

    /// Encoding of the comment listing
    #[arg(long, value_enum, default_value_t = OutputEncodingArg::Utf8)]
    pub comments_encoding: OutputEncodingArg,

    /// Decimal places for averages and scores
    #[arg(long, default_value_t = DEFAULT_DECIMALS, value_parser = clap::value_parser!(u32).range(0..=6))]
    pub precision: u32,

    /// Subcategory label used on category roll-up rows
    #[arg(long, default_value = DEFAULT_TOTAL_LABEL)]
    pub total_label: String,

    /// Omit subcategories with no comments from the summary table
    #[arg(long)]
    pub skip_empty: bool,

    /// Tokenizer used to split review text
    #[arg(long, value_enum, default_value_t = TokenizerKind::Morphological)]
    pub tokenizer: TokenizerKind,

    /// Print the run report as JSON on stdout instead of the human summary
    #[arg(long)]
    pub json: bool,

    /// Suppress the human summary and info logging
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

/// Resolved settings for one run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub input: PathBuf,
    pub taxonomy: PathBuf,
    pub summary: PathBuf,
    pub comments: PathBuf,
    pub input_encoding: InputEncoding,
    pub summary_encoding: OutputEncoding,
    pub comments_encoding: OutputEncoding,
    pub tokenizer: TokenizerKind,
    pub options: RunOptions,
    pub json: bool,
    pub quiet: bool,
}

impl From<RunArgs> for RunSettings {
    fn from(args: RunArgs) -> Self {
        Self {
            input: args.input,
            taxonomy: args.taxonomy,
            summary: args.summary,
            comments: args.comments,
            input_encoding: args.input_encoding.into(),
            summary_encoding: args.summary_encoding.into(),
            comments_encoding: args.comments_encoding.into(),
            tokenizer: args.tokenizer,
            options: RunOptions {
                projection: ProjectionOptions {
                    decimals: args.precision,
                    total_label: args.total_label,
                    skip_empty: args.skip_empty,
                },
            },
            json: args.json,
            quiet: args.quiet,
        }
    }
}
