//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args)               |
//! | 10-19   | run              | Taxonomy, input, output, tokenizer       |
//!
//! Skipped records are not failures: a run that skips rows still exits 0
//! and lists them in its report.

use storelens_analysis::AnalysisError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
/// clap exits with this code on its own for parse failures.
#[allow(dead_code)]
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Run (10-19)
// =============================================================================

/// Taxonomy file unreadable, malformed, or invalid.
pub const EXIT_CONFIG: u8 = 10;

/// Review input file missing or unreadable.
pub const EXIT_INPUT: u8 = 11;

/// Output could not be encoded or written.
pub const EXIT_OUTPUT: u8 = 12;

/// Morphological analyzer unavailable or failed to load its dictionary.
pub const EXIT_TOKENIZER: u8 = 13;

/// Map an engine error to its exit code.
pub fn analysis_exit_code(err: &AnalysisError) -> u8 {
    match err {
        AnalysisError::ConfigParse(_) | AnalysisError::ConfigValidation(_) => EXIT_CONFIG,
        AnalysisError::Io(_) => EXIT_INPUT,
        AnalysisError::Output(_) => EXIT_OUTPUT,
        AnalysisError::TokenizerInit(_) => EXIT_TOKENIZER,
        AnalysisError::DataFormat { .. } | AnalysisError::Tokenization { .. } => EXIT_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct() {
        let codes = [EXIT_SUCCESS, EXIT_ERROR, EXIT_USAGE, EXIT_CONFIG, EXIT_INPUT, EXIT_OUTPUT, EXIT_TOKENIZER];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn maps_engine_errors() {
        assert_eq!(analysis_exit_code(&AnalysisError::ConfigValidation("x".into())), EXIT_CONFIG);
        assert_eq!(analysis_exit_code(&AnalysisError::Io("x".into())), EXIT_INPUT);
        assert_eq!(analysis_exit_code(&AnalysisError::Output("x".into())), EXIT_OUTPUT);
        assert_eq!(analysis_exit_code(&AnalysisError::TokenizerInit("x".into())), EXIT_TOKENIZER);
    }
}
