//! Tokenizer seam.
//!
//! The classifier only needs surface forms, so any analyzer that turns text
//! into an ordered list of strings can be plugged in. Closures implement
//! [`Tokenize`] too, which keeps the engine testable without a dictionary.

use crate::error::AnalysisError;
use crate::model::Review;

pub trait Tokenize {
    /// Split `text` into token surface forms. The error is a human-readable reason.
    fn tokenize(&self, text: &str) -> Result<Vec<String>, String>;
}

impl<F> Tokenize for F
where
    F: Fn(&str) -> Result<Vec<String>, String>,
{
    fn tokenize(&self, text: &str) -> Result<Vec<String>, String> {
        self(text)
    }
}

/// Splits on Unicode whitespace. Used by tests and dictionary-less builds.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenize for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, String> {
        Ok(text.split_whitespace().map(str::to_string).collect())
    }
}

/// Tokenize a review's text with the run's policy applied.
///
/// Blank text yields no tokens without touching the analyzer. Text carrying
/// U+FFFD came from undecodable input bytes and is rejected.
pub fn tokenize_review(tokenizer: &dyn Tokenize, review: &Review) -> Result<Vec<String>, AnalysisError> {
    let fail = |reason: String| AnalysisError::Tokenization {
        line: review.line,
        review_id: review.id.clone(),
        reason,
    };

    if review.text.contains(char::REPLACEMENT_CHARACTER) {
        return Err(fail("text contains undecodable bytes".into()));
    }
    if review.text.trim().is_empty() {
        return Ok(Vec::new());
    }

    tokenizer.tokenize(&review.text).map_err(fail)
}

// ---------------------------------------------------------------------------
// Morphological analyzer (lindera + IPADIC)
// ---------------------------------------------------------------------------

#[cfg(feature = "ipadic")]
pub use morphological::MorphologicalTokenizer;

#[cfg(feature = "ipadic")]
mod morphological {
    use lindera::dictionary::{load_embedded_dictionary, DictionaryKind};
    use lindera::mode::Mode;
    use lindera::segmenter::Segmenter;
    use lindera::tokenizer::Tokenizer;

    use super::Tokenize;
    use crate::error::AnalysisError;

    /// Japanese morphological analyzer over the embedded IPADIC dictionary.
    pub struct MorphologicalTokenizer {
        tokenizer: Tokenizer,
    }

    impl MorphologicalTokenizer {
        pub fn new() -> Result<Self, AnalysisError> {
            let dictionary = load_embedded_dictionary(DictionaryKind::IPADIC)
                .map_err(|e| AnalysisError::TokenizerInit(e.to_string()))?;
            let segmenter = Segmenter::new(Mode::Normal, dictionary, None);
            log::debug!("loaded embedded IPADIC dictionary");
            Ok(Self {
                tokenizer: Tokenizer::new(segmenter),
            })
        }
    }

    impl Tokenize for MorphologicalTokenizer {
        fn tokenize(&self, text: &str) -> Result<Vec<String>, String> {
            let tokens = self.tokenizer.tokenize(text).map_err(|e| e.to_string())?;
            Ok(tokens
                .iter()
                .map(|t| t.surface.to_string())
                .filter(|s| !s.trim().is_empty())
                .collect())
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(text: &str) -> Review {
        Review {
            line: 4,
            id: "r1".into(),
            date: "2024-01-01".into(),
            author: "a".into(),
            text: text.into(),
            rating: 3,
        }
    }

    #[test]
    fn whitespace_tokenizer_splits() {
        let tokens = WhitespaceTokenizer.tokenize(" とても  面白い\u{3000}ゲーム ").unwrap();
        assert_eq!(tokens, vec!["とても", "面白い", "ゲーム"]);
    }

    #[test]
    fn blank_text_skips_analyzer() {
        let panicking = |_: &str| -> Result<Vec<String>, String> { panic!("analyzer called") };
        assert!(tokenize_review(&panicking, &review("   ")).unwrap().is_empty());
        assert!(tokenize_review(&panicking, &review("")).unwrap().is_empty());
    }

    #[test]
    fn replacement_char_is_a_tokenization_error() {
        let err = tokenize_review(&WhitespaceTokenizer, &review("壊れた\u{FFFD}文字")).unwrap_err();
        match err {
            AnalysisError::Tokenization { line, review_id, .. } => {
                assert_eq!(line, 4);
                assert_eq!(review_id, "r1");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn analyzer_failure_is_wrapped() {
        let failing = |_: &str| -> Result<Vec<String>, String> { Err("boom".into()) };
        let err = tokenize_review(&failing, &review("text")).unwrap_err();
        assert!(err.to_string().contains("boom"));
    }
}
