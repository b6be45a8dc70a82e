use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// TOML parse / deserialization error in the taxonomy source.
    ConfigParse(String),
    /// Taxonomy validation error (duplicate names, empty keyword list, etc.).
    ConfigValidation(String),
    /// A review record could not be parsed. Skipped, never fatal.
    DataFormat { line: usize, reason: String },
    /// The analyzer could not tokenize a review's text. Skipped, never fatal.
    Tokenization { line: usize, review_id: String, reason: String },
    /// The morphological analyzer could not be constructed.
    TokenizerInit(String),
    /// Output could not be encoded or written.
    Output(String),
    /// IO error (input file read, etc.).
    Io(String),
}

impl AnalysisError {
    /// Config errors abort the run before any record is processed.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::ConfigParse(_) | Self::ConfigValidation(_))
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::DataFormat { line, reason } => write!(f, "line {line}: {reason}"),
            Self::Tokenization { line, review_id, reason } => {
                write!(f, "line {line}, review '{review_id}': cannot tokenize: {reason}")
            }
            Self::TokenizerInit(msg) => write!(f, "tokenizer initialization error: {msg}"),
            Self::Output(msg) => write!(f, "output error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for AnalysisError {}
