//! `storelens-analysis`: review categorization engine.
//!
//! Pure engine crate: receives review text and a taxonomy, returns grouped
//! statistics and the per-comment listing. No file IO; the tokenizer is
//! injected through [`Tokenize`].

pub mod aggregate;
pub mod classify;
pub mod engine;
pub mod error;
pub mod load;
pub mod model;
pub mod project;
pub mod taxonomy;
pub mod tokenize;

pub use engine::{run, AnalysisResult, RunOptions};
pub use error::AnalysisError;
pub use model::{AggregateRow, ClassifiedReview, Review, RowScope, RunSummary, SubcategoryRef};
pub use project::{CommentRecord, ProjectionOptions, SummaryRecord, Tabular};
pub use taxonomy::Taxonomy;
pub use tokenize::{Tokenize, WhitespaceTokenizer};

#[cfg(feature = "ipadic")]
pub use tokenize::MorphologicalTokenizer;
