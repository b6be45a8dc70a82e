use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::AnalysisError;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single parsed row from the review TSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Review {
    /// 1-based line number in the input, for diagnostics.
    pub line: usize,
    pub id: String,
    pub date: String,
    pub author: String,
    pub text: String,
    /// Always within 1..=5 once parsed.
    pub rating: u8,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Position of a subcategory inside a [`crate::Taxonomy`].
///
/// Ordering follows taxonomy order: category first, then subcategory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubcategoryRef {
    pub category: usize,
    pub subcategory: usize,
}

impl SubcategoryRef {
    pub fn new(category: usize, subcategory: usize) -> Self {
        Self { category, subcategory }
    }
}

/// Subcategories a review matched.
pub type MatchSet = BTreeSet<SubcategoryRef>;

/// A review that tokenized successfully, with everything it matched.
/// An empty `matches` set means the review is unclassified.
#[derive(Debug, Clone)]
pub struct ClassifiedReview<'a> {
    pub review: &'a Review,
    pub matches: MatchSet,
}

impl ClassifiedReview<'_> {
    pub fn is_unclassified(&self) -> bool {
        self.matches.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum RowScope {
    Subcategory(String),
    Total,
}

/// One line of the summary table.
///
/// `average_rating` and `satisfaction_score` are `None` when
/// `comment_count == 0`; that is the sentinel for "no data", not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow {
    pub category: String,
    pub scope: RowScope,
    pub comment_count: usize,
    pub average_rating: Option<f64>,
    pub satisfaction_score: Option<f64>,
}

impl AggregateRow {
    pub fn is_total(&self) -> bool {
        self.scope == RowScope::Total
    }
}

// ---------------------------------------------------------------------------
// Run summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    DataFormat,
    Tokenization,
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DataFormat => write!(f, "data_format"),
            Self::Tokenization => write!(f, "tokenization"),
        }
    }
}

/// A record or review that was skipped during the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordIssue {
    pub line: usize,
    pub kind: IssueKind,
    pub message: String,
}

impl RecordIssue {
    pub fn new(line: usize, kind: IssueKind, err: &AnalysisError) -> Self {
        Self { line, kind, message: err.to_string() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub records_read: usize,
    pub records_skipped: usize,
    pub tokenization_failures: usize,
    pub classified: usize,
    pub unclassified: usize,
    pub issues: Vec<RecordIssue>,
}

impl RunSummary {
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}
