use std::time::{Duration, Instant};

use serde::Serialize;

use crate::aggregate::aggregate;
use crate::classify::classify;
use crate::load::parse_reviews;
use crate::model::{AggregateRow, ClassifiedReview, IssueKind, RecordIssue, Review, RunSummary};
use crate::project::{comment_records, summary_records, CommentRecord, ProjectionOptions, SummaryRecord};
use crate::taxonomy::Taxonomy;
use crate::tokenize::{tokenize_review, Tokenize};

const PROGRESS_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub projection: ProjectionOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub rows: Vec<AggregateRow>,
    #[serde(skip)]
    pub summary_records: Vec<SummaryRecord>,
    #[serde(skip)]
    pub comment_records: Vec<CommentRecord>,
    pub summary: RunSummary,
}

/// Run the whole pipeline over review TSV text.
///
/// Per-record problems never fail the run; they are logged, skipped, and
/// listed in the returned [`RunSummary`].
pub fn run(input: &str, taxonomy: &Taxonomy, tokenizer: &dyn Tokenize, options: &RunOptions) -> AnalysisResult {
    let (reviews, parse_issues) = parse_reviews(input);
    for issue in &parse_issues {
        log::warn!("skipping record: {}", issue.message);
    }

    let mut summary = RunSummary {
        records_read: reviews.len() + parse_issues.len(),
        records_skipped: parse_issues.len(),
        issues: parse_issues,
        ..Default::default()
    };
    log::info!(
        "loaded {} reviews ({} skipped), {} categories, {} subcategories",
        reviews.len(),
        summary.records_skipped,
        taxonomy.categories().len(),
        taxonomy.subcategory_count()
    );

    let (classified, token_issues) = classify_reviews(&reviews, taxonomy, tokenizer);
    summary.tokenization_failures = token_issues.len();
    summary.issues.extend(token_issues);
    summary.issues.sort_by_key(|i| i.line);
    summary.unclassified = classified.iter().filter(|c| c.is_unclassified()).count();
    summary.classified = classified.len() - summary.unclassified;

    let decimals = options.projection.decimals;
    let rows = aggregate(&classified, taxonomy, decimals);

    AnalysisResult {
        summary_records: summary_records(&rows, &options.projection),
        comment_records: comment_records(&classified, taxonomy),
        rows,
        summary,
    }
}

/// Tokenize and classify each review. Reviews that fail to tokenize are
/// left out of the classified set and returned as issues.
pub fn classify_reviews<'a>(
    reviews: &'a [Review],
    taxonomy: &Taxonomy,
    tokenizer: &dyn Tokenize,
) -> (Vec<ClassifiedReview<'a>>, Vec<RecordIssue>) {
    let total = reviews.len();
    let start = Instant::now();
    let mut last_progress = start;

    let mut classified = Vec::with_capacity(total);
    let mut issues = Vec::new();

    for (done, review) in reviews.iter().enumerate() {
        match tokenize_review(tokenizer, review) {
            Ok(tokens) => {
                let matches = classify(&tokens, taxonomy);
                log::debug!("review '{}' (line {}): {} match(es)", review.id, review.line, matches.len());
                classified.push(ClassifiedReview { review, matches });
            }
            Err(err) => {
                log::warn!("skipping review: {err}");
                issues.push(RecordIssue::new(review.line, IssueKind::Tokenization, &err));
            }
        }

        let now = Instant::now();
        if now.duration_since(last_progress) >= PROGRESS_INTERVAL {
            let processed = done + 1;
            let elapsed = now.duration_since(start).as_secs_f64();
            log::info!(
                "progress: {processed}/{total} ({:.1}%) - {:.1} reviews/s",
                processed as f64 / total as f64 * 100.0,
                processed as f64 / elapsed
            );
            last_progress = now;
        }
    }

    let elapsed = start.elapsed().as_secs_f64();
    let rate = if elapsed > 0.0 { total as f64 / elapsed } else { 0.0 };
    log::info!("analyzed {total} reviews in {elapsed:.1}s ({rate:.1} reviews/s)");

    (classified, issues)
}
