// Run report: console summary and JSON envelope

use std::fmt::Write as _;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use storelens_analysis::{AggregateRow, AnalysisResult, RowScope, RunSummary};
use storelens_analysis::project::format_score;

const RULE: &str = "==================================================";

#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub meta: ReportMeta,
    pub summary: &'a RunSummary,
    pub rows: &'a [AggregateRow],
    pub outputs: ReportOutputs,
}

#[derive(Debug, Serialize)]
pub struct ReportMeta {
    pub engine_version: &'static str,
    pub tokenizer: String,
    pub run_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ReportOutputs {
    pub summary: String,
    pub comments: String,
}

impl<'a> RunReport<'a> {
    pub fn new(result: &'a AnalysisResult, tokenizer: &str, summary_path: &Path, comments_path: &Path) -> Self {
        Self {
            meta: ReportMeta {
                engine_version: env!("CARGO_PKG_VERSION"),
                tokenizer: tokenizer.to_string(),
                run_at: Utc::now(),
            },
            summary: &result.summary,
            rows: &result.rows,
            outputs: ReportOutputs {
                summary: summary_path.display().to_string(),
                comments: comments_path.display().to_string(),
            },
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Human-readable summary, one block per category.
///
/// Subcategories without comments are left out here; they still appear in
/// the summary table.
pub fn render_console(result: &AnalysisResult, decimals: u32) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "ゲームストアレビュー解析結果");
    let _ = writeln!(out, "{RULE}");

    let mut pending: Vec<&AggregateRow> = Vec::new();
    for row in &result.rows {
        match &row.scope {
            RowScope::Subcategory(_) => pending.push(row),
            RowScope::Total => {
                let _ = writeln!(out);
                let _ = writeln!(out, "■ {}", row.category);
                let _ = writeln!(out, "  コメント件数: {}", row.comment_count);
                let _ = writeln!(out, "  平均評価: {}", score_or_dash(row.average_rating, decimals));
                let _ = writeln!(
                    out,
                    "  ユーザー満足度スコア: {}",
                    score_or_dash(row.satisfaction_score, decimals)
                );
                for sub in pending.drain(..).filter(|s| s.comment_count > 0) {
                    if let RowScope::Subcategory(name) = &sub.scope {
                        let _ = writeln!(
                            out,
                            "    - {name}: {}件 (平均 {}, 満足度 {})",
                            sub.comment_count,
                            score_or_dash(sub.average_rating, decimals),
                            score_or_dash(sub.satisfaction_score, decimals)
                        );
                    }
                }
            }
        }
    }

    let s = &result.summary;
    let _ = writeln!(out);
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(
        out,
        "読み込み {} 件 / 分類 {} 件 / 未分類 {} 件 / スキップ {} 件",
        s.records_read,
        s.classified,
        s.unclassified,
        s.records_skipped + s.tokenization_failures
    );
    for issue in &s.issues {
        let _ = writeln!(out, "  ! {} ({})", issue.message, issue.kind);
    }
    out
}

fn score_or_dash(value: Option<f64>, decimals: u32) -> String {
    match value {
        Some(_) => format_score(value, decimals),
        None => "-".to_string(),
    }
}
