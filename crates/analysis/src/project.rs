//! Reshape engine results into the two output tables.

use serde::Serialize;

use crate::aggregate::DEFAULT_DECIMALS;
use crate::model::{AggregateRow, ClassifiedReview, RowScope};
use crate::taxonomy::Taxonomy;

pub const DEFAULT_TOTAL_LABEL: &str = "total";

#[derive(Debug, Clone)]
pub struct ProjectionOptions {
    pub decimals: u32,
    /// Subcategory column value for category roll-up rows.
    pub total_label: String,
    /// Drop subcategory rows with no comments. Roll-up rows are always kept.
    pub skip_empty: bool,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            decimals: DEFAULT_DECIMALS,
            total_label: DEFAULT_TOTAL_LABEL.to_string(),
            skip_empty: false,
        }
    }
}

/// A flat output record with a fixed header row.
pub trait Tabular: Serialize {
    /// Column titles, in field order. Written even when there are no records.
    const HEADERS: &'static [&'static str];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRecord {
    pub category: String,
    pub subcategory: String,
    pub comment_count: usize,
    /// Empty when there are no comments.
    pub average_rating: String,
    /// Empty when there are no comments.
    pub satisfaction_score: String,
}

impl Tabular for SummaryRecord {
    const HEADERS: &'static [&'static str] =
        &["カテゴリ", "サブカテゴリ", "コメント件数", "平均評価", "ユーザー満足度スコア"];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentRecord {
    pub category: String,
    pub subcategory: String,
    pub rating: u8,
    pub text: String,
}

impl Tabular for CommentRecord {
    const HEADERS: &'static [&'static str] = &["カテゴリ", "サブカテゴリ", "評価", "コメント"];
}

pub fn summary_records(rows: &[AggregateRow], options: &ProjectionOptions) -> Vec<SummaryRecord> {
    rows.iter()
        .filter(|row| !(options.skip_empty && !row.is_total() && row.comment_count == 0))
        .map(|row| SummaryRecord {
            category: row.category.clone(),
            subcategory: match &row.scope {
                RowScope::Subcategory(name) => name.clone(),
                RowScope::Total => options.total_label.clone(),
            },
            comment_count: row.comment_count,
            average_rating: format_score(row.average_rating, options.decimals),
            satisfaction_score: format_score(row.satisfaction_score, options.decimals),
        })
        .collect()
}

/// One record per (review, matched subcategory), in taxonomy order then input order.
pub fn comment_records(classified: &[ClassifiedReview<'_>], taxonomy: &Taxonomy) -> Vec<CommentRecord> {
    let mut pairs: Vec<_> = classified
        .iter()
        .enumerate()
        .flat_map(|(idx, item)| item.matches.iter().map(move |r| (*r, idx)))
        .collect();
    pairs.sort_unstable();

    pairs
        .into_iter()
        .filter_map(|(r, idx)| {
            let (category, sub) = taxonomy.resolve(r)?;
            let review = classified[idx].review;
            Some(CommentRecord {
                category: category.name.clone(),
                subcategory: sub.name.clone(),
                rating: review.rating,
                text: review.text.clone(),
            })
        })
        .collect()
}

pub fn format_score(value: Option<f64>, decimals: u32) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals as usize, v),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MatchSet, Review, SubcategoryRef};
    use crate::taxonomy::{Category, Subcategory};

    fn taxonomy() -> Taxonomy {
        Taxonomy::new(vec![
            Category::new(
                "gameplay",
                "ゲームプレイ",
                vec![
                    Subcategory::new("core", "コア", ["面白い"]),
                    Subcategory::new("battle", "バトル", ["バトル"]),
                ],
            ),
            Category::new("ui", "UI", vec![Subcategory::new("menu", "メニュー", ["メニュー"])]),
        ])
        .unwrap()
    }

    fn review(id: &str, rating: u8, text: &str) -> Review {
        Review {
            line: 1,
            id: id.into(),
            date: String::new(),
            author: String::new(),
            text: text.into(),
            rating,
        }
    }

    fn matches(refs: &[(usize, usize)]) -> MatchSet {
        refs.iter().map(|&(c, s)| SubcategoryRef::new(c, s)).collect()
    }

    fn row(scope: RowScope, count: usize, avg: Option<f64>) -> AggregateRow {
        AggregateRow {
            category: "ゲームプレイ".into(),
            scope,
            comment_count: count,
            average_rating: avg,
            satisfaction_score: avg.map(|a| a * 20.0),
        }
    }

    #[test]
    fn summary_formats_and_labels() {
        let rows = vec![
            row(RowScope::Subcategory("コア".into()), 2, Some(4.5)),
            row(RowScope::Subcategory("バトル".into()), 0, None),
            row(RowScope::Total, 2, Some(4.5)),
        ];
        let options = ProjectionOptions {
            total_label: "合計".into(),
            ..Default::default()
        };
        let records = summary_records(&rows, &options);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].average_rating, "4.5");
        assert_eq!(records[0].satisfaction_score, "90.0");
        assert_eq!(records[1].comment_count, 0);
        assert_eq!(records[1].average_rating, "");
        assert_eq!(records[2].subcategory, "合計");
    }

    #[test]
    fn skip_empty_keeps_totals() {
        let rows = vec![
            row(RowScope::Subcategory("コア".into()), 0, None),
            row(RowScope::Total, 0, None),
        ];
        let options = ProjectionOptions {
            skip_empty: true,
            ..Default::default()
        };
        let records = summary_records(&rows, &options);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].subcategory, DEFAULT_TOTAL_LABEL);
    }

    #[test]
    fn comment_rows_in_taxonomy_then_input_order() {
        let r1 = review("1", 5, "バトルが面白い");
        let r2 = review("2", 2, "メニューが重い");
        let r3 = review("3", 4, "面白い");
        let classified = vec![
            ClassifiedReview { review: &r1, matches: matches(&[(0, 0), (0, 1)]) },
            ClassifiedReview { review: &r2, matches: matches(&[(1, 0)]) },
            ClassifiedReview { review: &r3, matches: matches(&[(0, 0)]) },
        ];
        let records = comment_records(&classified, &taxonomy());
        let flat: Vec<_> = records
            .iter()
            .map(|r| (r.subcategory.as_str(), r.rating, r.text.as_str()))
            .collect();
        assert_eq!(
            flat,
            vec![
                ("コア", 5, "バトルが面白い"),
                ("コア", 4, "面白い"),
                ("バトル", 5, "バトルが面白い"),
                ("メニュー", 2, "メニューが重い"),
            ]
        );
        assert_eq!(records[3].category, "UI");
    }

    #[test]
    fn format_score_precision() {
        assert_eq!(format_score(Some(5.0), 1), "5.0");
        assert_eq!(format_score(Some(86.67), 2), "86.67");
        assert_eq!(format_score(None, 1), "");
    }
}
