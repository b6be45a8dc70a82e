use crate::model::{AggregateRow, ClassifiedReview, RowScope};
use crate::taxonomy::Taxonomy;

/// Highest rating a review can carry; satisfaction is the mean against it.
pub const MAX_RATING: f64 = 5.0;

/// Decimal places used for averages unless a run overrides it.
pub const DEFAULT_DECIMALS: u32 = 1;

/// Group classified reviews by subcategory, with one roll-up row per category.
///
/// Rows come out in taxonomy order; each category's `Total` row follows its
/// subcategory rows. The roll-up counts a review once even when it matched
/// several subcategories of the same category.
pub fn aggregate(classified: &[ClassifiedReview<'_>], taxonomy: &Taxonomy, decimals: u32) -> Vec<AggregateRow> {
    let categories = taxonomy.categories();

    // Flat subcategory index = offsets[category] + subcategory
    let mut offsets = Vec::with_capacity(categories.len());
    let mut total_subs = 0;
    for category in categories {
        offsets.push(total_subs);
        total_subs += category.subcategories.len();
    }

    let mut sub_groups: Vec<Vec<usize>> = vec![Vec::new(); total_subs];
    let mut category_groups: Vec<Vec<usize>> = vec![Vec::new(); categories.len()];

    for (idx, item) in classified.iter().enumerate() {
        for r in &item.matches {
            sub_groups[offsets[r.category] + r.subcategory].push(idx);
            // Matches are sorted by category, so a repeat is always the last entry
            let group = &mut category_groups[r.category];
            if group.last() != Some(&idx) {
                group.push(idx);
            }
        }
    }

    let mut rows = Vec::with_capacity(total_subs + categories.len());

    for (ci, category) in categories.iter().enumerate() {
        for (si, sub) in category.subcategories.iter().enumerate() {
            let group = &sub_groups[offsets[ci] + si];
            rows.push(build_row(
                &category.name,
                RowScope::Subcategory(sub.name.clone()),
                group,
                classified,
                decimals,
            ));
        }
        rows.push(build_row(
            &category.name,
            RowScope::Total,
            &category_groups[ci],
            classified,
            decimals,
        ));
    }

    rows
}

fn build_row(
    category: &str,
    scope: RowScope,
    group: &[usize],
    classified: &[ClassifiedReview<'_>],
    decimals: u32,
) -> AggregateRow {
    let average = mean_rating(group.iter().map(|&i| classified[i].review.rating)).map(|m| round_to(m, decimals));
    AggregateRow {
        category: category.to_string(),
        scope,
        comment_count: group.len(),
        average_rating: average,
        // Derived from the reported average so the two columns agree
        satisfaction_score: average.map(|a| satisfaction_score(a, decimals)),
    }
}

/// Arithmetic mean, `None` for an empty group.
pub fn mean_rating(ratings: impl IntoIterator<Item = u8>) -> Option<f64> {
    let (sum, count) = ratings
        .into_iter()
        .fold((0u64, 0u64), |(sum, count), r| (sum + u64::from(r), count + 1));
    if count == 0 {
        None
    } else {
        Some(sum as f64 / count as f64)
    }
}

/// Average rating normalized against [`MAX_RATING`] onto 0..=100.
pub fn satisfaction_score(average: f64, decimals: u32) -> f64 {
    round_to(average / MAX_RATING * 100.0, decimals)
}

pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
