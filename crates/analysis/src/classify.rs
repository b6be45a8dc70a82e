use rustc_hash::FxHashSet;

use crate::model::MatchSet;
use crate::taxonomy::Taxonomy;

/// Match a token sequence against every subcategory's keyword set.
///
/// A subcategory matches when at least one token equals one of its keywords.
/// Token order and repetition do not affect the result.
pub fn classify<S: AsRef<str>>(tokens: &[S], taxonomy: &Taxonomy) -> MatchSet {
    let token_set: FxHashSet<&str> = tokens.iter().map(AsRef::as_ref).collect();
    if token_set.is_empty() {
        return MatchSet::new();
    }

    taxonomy
        .subcategories()
        .filter(|(_, _, sub)| sub.matches(&token_set))
        .map(|(r, _, _)| r)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SubcategoryRef;
    use crate::taxonomy::{Category, Subcategory};

    fn taxonomy() -> Taxonomy {
        Taxonomy::new(vec![
            Category::new(
                "gameplay",
                "Gameplay",
                vec![
                    Subcategory::new("core", "Core", ["楽しい", "面白い"]),
                    Subcategory::new("battle", "Battle", ["バトル", "戦闘"]),
                ],
            ),
            Category::new(
                "monetization",
                "Monetization",
                vec![Subcategory::new("gacha", "Gacha", ["ガチャ", "課金"])],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn single_match() {
        let matches = classify(&["とても", "面白い"], &taxonomy());
        assert_eq!(matches.into_iter().collect::<Vec<_>>(), vec![SubcategoryRef::new(0, 0)]);
    }

    #[test]
    fn matches_across_categories() {
        let matches = classify(&["ガチャ", "の", "バトル", "が", "楽しい"], &taxonomy());
        let refs: Vec<_> = matches.into_iter().collect();
        assert_eq!(
            refs,
            vec![SubcategoryRef::new(0, 0), SubcategoryRef::new(0, 1), SubcategoryRef::new(1, 0)]
        );
    }

    #[test]
    fn no_match() {
        assert!(classify(&["普通"], &taxonomy()).is_empty());
        assert!(classify::<&str>(&[], &taxonomy()).is_empty());
    }

    #[test]
    fn substring_of_token_does_not_match() {
        // "面白いです" as a single token is not the keyword "面白い"
        assert!(classify(&["面白いです"], &taxonomy()).is_empty());
    }

    #[test]
    fn order_and_duplicates_do_not_matter() {
        let t = taxonomy();
        let a = classify(&["課金", "戦闘", "課金"], &t);
        let b = classify(&["戦闘", "課金"], &t);
        assert_eq!(a, b);
    }

    #[test]
    fn owned_tokens() {
        let tokens = vec!["ガチャ".to_string()];
        assert_eq!(classify(&tokens, &taxonomy()).len(), 1);
    }
}
