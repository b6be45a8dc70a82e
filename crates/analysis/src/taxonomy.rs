use rustc_hash::FxHashSet;
use serde::Deserialize;

use crate::error::AnalysisError;
use crate::model::SubcategoryRef;

// ---------------------------------------------------------------------------
// File format
// ---------------------------------------------------------------------------

// Arrays of tables keep document order, which drives output row order.
#[derive(Debug, Deserialize)]
struct TaxonomyFile {
    #[serde(default, rename = "category")]
    categories: Vec<CategoryEntry>,
}

#[derive(Debug, Deserialize)]
struct CategoryEntry {
    key: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "subcategory")]
    subcategories: Vec<SubcategoryEntry>,
}

#[derive(Debug, Deserialize)]
struct SubcategoryEntry {
    key: String,
    #[serde(default)]
    name: Option<String>,
    keywords: Vec<String>,
}

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Subcategory {
    pub key: String,
    pub name: String,
    keywords: FxHashSet<String>,
}

impl Subcategory {
    /// Keywords are trimmed and deduplicated. An empty `name` falls back to the key.
    pub fn new<I, S>(key: impl Into<String>, name: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let key = key.into();
        let name = non_empty_or(name.into(), &key);
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_string())
            .collect();
        Self { key, name, keywords }
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    pub fn keyword_count(&self) -> usize {
        self.keywords.len()
    }

    /// True when any token is one of this subcategory's keywords.
    pub fn matches(&self, tokens: &FxHashSet<&str>) -> bool {
        // Iterate the smaller side; both are hash sets.
        if tokens.len() < self.keywords.len() {
            tokens.iter().any(|t| self.keywords.contains(*t))
        } else {
            self.keywords.iter().any(|k| tokens.contains(k.as_str()))
        }
    }
}

#[derive(Debug, Clone)]
pub struct Category {
    pub key: String,
    pub name: String,
    pub subcategories: Vec<Subcategory>,
}

impl Category {
    pub fn new(key: impl Into<String>, name: impl Into<String>, subcategories: Vec<Subcategory>) -> Self {
        let key = key.into();
        let name = non_empty_or(name.into(), &key);
        Self { key, name, subcategories }
    }
}

/// Category → subcategory → keyword set, in source order.
///
/// Always valid once constructed: at least one category, every category has
/// subcategories, every subcategory has non-blank keywords, and names are
/// unique at each level.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    categories: Vec<Category>,
}

impl Taxonomy {
    pub fn new(categories: Vec<Category>) -> Result<Self, AnalysisError> {
        let taxonomy = Self { categories };
        taxonomy.validate()?;
        Ok(taxonomy)
    }

    pub fn from_toml(input: &str) -> Result<Self, AnalysisError> {
        let file: TaxonomyFile =
            toml::from_str(input).map_err(|e| AnalysisError::ConfigParse(e.to_string()))?;

        let categories = file
            .categories
            .into_iter()
            .map(|c| {
                let subcategories = c
                    .subcategories
                    .into_iter()
                    .map(|s| Subcategory::new(s.key, s.name.unwrap_or_default(), s.keywords))
                    .collect();
                Category::new(c.key, c.name.unwrap_or_default(), subcategories)
            })
            .collect();

        Self::new(categories)
    }

    fn validate(&self) -> Result<(), AnalysisError> {
        if self.categories.is_empty() {
            return Err(AnalysisError::ConfigValidation(
                "at least one [[category]] is required".into(),
            ));
        }

        let mut category_keys = FxHashSet::default();
        let mut category_names = FxHashSet::default();

        for category in &self.categories {
            if category.key.trim().is_empty() {
                return Err(AnalysisError::ConfigValidation("category key must not be blank".into()));
            }
            if !category_keys.insert(category.key.as_str()) {
                return Err(AnalysisError::ConfigValidation(format!(
                    "duplicate category key '{}'",
                    category.key
                )));
            }
            if !category_names.insert(category.name.as_str()) {
                return Err(AnalysisError::ConfigValidation(format!(
                    "duplicate category name '{}'",
                    category.name
                )));
            }
            if category.subcategories.is_empty() {
                return Err(AnalysisError::ConfigValidation(format!(
                    "category '{}': at least one subcategory is required",
                    category.key
                )));
            }

            let mut sub_keys = FxHashSet::default();
            let mut sub_names = FxHashSet::default();

            for sub in &category.subcategories {
                let path = format!("{}.{}", category.key, sub.key);
                if sub.key.trim().is_empty() {
                    return Err(AnalysisError::ConfigValidation(format!(
                        "category '{}': subcategory key must not be blank",
                        category.key
                    )));
                }
                if !sub_keys.insert(sub.key.as_str()) {
                    return Err(AnalysisError::ConfigValidation(format!(
                        "duplicate subcategory key '{path}'"
                    )));
                }
                if !sub_names.insert(sub.name.as_str()) {
                    return Err(AnalysisError::ConfigValidation(format!(
                        "category '{}': duplicate subcategory name '{}'",
                        category.key, sub.name
                    )));
                }
                if sub.keywords.is_empty() {
                    return Err(AnalysisError::ConfigValidation(format!(
                        "subcategory '{path}': keyword list is empty"
                    )));
                }
                if sub.keywords.iter().any(|k| k.is_empty()) {
                    return Err(AnalysisError::ConfigValidation(format!(
                        "subcategory '{path}': blank keyword"
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn subcategory_count(&self) -> usize {
        self.categories.iter().map(|c| c.subcategories.len()).sum()
    }

    pub fn keyword_count(&self) -> usize {
        self.subcategories().map(|(_, _, s)| s.keyword_count()).sum()
    }

    /// Every subcategory in taxonomy order.
    pub fn subcategories(&self) -> impl Iterator<Item = (SubcategoryRef, &Category, &Subcategory)> {
        self.categories.iter().enumerate().flat_map(|(ci, category)| {
            category
                .subcategories
                .iter()
                .enumerate()
                .map(move |(si, sub)| (SubcategoryRef::new(ci, si), category, sub))
        })
    }

    pub fn resolve(&self, r: SubcategoryRef) -> Option<(&Category, &Subcategory)> {
        let category = self.categories.get(r.category)?;
        let sub = category.subcategories.get(r.subcategory)?;
        Some((category, sub))
    }
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
