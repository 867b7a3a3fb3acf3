// Store category taxonomy: ordered aisles with matching keywords
use crate::model::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreCategory {
    pub name: String,
    pub aisle: String,
    #[serde(default)]
    pub description: String,
    pub keywords: Vec<String>,
}

impl StoreCategory {
    pub fn new(name: &str, aisle: &str, description: &str, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            aisle: aisle.to_string(),
            description: description.to_string(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }
}

/// Ordered, non-empty list of categories. Position is shelf-walk order and
/// the last entry is the fallback for unmatched items.
#[derive(Debug, Clone, PartialEq)]
pub struct Taxonomy {
    categories: Vec<StoreCategory>,
}

impl Taxonomy {
    pub fn from_categories(categories: Vec<StoreCategory>) -> Result<Self, ConfigError> {
        if categories.is_empty() {
            return Err(ConfigError::Taxonomy("at least one category is required".into()));
        }

        let mut seen = HashSet::new();
        for category in &categories {
            if category.name.trim().is_empty() {
                return Err(ConfigError::Taxonomy("category names must not be blank".into()));
            }
            if !seen.insert(category.name.as_str()) {
                return Err(ConfigError::Taxonomy(format!(
                    "duplicate category '{}'",
                    category.name
                )));
            }
        }

        let categories = categories
            .into_iter()
            .map(|mut c| {
                c.keywords = c
                    .keywords
                    .iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect();
                c
            })
            .collect();

        Ok(Self { categories })
    }

    /// UK supermarket layout: produce at the entrance, household at the back.
    pub fn default_uk() -> Self {
        Self {
            categories: vec![
                StoreCategory::new(
                    "Fresh Produce",
                    "Aisle 1-2",
                    "Start here",
                    &["apple", "banana", "orange", "tomato", "lettuce", "carrot", "onion", "potato", "fruit", "vegetable"],
                ),
                StoreCategory::new(
                    "Dairy",
                    "Aisle 3",
                    "Refrigerated section",
                    &["milk", "cheese", "butter", "yogurt", "cream", "eggs"],
                ),
                StoreCategory::new(
                    "Meat & Fish",
                    "Aisle 4",
                    "Butcher counter",
                    &["chicken", "beef", "pork", "fish", "salmon", "meat", "turkey", "lamb", "bacon", "sausage"],
                ),
                StoreCategory::new(
                    "Bakery",
                    "Aisle 5",
                    "Fresh baked goods",
                    &["bread", "roll", "cake", "pastry", "croissant", "muffin", "bagel"],
                ),
                StoreCategory::new(
                    "Frozen",
                    "Aisle 6",
                    "Frozen foods",
                    &["frozen", "ice cream", "frozen vegetables", "frozen fruit", "pizza"],
                ),
                StoreCategory::new(
                    "Household",
                    "Aisle 7-8",
                    "Cleaning & household",
                    &["detergent", "soap", "shampoo", "toothpaste", "toilet paper", "kitchen roll", "cleaning"],
                ),
            ],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &StoreCategory> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn get(&self, name: &str) -> Option<&StoreCategory> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn rank(&self, name: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.name == name)
    }

    pub fn fallback(&self) -> &StoreCategory {
        // Construction guarantees at least one entry.
        &self.categories[self.categories.len() - 1]
    }

    pub fn names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::default_uk()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_taxonomy_has_six_categories_ending_in_household() {
        let taxonomy = Taxonomy::default_uk();
        assert_eq!(taxonomy.len(), 6);
        assert_eq!(taxonomy.fallback().name, "Household");
        assert_eq!(taxonomy.rank("Fresh Produce"), Some(0));
        assert_eq!(taxonomy.rank("Frozen"), Some(4));
        assert_eq!(taxonomy.rank("Pet Food"), None);
    }

    #[test]
    fn rejects_empty_and_duplicate_taxonomies() {
        assert!(Taxonomy::from_categories(vec![]).is_err());

        let dup = vec![
            StoreCategory::new("Dairy", "1", "", &["milk"]),
            StoreCategory::new("Dairy", "2", "", &["cheese"]),
        ];
        assert!(matches!(
            Taxonomy::from_categories(dup),
            Err(ConfigError::Taxonomy(_))
        ));
    }

    #[test]
    fn custom_keywords_are_lowercased() {
        let taxonomy = Taxonomy::from_categories(vec![
            StoreCategory {
                name: "Obst".into(),
                aisle: "Gang 1".into(),
                description: String::new(),
                keywords: vec![" Apfel ".into(), "".into()],
            },
            StoreCategory::new("Sonstiges", "Gang 9", "", &[]),
        ])
        .unwrap();

        assert_eq!(taxonomy.get("Obst").unwrap().keywords, vec!["apfel"]);
        assert_eq!(taxonomy.fallback().name, "Sonstiges");
    }
}
