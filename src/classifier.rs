use crate::model::{CategorySource, ShoppingItem};
use crate::taxonomy::Taxonomy;

/// Picks the category whose keywords occur most often in the item text.
/// Earlier categories win ties; no match at all yields the fallback.
pub fn classify<'t>(item: &ShoppingItem, taxonomy: &'t Taxonomy) -> &'t str {
    classify_text(&item.text, taxonomy)
}

pub fn classify_text<'t>(text: &str, taxonomy: &'t Taxonomy) -> &'t str {
    let text = text.to_lowercase();

    let mut best = taxonomy.fallback().name.as_str();
    let mut best_score = 0;

    for category in taxonomy.iter() {
        let score = category
            .keywords
            .iter()
            .filter(|keyword| text.contains(keyword.as_str()))
            .count();

        if score > best_score {
            best_score = score;
            best = category.name.as_str();
        }
    }

    best
}

pub fn classify_all(items: &mut [ShoppingItem], taxonomy: &Taxonomy) {
    for item in items.iter_mut() {
        let category = classify(item, taxonomy).to_string();
        item.category = Some(category);
        item.category_source = Some(CategorySource::Classifier);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::StoreCategory;

    fn item(text: &str) -> ShoppingItem {
        ShoppingItem::manual("id", text)
    }

    #[test]
    fn single_category_match() {
        let taxonomy = Taxonomy::default_uk();
        assert_eq!(classify(&item("Tomatoes"), &taxonomy), "Fresh Produce");
        assert_eq!(classify(&item("Milk"), &taxonomy), "Dairy");
        assert_eq!(classify(&item("SALMON fillets"), &taxonomy), "Meat & Fish");
        assert_eq!(classify(&item("2x bagels"), &taxonomy), "Bakery");
    }

    #[test]
    fn unmatched_text_falls_back() {
        let taxonomy = Taxonomy::default_uk();
        assert_eq!(classify(&item("Bleach"), &taxonomy), "Household");
        assert_eq!(classify(&item(""), &taxonomy), "Household");
    }

    #[test]
    fn higher_count_wins_over_taxonomy_order() {
        let taxonomy = Taxonomy::default_uk();
        // "frozen" + "frozen vegetables" + "vegetable" gives Frozen 2 vs Produce 1.
        assert_eq!(classify(&item("frozen vegetables"), &taxonomy), "Frozen");
        // "cheese" + "butter" (Dairy 2) vs "bread" (Bakery 1).
        assert_eq!(classify(&item("cheese butter bread"), &taxonomy), "Dairy");
    }

    #[test]
    fn ties_go_to_the_earlier_category() {
        let taxonomy = Taxonomy::default_uk();
        assert_eq!(classify(&item("milk bread"), &taxonomy), "Dairy");
        assert_eq!(classify(&item("bread milk"), &taxonomy), "Dairy");
        assert_eq!(classify(&item("chicken pizza"), &taxonomy), "Meat & Fish");
    }

    #[test]
    fn swapped_taxonomy_is_respected() {
        let taxonomy = Taxonomy::from_categories(vec![
            StoreCategory::new("Drinks", "A1", "", &["juice", "water"]),
            StoreCategory::new("Other", "A9", "", &[]),
        ])
        .unwrap();
        assert_eq!(classify(&item("Orange juice"), &taxonomy), "Drinks");
        assert_eq!(classify(&item("Milk"), &taxonomy), "Other");
    }

    #[test]
    fn classify_all_marks_provenance() {
        let taxonomy = Taxonomy::default_uk();
        let mut items = vec![item("eggs"), item("soap")];
        classify_all(&mut items, &taxonomy);
        assert_eq!(items[0].category.as_deref(), Some("Dairy"));
        assert_eq!(items[1].category.as_deref(), Some("Household"));
        assert!(items
            .iter()
            .all(|i| i.category_source == Some(CategorySource::Classifier)));
    }
}
