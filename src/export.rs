// Plain-text rendering of the organised list
use crate::model::ShoppingItem;
use crate::taxonomy::Taxonomy;
use chrono::NaiveDate;

/// Renders items grouped under "{name} ({aisle}):" headers in taxonomy
/// order. Empty categories are skipped; items with a missing or unknown
/// category are listed under the fallback.
pub fn export_list(items: &[ShoppingItem], taxonomy: &Taxonomy) -> String {
    taxonomy
        .iter()
        .filter_map(|category| {
            let lines: Vec<String> = items
                .iter()
                .filter(|item| section(item, taxonomy) == category.name)
                .map(|item| format!("  • {}", item.text))
                .collect();

            if lines.is_empty() {
                None
            } else {
                Some(format!("{} ({}):\n{}", category.name, category.aisle, lines.join("\n")))
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn section<'t>(item: &ShoppingItem, taxonomy: &'t Taxonomy) -> &'t str {
    item.category
        .as_deref()
        .and_then(|name| taxonomy.get(name))
        .unwrap_or_else(|| taxonomy.fallback())
        .name
        .as_str()
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("shopping-list-{}.txt", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify_all;

    #[test]
    fn groups_in_taxonomy_order_and_skips_empty_categories() {
        let taxonomy = Taxonomy::default_uk();
        let mut items = vec![
            ShoppingItem::manual("1", "Bleach"),
            ShoppingItem::manual("2", "Milk"),
            ShoppingItem::manual("3", "Tomatoes"),
            ShoppingItem::manual("4", "Cheese"),
        ];
        classify_all(&mut items, &taxonomy);

        let text = export_list(&items, &taxonomy);
        assert_eq!(
            text,
            "Fresh Produce (Aisle 1-2):\n  • Tomatoes\n\n\
             Dairy (Aisle 3):\n  • Milk\n  • Cheese\n\n\
             Household (Aisle 7-8):\n  • Bleach"
        );
    }

    #[test]
    fn uncategorized_items_land_under_the_fallback() {
        let taxonomy = Taxonomy::default_uk();
        let mut unknown = ShoppingItem::manual("2", "Dog food");
        unknown.category = Some("Pets".into());
        let mut milk = ShoppingItem::manual("3", "Milk");
        milk.category = Some("Dairy".into());

        let text = export_list(&[ShoppingItem::manual("1", "Bleach"), unknown, milk], &taxonomy);
        assert_eq!(
            text,
            "Dairy (Aisle 3):\n  • Milk\n\n\
             Household (Aisle 7-8):\n  • Bleach\n  • Dog food"
        );
    }

    #[test]
    fn empty_list_exports_empty_text() {
        assert_eq!(export_list(&[], &Taxonomy::default_uk()), "");
    }

    #[test]
    fn file_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(export_file_name(date), "shopping-list-2024-03-07.txt");
    }
}
