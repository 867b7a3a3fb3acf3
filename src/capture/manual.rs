// Typed list entry
use crate::model::ShoppingItem;
use crate::utils::item_id;

/// Splits typed text on commas and newlines into fully trusted items.
pub fn manual_entry(input: &str) -> Vec<ShoppingItem> {
    input
        .split([',', '\n'])
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|text| ShoppingItem::manual(item_id("manual"), text))
        .collect()
}
