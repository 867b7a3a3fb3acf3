// Core structs: ShoppingItem, ShoppingList, Store, Product and error types
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bounding box reported by OCR. Carried through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Who decided an item's category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategorySource {
    Classifier,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingItem {
    pub id: String,
    pub text: String,
    pub confidence: f64,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_source: Option<CategorySource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl ShoppingItem {
    pub fn new(id: impl Into<String>, text: impl Into<String>, confidence: f64) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            confidence: clamp_confidence(confidence),
            completed: false,
            category: None,
            category_source: None,
            position: None,
        }
    }

    /// Item typed or corrected by hand.
    pub fn manual(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, text, 1.0)
    }

    pub fn is_user_categorized(&self) -> bool {
        self.category_source == Some(CategorySource::User) && self.category.is_some()
    }
}

/// Clamps into [0, 1]. NaN becomes 0.
pub fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Loosely-typed item as it arrives from JSON payloads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    pub id: Option<String>,
    pub text: Option<String>,
    pub confidence: Option<f64>,
    pub completed: Option<bool>,
    pub category: Option<String>,
    pub category_source: Option<CategorySource>,
    pub position: Option<Position>,
}

impl RawItem {
    /// Returns `None` when the id or the text is missing.
    pub fn into_item(self) -> Option<ShoppingItem> {
        let id = self.id.filter(|id| !id.trim().is_empty())?;
        let text = self.text?;
        Some(ShoppingItem {
            id,
            text,
            confidence: clamp_confidence(self.confidence.unwrap_or(1.0)),
            completed: self.completed.unwrap_or(false),
            category: self.category,
            category_source: self.category_source,
            position: self.position,
        })
    }
}

/// Drops malformed entries and keeps the rest in order.
pub fn items_from_raw(raw: Vec<RawItem>) -> Vec<ShoppingItem> {
    raw.into_iter().filter_map(RawItem::into_item).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingList {
    pub id: i64,
    pub name: String,
    pub items: Vec<ShoppingItem>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewShoppingList {
    pub name: String,
    #[serde(default)]
    pub items: Vec<ShoppingItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShoppingListPatch {
    pub name: Option<String>,
    pub items: Option<Vec<ShoppingItem>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: i64,
    pub name: String,
    pub chain: String,
    pub address: String,
    pub postcode: String,
    pub phone: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub opening_hours: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStore {
    pub name: String,
    pub chain: String,
    pub address: String,
    pub postcode: String,
    pub phone: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub opening_hours: String,
}

impl NewStore {
    pub fn with_id(self, id: i64) -> Store {
        Store {
            id,
            name: self.name,
            chain: self.chain,
            address: self.address,
            postcode: self.postcode,
            phone: self.phone,
            latitude: self.latitude,
            longitude: self.longitude,
            opening_hours: self.opening_hours,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub tesco_price: Option<f64>,
    pub sainsburys_price: Option<f64>,
    pub asda_price: Option<f64>,
    pub morrisons_price: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub tesco_price: Option<f64>,
    pub sainsburys_price: Option<f64>,
    pub asda_price: Option<f64>,
    pub morrisons_price: Option<f64>,
}

impl NewProduct {
    pub fn with_id(self, id: i64) -> Product {
        Product {
            id,
            name: self.name,
            category: self.category,
            tesco_price: self.tesco_price,
            sainsburys_price: self.sainsburys_price,
            asda_price: self.asda_price,
            morrisons_price: self.morrisons_price,
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("invalid stored value: {0}")]
    InvalidData(String),
    #[error("input rejected: {0}")]
    InvalidInput(String),
    #[error("not found")]
    NotFound,
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no OCR provider configured")]
    Unavailable,
    #[error("OCR request failed: {0}")]
    HttpError(String),
    #[error("OCR request timed out")]
    Timeout,
    #[error("OCR provider returned an invalid response: {0}")]
    InvalidResponse(String),
    #[error("could not read image: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid taxonomy: {0}")]
    Taxonomy(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ListError {
    #[error("no item with id '{0}'")]
    UnknownItem(String),
    #[error("'{0}' is not a store category")]
    UnknownCategory(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_items_without_id_or_text_are_dropped() {
        let raw: Vec<RawItem> = serde_json::from_str(
            r#"[
                {"id": "a", "text": "milk"},
                {"text": "no id"},
                {"id": "c"},
                {"id": "  ", "text": "blank id"},
                {"id": "e", "text": "", "confidence": 3.5, "completed": true}
            ]"#,
        )
        .unwrap();

        let items = items_from_raw(raw);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "a");
        assert_eq!(items[0].confidence, 1.0);
        assert_eq!(items[1].id, "e");
        assert_eq!(items[1].confidence, 1.0);
        assert!(items[1].completed);
    }

    #[test]
    fn confidence_is_clamped() {
        assert_eq!(ShoppingItem::new("x", "y", -0.2).confidence, 0.0);
        assert_eq!(ShoppingItem::new("x", "y", 1.7).confidence, 1.0);
        assert_eq!(ShoppingItem::new("x", "y", f64::NAN).confidence, 0.0);
        assert_eq!(ShoppingItem::new("x", "y", 0.73).confidence, 0.73);
    }

    #[test]
    fn item_serializes_with_camel_case_provenance() {
        let mut item = ShoppingItem::manual("a", "milk");
        item.category = Some("Household".into());
        item.category_source = Some(CategorySource::User);

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["categorySource"], "user");
        assert!(json.get("position").is_none());

        let back: ShoppingItem = serde_json::from_value(json).unwrap();
        assert!(back.is_user_categorized());
    }
}
