// Merges a new raw item list into the canonical categorized list
use crate::classifier::classify;
use crate::model::{clamp_confidence, CategorySource, ShoppingItem};
use crate::taxonomy::Taxonomy;
use std::collections::{HashMap, HashSet};
use tracing::debug;

const FIELD_SEP: char = '\u{1f}';
const RECORD_SEP: char = '\u{1e}';

/// Last seen input fingerprint and last propagated output fingerprint.
/// The default equals the fingerprints of an empty list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    input: Option<String>,
    output: String,
}

impl Default for Signature {
    fn default() -> Self {
        Self {
            input: Some(String::new()),
            output: String::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub items: Vec<ShoppingItem>,
    pub signature: Signature,
    /// Classification was rerun because the input changed.
    pub recomputed: bool,
    /// The (id, text, category) view differs from the last propagated one.
    pub changed: bool,
}

pub fn input_fingerprint(items: &[ShoppingItem]) -> String {
    let mut out = String::new();
    for item in items {
        out.push_str(&item.id);
        out.push(FIELD_SEP);
        out.push_str(&item.text);
        out.push(RECORD_SEP);
    }
    out
}

pub fn output_fingerprint(items: &[ShoppingItem]) -> String {
    let mut out = String::new();
    for item in items {
        out.push_str(&item.id);
        out.push(FIELD_SEP);
        out.push_str(&item.text);
        out.push(FIELD_SEP);
        out.push_str(item.category.as_deref().unwrap_or(""));
        out.push(RECORD_SEP);
    }
    out
}

impl Signature {
    /// Signature for a canonical list restored from storage: the next
    /// input is always reclassified, but only real changes propagate.
    pub fn for_output(items: &[ShoppingItem]) -> Self {
        Self {
            input: None,
            output: output_fingerprint(items),
        }
    }

    pub(crate) fn with_output(&self, items: &[ShoppingItem]) -> Self {
        Self {
            input: self.input.clone(),
            output: output_fingerprint(items),
        }
    }
}

pub fn reconcile(
    previous: &[ShoppingItem],
    incoming: &[ShoppingItem],
    taxonomy: &Taxonomy,
    last: &Signature,
) -> Reconciliation {
    let input = input_fingerprint(incoming);
    if last.input.as_deref() == Some(input.as_str()) {
        debug!("Input fingerprint unchanged, skipping classification");
        return Reconciliation {
            items: apply_item_state(previous, incoming),
            signature: last.clone(),
            recomputed: false,
            changed: false,
        };
    }

    let by_id: HashMap<&str, &ShoppingItem> =
        previous.iter().map(|item| (item.id.as_str(), item)).collect();

    let mut seen = HashSet::new();
    let mut merged = Vec::with_capacity(incoming.len());

    for raw in incoming {
        if raw.id.trim().is_empty() {
            debug!("Dropping item without id: {:?}", raw.text);
            continue;
        }
        if !seen.insert(raw.id.as_str()) {
            debug!("Dropping duplicate item id {}", raw.id);
            continue;
        }

        let mut item = raw.clone();
        item.confidence = clamp_confidence(item.confidence);

        let override_category = by_id
            .get(item.id.as_str())
            .filter(|prev| prev.is_user_categorized())
            .and_then(|prev| prev.category.clone())
            .or_else(|| {
                if raw.is_user_categorized() {
                    raw.category.clone()
                } else {
                    None
                }
            })
            .filter(|name| taxonomy.contains(name));

        match override_category {
            Some(category) => {
                item.category = Some(category);
                item.category_source = Some(CategorySource::User);
            }
            None => {
                item.category = Some(classify(&item, taxonomy).to_string());
                item.category_source = Some(CategorySource::Classifier);
            }
        }

        merged.push(item);
    }

    let items = route_order(merged, taxonomy);
    let output = output_fingerprint(&items);
    let changed = output != last.output;

    debug!(
        "Reconciled {} incoming into {} items (changed: {})",
        incoming.len(),
        items.len(),
        changed
    );

    Reconciliation {
        items,
        signature: Signature {
            input: Some(input),
            output,
        },
        recomputed: true,
        changed,
    }
}

/// Copies completion, confidence and position from incoming items onto the
/// canonical ones with the same id. Categories and order are left alone.
fn apply_item_state(previous: &[ShoppingItem], incoming: &[ShoppingItem]) -> Vec<ShoppingItem> {
    let mut by_id: HashMap<&str, &ShoppingItem> = HashMap::new();
    for raw in incoming {
        by_id.entry(raw.id.as_str()).or_insert(raw);
    }

    previous
        .iter()
        .map(|prev| {
            let mut item = prev.clone();
            if let Some(raw) = by_id.get(prev.id.as_str()) {
                item.completed = raw.completed;
                item.confidence = clamp_confidence(raw.confidence);
                item.position = raw.position;
            }
            item
        })
        .collect()
}

/// Groups by taxonomy order, keeping relative order inside each group.
/// Missing or unknown categories sort with the fallback.
pub fn route_order(mut items: Vec<ShoppingItem>, taxonomy: &Taxonomy) -> Vec<ShoppingItem> {
    let fallback_rank = taxonomy.len() - 1;
    items.sort_by_key(|item| {
        item.category
            .as_deref()
            .and_then(|name| taxonomy.rank(name))
            .unwrap_or(fallback_rank)
    });
    items
}
