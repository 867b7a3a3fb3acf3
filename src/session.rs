use crate::classifier::classify;
use crate::model::{CategorySource, ListError, ShoppingItem};
use crate::reconciler::{reconcile, route_order, Signature};
use crate::taxonomy::Taxonomy;
use std::sync::Arc;
use tracing::{debug, info};

/// Downstream consumer of the canonical list (route view, price comparison, persistence).
pub trait ListObserver: Send + Sync {
    fn list_updated(&self, items: &[ShoppingItem]);
}

/// Caller-held list state: the raw captured/edited items, the canonical
/// categorized list derived from them and the last propagated signature.
pub struct ListSession {
    taxonomy: Arc<Taxonomy>,
    raw: Vec<ShoppingItem>,
    canonical: Vec<ShoppingItem>,
    signature: Signature,
    observers: Vec<Arc<dyn ListObserver>>,
}

impl ListSession {
    pub fn new(taxonomy: Arc<Taxonomy>) -> Self {
        Self {
            taxonomy,
            raw: Vec::new(),
            canonical: Vec::new(),
            signature: Signature::default(),
            observers: Vec::new(),
        }
    }

    /// Resumes from a previously saved canonical list without notifying.
    /// Items without a known category are classified first.
    pub fn restore(taxonomy: Arc<Taxonomy>, mut items: Vec<ShoppingItem>) -> Self {
        for item in items.iter_mut() {
            let known = item.category.as_deref().is_some_and(|c| taxonomy.contains(c));
            if !known {
                item.category = Some(classify(item, &taxonomy).to_string());
                item.category_source = Some(CategorySource::Classifier);
            }
        }
        let canonical = route_order(items, &taxonomy);
        Self {
            signature: Signature::for_output(&canonical),
            raw: canonical.clone(),
            canonical,
            taxonomy,
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: Arc<dyn ListObserver>) {
        self.observers.push(observer);
    }

    pub fn items(&self) -> &[ShoppingItem] {
        &self.canonical
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// (completed, total)
    pub fn progress(&self) -> (usize, usize) {
        let done = self.canonical.iter().filter(|i| i.completed).count();
        (done, self.canonical.len())
    }

    /// Replaces the raw list. Returns true when observers were notified.
    pub fn ingest(&mut self, incoming: Vec<ShoppingItem>) -> bool {
        self.raw = incoming;
        self.run()
    }

    /// Adds freshly captured items after the existing ones.
    pub fn append(&mut self, items: Vec<ShoppingItem>) -> bool {
        self.raw.extend(items);
        self.run()
    }

    /// Corrects an item's text. Hand-edited text is fully trusted.
    pub fn edit_text(&mut self, id: &str, text: &str) -> Result<bool, ListError> {
        let item = self.raw_item_mut(id)?;
        item.text = text.to_string();
        item.confidence = 1.0;
        Ok(self.run())
    }

    pub fn remove(&mut self, id: &str) -> Result<bool, ListError> {
        let before = self.raw.len();
        self.raw.retain(|item| item.id != id);
        if self.raw.len() == before {
            return Err(ListError::UnknownItem(id.to_string()));
        }
        Ok(self.run())
    }

    /// Pins an item to a category; later reconciliations keep it there.
    pub fn move_to_category(&mut self, id: &str, category: &str) -> Result<(), ListError> {
        if !self.taxonomy.contains(category) {
            return Err(ListError::UnknownCategory(category.to_string()));
        }
        let item = self.canonical_item_mut(id)?;
        item.category = Some(category.to_string());
        item.category_source = Some(CategorySource::User);
        info!("Moved item {} to {}", id, category);

        let canonical = std::mem::take(&mut self.canonical);
        self.canonical = route_order(canonical, &self.taxonomy);
        self.propagate_mutation();
        Ok(())
    }

    pub fn toggle_completed(&mut self, id: &str) -> Result<bool, ListError> {
        let completed = {
            let item = self.canonical_item_mut(id)?;
            item.completed = !item.completed;
            item.completed
        };
        if let Some(raw) = self.raw.iter_mut().find(|i| i.id == id) {
            raw.completed = completed;
        }
        self.propagate_mutation();
        Ok(completed)
    }

    fn run(&mut self) -> bool {
        let result = reconcile(&self.canonical, &self.raw, &self.taxonomy, &self.signature);
        self.canonical = result.items;
        self.signature = result.signature;

        if result.changed {
            info!("List changed: {} items", self.canonical.len());
            self.notify();
        } else if result.recomputed {
            debug!("List recomputed without visible change");
        }
        result.changed
    }

    fn propagate_mutation(&mut self) {
        self.signature = self.signature.with_output(&self.canonical);
        self.notify();
    }

    fn notify(&self) {
        for observer in &self.observers {
            observer.list_updated(&self.canonical);
        }
    }

    fn raw_item_mut(&mut self, id: &str) -> Result<&mut ShoppingItem, ListError> {
        self.raw
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| ListError::UnknownItem(id.to_string()))
    }

    fn canonical_item_mut(&mut self, id: &str) -> Result<&mut ShoppingItem, ListError> {
        self.canonical
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| ListError::UnknownItem(id.to_string()))
    }
}
