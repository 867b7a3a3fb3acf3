// Validated access to persistence, shared across tasks
use crate::analyzer::{compare_prices, PriceComparison};
use crate::model::{
    NewShoppingList, Product, ShoppingItem, ShoppingList, ShoppingListPatch, Store, StorageError,
};
use crate::session::ListSession;
use crate::storage::Storage;
use crate::taxonomy::Taxonomy;
use crate::utils::{strip_html, validate_input_length, MAX_INPUT_LENGTH};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

pub type SharedStorage = Arc<Mutex<Box<dyn Storage>>>;

#[derive(Debug, Clone, Copy)]
pub struct NearbyQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
}

pub struct ShoppingService {
    storage: SharedStorage,
    taxonomy: Arc<Taxonomy>,
}

impl ShoppingService {
    pub fn new(storage: SharedStorage, taxonomy: Arc<Taxonomy>) -> Self {
        Self { storage, taxonomy }
    }

    pub fn taxonomy(&self) -> Arc<Taxonomy> {
        self.taxonomy.clone()
    }

    pub async fn lists(&self) -> Result<Vec<ShoppingList>, StorageError> {
        self.storage.lock().await.all_shopping_lists()
    }

    pub async fn list(&self, id: i64) -> Result<ShoppingList, StorageError> {
        self.storage
            .lock()
            .await
            .get_shopping_list(id)?
            .ok_or(StorageError::NotFound)
    }

    pub async fn create_list(&self, list: NewShoppingList) -> Result<ShoppingList, StorageError> {
        let list = NewShoppingList {
            name: self.clean_name(&list.name)?,
            items: self.clean_items(list.items)?,
        };
        let created = self.storage.lock().await.create_shopping_list(list)?;
        info!("Saved list {} '{}' with {} items", created.id, created.name, created.items.len());
        Ok(created)
    }

    pub async fn update_list(&self, id: i64, patch: ShoppingListPatch) -> Result<ShoppingList, StorageError> {
        let patch = ShoppingListPatch {
            name: patch.name.map(|n| self.clean_name(&n)).transpose()?,
            items: patch.items.map(|i| self.clean_items(i)).transpose()?,
        };
        self.storage
            .lock()
            .await
            .update_shopping_list(id, patch)?
            .ok_or(StorageError::NotFound)
    }

    pub async fn delete_list(&self, id: i64) -> Result<(), StorageError> {
        if self.storage.lock().await.delete_shopping_list(id)? {
            Ok(())
        } else {
            Err(StorageError::NotFound)
        }
    }

    /// Reopens a saved list as a live session.
    pub async fn open_session(&self, id: i64) -> Result<ListSession, StorageError> {
        let list = self.list(id).await?;
        Ok(ListSession::restore(self.taxonomy.clone(), list.items))
    }

    pub async fn stores(&self, near: Option<NearbyQuery>) -> Result<Vec<Store>, StorageError> {
        let storage = self.storage.lock().await;
        match near {
            Some(q) => storage.stores_near(q.latitude, q.longitude, q.radius_km),
            None => storage.all_stores(),
        }
    }

    pub async fn products(&self, search: Option<&str>) -> Result<Vec<Product>, StorageError> {
        let storage = self.storage.lock().await;
        match search.map(str::trim).filter(|s| !s.is_empty()) {
            Some(query) => storage.search_products(query),
            None => storage.all_products(),
        }
    }

    pub async fn product(&self, name: &str) -> Result<Product, StorageError> {
        self.storage
            .lock()
            .await
            .product_by_name(name)?
            .ok_or(StorageError::NotFound)
    }

    pub async fn compare(&self, items: &[ShoppingItem]) -> Result<PriceComparison, StorageError> {
        let products = self.storage.lock().await.all_products()?;
        Ok(compare_prices(items, &products))
    }

    fn clean_name(&self, name: &str) -> Result<String, StorageError> {
        let name = strip_html(name);
        if name.is_empty() {
            return Err(StorageError::InvalidInput("list name is empty".into()));
        }
        if !validate_input_length(&name, MAX_INPUT_LENGTH) {
            return Err(StorageError::InvalidInput("list name too long".into()));
        }
        Ok(name)
    }

    /// Strips markup from item text and forgets categories the taxonomy
    /// does not know, so they get classified again.
    fn clean_items(&self, items: Vec<ShoppingItem>) -> Result<Vec<ShoppingItem>, StorageError> {
        items
            .into_iter()
            .map(|mut item| {
                item.text = strip_html(&item.text);
                if !validate_input_length(&item.text, MAX_INPUT_LENGTH) {
                    return Err(StorageError::InvalidInput(format!("item {} text too long", item.id)));
                }
                if let Some(category) = &item.category {
                    if !self.taxonomy.contains(category) {
                        warn!("Dropping unknown category '{}' on item {}", category, item.id);
                        item.category = None;
                        item.category_source = None;
                    }
                }
                Ok(item)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{seed_if_empty, MemStorage};

    fn service() -> ShoppingService {
        let mut storage = MemStorage::new();
        seed_if_empty(&mut storage).unwrap();
        let storage: Box<dyn Storage> = Box::new(storage);
        ShoppingService::new(Arc::new(Mutex::new(storage)), Arc::new(Taxonomy::default_uk()))
    }

    #[tokio::test]
    async fn create_sanitizes_names_and_items() {
        let service = service();
        let mut item = ShoppingItem::manual("a", "<b>Milk</b>");
        item.category = Some("Toys".into());

        let list = service
            .create_list(NewShoppingList {
                name: " <i>Weekly</i> ".into(),
                items: vec![item],
            })
            .await
            .unwrap();
        assert_eq!(list.name, "Weekly");
        assert_eq!(list.items[0].text, "Milk");
        assert_eq!(list.items[0].category, None);
    }

    #[tokio::test]
    async fn invalid_input_is_rejected() {
        let service = service();
        let blank = service
            .create_list(NewShoppingList { name: "<p></p>".into(), items: vec![] })
            .await;
        assert!(matches!(blank, Err(StorageError::InvalidInput(_))));

        let long = ShoppingItem::manual("a", "x".repeat(MAX_INPUT_LENGTH + 1));
        let too_long = service
            .create_list(NewShoppingList { name: "ok".into(), items: vec![long] })
            .await;
        assert!(matches!(too_long, Err(StorageError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn missing_lists_are_not_found() {
        let service = service();
        assert!(matches!(service.list(7).await, Err(StorageError::NotFound)));
        assert!(matches!(service.delete_list(7).await, Err(StorageError::NotFound)));
        assert!(matches!(
            service.update_list(7, ShoppingListPatch::default()).await,
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn stores_and_products_queries() {
        let service = service();
        assert_eq!(service.stores(None).await.unwrap().len(), 4);
        let near = service
            .stores(Some(NearbyQuery { latitude: 53.4831, longitude: -2.2007, radius_km: 0.5 }))
            .await
            .unwrap();
        assert_eq!(near.len(), 1);
        assert_eq!(near[0].chain, "ASDA");

        assert_eq!(service.products(Some("  ")).await.unwrap().len(), 7);
        assert_eq!(service.products(Some("(1kg)")).await.unwrap().len(), 3);
        assert_eq!(service.product("banana").await.unwrap().name, "Bananas (1kg)");
        assert!(matches!(service.product("caviar").await, Err(StorageError::NotFound)));
    }

    #[tokio::test]
    async fn saved_list_reopens_as_session() {
        let service = service();
        let mut session = ListSession::new(service.taxonomy());
        session.ingest(vec![ShoppingItem::manual("a", "milk"), ShoppingItem::manual("b", "apples")]);
        session.move_to_category("a", "Household").unwrap();

        let saved = service
            .create_list(NewShoppingList { name: "Saved".into(), items: session.items().to_vec() })
            .await
            .unwrap();

        let reopened = service.open_session(saved.id).await.unwrap();
        assert_eq!(reopened.items(), session.items());

        let comparison = service.compare(reopened.items()).await.unwrap();
        assert_eq!(comparison.matches.len(), 2);
    }
}
