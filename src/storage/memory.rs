use crate::model::{
    NewProduct, NewShoppingList, NewStore, Product, ShoppingList, ShoppingListPatch, Store,
    StorageError,
};
use crate::storage::Storage;
use chrono::Utc;
use std::collections::HashMap;

/// Map-backed storage; contents vanish with the process.
#[derive(Debug)]
pub struct MemStorage {
    shopping_lists: HashMap<i64, ShoppingList>,
    stores: HashMap<i64, Store>,
    products: HashMap<i64, Product>,
    next_list_id: i64,
    next_store_id: i64,
    next_product_id: i64,
}

impl MemStorage {
    pub fn new() -> Self {
        Self {
            shopping_lists: HashMap::new(),
            stores: HashMap::new(),
            products: HashMap::new(),
            next_list_id: 1,
            next_store_id: 1,
            next_product_id: 1,
        }
    }
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MemStorage {
    fn get_shopping_list(&self, id: i64) -> Result<Option<ShoppingList>, StorageError> {
        Ok(self.shopping_lists.get(&id).cloned())
    }

    fn all_shopping_lists(&self) -> Result<Vec<ShoppingList>, StorageError> {
        let mut lists: Vec<ShoppingList> = self.shopping_lists.values().cloned().collect();
        lists.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(lists)
    }

    fn create_shopping_list(&mut self, list: NewShoppingList) -> Result<ShoppingList, StorageError> {
        let id = self.next_list_id;
        self.next_list_id += 1;
        let list = ShoppingList {
            id,
            name: list.name,
            items: list.items,
            created_at: Utc::now(),
        };
        self.shopping_lists.insert(id, list.clone());
        Ok(list)
    }

    fn update_shopping_list(
        &mut self,
        id: i64,
        patch: ShoppingListPatch,
    ) -> Result<Option<ShoppingList>, StorageError> {
        let Some(existing) = self.shopping_lists.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            existing.name = name;
        }
        if let Some(items) = patch.items {
            existing.items = items;
        }
        Ok(Some(existing.clone()))
    }

    fn delete_shopping_list(&mut self, id: i64) -> Result<bool, StorageError> {
        Ok(self.shopping_lists.remove(&id).is_some())
    }

    fn all_stores(&self) -> Result<Vec<Store>, StorageError> {
        let mut stores: Vec<Store> = self.stores.values().cloned().collect();
        stores.sort_by_key(|s| s.id);
        Ok(stores)
    }

    fn create_store(&mut self, store: NewStore) -> Result<Store, StorageError> {
        let store = store.with_id(self.next_store_id);
        self.next_store_id += 1;
        self.stores.insert(store.id, store.clone());
        Ok(store)
    }

    fn all_products(&self) -> Result<Vec<Product>, StorageError> {
        let mut products: Vec<Product> = self.products.values().cloned().collect();
        products.sort_by_key(|p| p.id);
        Ok(products)
    }

    fn create_product(&mut self, product: NewProduct) -> Result<Product, StorageError> {
        let product = product.with_id(self.next_product_id);
        self.next_product_id += 1;
        self.products.insert(product.id, product.clone());
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ShoppingItem;

    #[test]
    fn list_crud_round_trip() {
        let mut storage = MemStorage::new();
        let created = storage
            .create_shopping_list(NewShoppingList {
                name: "Weekly".into(),
                items: vec![ShoppingItem::manual("a", "milk")],
            })
            .unwrap();
        assert_eq!(created.id, 1);

        let updated = storage
            .update_shopping_list(
                created.id,
                ShoppingListPatch {
                    name: Some("Weekend".into()),
                    items: None,
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Weekend");
        assert_eq!(updated.items.len(), 1);

        assert!(storage.update_shopping_list(99, ShoppingListPatch::default()).unwrap().is_none());
        assert!(storage.delete_shopping_list(created.id).unwrap());
        assert!(!storage.delete_shopping_list(created.id).unwrap());
        assert!(storage.get_shopping_list(created.id).unwrap().is_none());
    }

    #[test]
    fn lists_are_returned_newest_first() {
        let mut storage = MemStorage::new();
        for name in ["first", "second", "third"] {
            storage
                .create_shopping_list(NewShoppingList { name: name.into(), items: vec![] })
                .unwrap();
        }
        let names: Vec<String> = storage
            .all_shopping_lists()
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["third", "second", "first"]);
    }
}
