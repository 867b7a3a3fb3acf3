// Persistence for shopping lists, stores and products

pub mod memory;
pub mod seed;
pub mod sqlite;

pub use memory::MemStorage;
pub use seed::seed_if_empty;
pub use sqlite::SqliteStorage;

use crate::model::{
    NewProduct, NewShoppingList, NewStore, Product, ShoppingList, ShoppingListPatch, Store,
    StorageError,
};

pub trait Storage: Send {
    fn get_shopping_list(&self, id: i64) -> Result<Option<ShoppingList>, StorageError>;
    /// Newest first.
    fn all_shopping_lists(&self) -> Result<Vec<ShoppingList>, StorageError>;
    fn create_shopping_list(&mut self, list: NewShoppingList) -> Result<ShoppingList, StorageError>;
    fn update_shopping_list(
        &mut self,
        id: i64,
        patch: ShoppingListPatch,
    ) -> Result<Option<ShoppingList>, StorageError>;
    fn delete_shopping_list(&mut self, id: i64) -> Result<bool, StorageError>;

    fn all_stores(&self) -> Result<Vec<Store>, StorageError>;
    fn create_store(&mut self, store: NewStore) -> Result<Store, StorageError>;

    /// Stores within `radius_km`, nearest first.
    fn stores_near(&self, latitude: f64, longitude: f64, radius_km: f64) -> Result<Vec<Store>, StorageError> {
        Ok(crate::analyzer::location::stores_within(
            self.all_stores()?,
            latitude,
            longitude,
            radius_km,
        ))
    }

    fn all_products(&self) -> Result<Vec<Product>, StorageError>;
    fn create_product(&mut self, product: NewProduct) -> Result<Product, StorageError>;

    /// Case-insensitive substring match on the product name.
    fn search_products(&self, query: &str) -> Result<Vec<Product>, StorageError> {
        let query = query.to_lowercase();
        Ok(self
            .all_products()?
            .into_iter()
            .filter(|p| p.name.to_lowercase().contains(&query))
            .collect())
    }

    fn product_by_name(&self, name: &str) -> Result<Option<Product>, StorageError> {
        Ok(self.search_products(name)?.into_iter().next())
    }
}
