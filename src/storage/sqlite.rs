use crate::model::{
    NewProduct, NewShoppingList, NewStore, Product, ShoppingItem, ShoppingList,
    ShoppingListPatch, Store, StorageError,
};
use crate::storage::Storage;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens the database file and creates missing tables.
    pub fn new(db_path: &str) -> Result<Self, StorageError> {
        Self::init(Connection::open(db_path)?)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS shopping_lists (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                items TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS stores (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                chain TEXT NOT NULL,
                address TEXT NOT NULL,
                postcode TEXT NOT NULL,
                phone TEXT,
                latitude REAL NOT NULL,
                longitude REAL NOT NULL,
                opening_hours TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS products (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                category TEXT NOT NULL,
                tesco_price REAL,
                sainsburys_price REAL,
                asda_price REAL,
                morrisons_price REAL
            );
            ",
        )?;

        Ok(Self { conn })
    }

    fn map_list(row: &Row) -> Result<(i64, String, String, String), rusqlite::Error> {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
    }

    fn decode_list(
        (id, name, items, created_at): (i64, String, String, String),
    ) -> Result<ShoppingList, StorageError> {
        let items: Vec<ShoppingItem> = serde_json::from_str(&items)?;
        let created_at: DateTime<Utc> = created_at
            .parse()
            .map_err(|e| StorageError::InvalidData(format!("Invalid datetime: {}", e)))?;
        Ok(ShoppingList {
            id,
            name,
            items,
            created_at,
        })
    }

    fn map_store(row: &Row) -> Result<Store, rusqlite::Error> {
        Ok(Store {
            id: row.get(0)?,
            name: row.get(1)?,
            chain: row.get(2)?,
            address: row.get(3)?,
            postcode: row.get(4)?,
            phone: row.get(5)?,
            latitude: row.get(6)?,
            longitude: row.get(7)?,
            opening_hours: row.get(8)?,
        })
    }

    fn map_product(row: &Row) -> Result<Product, rusqlite::Error> {
        Ok(Product {
            id: row.get(0)?,
            name: row.get(1)?,
            category: row.get(2)?,
            tesco_price: row.get(3)?,
            sainsburys_price: row.get(4)?,
            asda_price: row.get(5)?,
            morrisons_price: row.get(6)?,
        })
    }
}

impl Storage for SqliteStorage {
    fn get_shopping_list(&self, id: i64) -> Result<Option<ShoppingList>, StorageError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, items, created_at FROM shopping_lists WHERE id = ?1",
                params![id],
                Self::map_list,
            )
            .optional()?;
        row.map(Self::decode_list).transpose()
    }

    fn all_shopping_lists(&self) -> Result<Vec<ShoppingList>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, items, created_at FROM shopping_lists
             ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt.query_map([], Self::map_list)?;

        let mut lists = Vec::new();
        for row in rows {
            lists.push(Self::decode_list(row?)?);
        }
        Ok(lists)
    }

    fn create_shopping_list(&mut self, list: NewShoppingList) -> Result<ShoppingList, StorageError> {
        let created_at = Utc::now();
        self.conn.execute(
            "INSERT INTO shopping_lists (name, items, created_at) VALUES (?1, ?2, ?3)",
            params![&list.name, serde_json::to_string(&list.items)?, created_at.to_rfc3339()],
        )?;
        Ok(ShoppingList {
            id: self.conn.last_insert_rowid(),
            name: list.name,
            items: list.items,
            created_at,
        })
    }

    fn update_shopping_list(
        &mut self,
        id: i64,
        patch: ShoppingListPatch,
    ) -> Result<Option<ShoppingList>, StorageError> {
        let Some(mut list) = self.get_shopping_list(id)? else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            list.name = name;
        }
        if let Some(items) = patch.items {
            list.items = items;
        }
        self.conn.execute(
            "UPDATE shopping_lists SET name = ?1, items = ?2 WHERE id = ?3",
            params![&list.name, serde_json::to_string(&list.items)?, id],
        )?;
        Ok(Some(list))
    }

    fn delete_shopping_list(&mut self, id: i64) -> Result<bool, StorageError> {
        let deleted = self
            .conn
            .execute("DELETE FROM shopping_lists WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    fn all_stores(&self) -> Result<Vec<Store>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, chain, address, postcode, phone, latitude, longitude, opening_hours
             FROM stores ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], Self::map_store)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    fn create_store(&mut self, store: NewStore) -> Result<Store, StorageError> {
        self.conn.execute(
            "INSERT INTO stores (name, chain, address, postcode, phone, latitude, longitude, opening_hours)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                &store.name,
                &store.chain,
                &store.address,
                &store.postcode,
                &store.phone,
                &store.latitude,
                &store.longitude,
                &store.opening_hours,
            ],
        )?;
        Ok(store.with_id(self.conn.last_insert_rowid()))
    }

    fn all_products(&self) -> Result<Vec<Product>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, category, tesco_price, sainsburys_price, asda_price, morrisons_price
             FROM products ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], Self::map_product)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    fn create_product(&mut self, product: NewProduct) -> Result<Product, StorageError> {
        self.conn.execute(
            "INSERT INTO products (name, category, tesco_price, sainsburys_price, asda_price, morrisons_price)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &product.name,
                &product.category,
                &product.tesco_price,
                &product.sainsburys_price,
                &product.asda_price,
                &product.morrisons_price,
            ],
        )?;
        Ok(product.with_id(self.conn.last_insert_rowid()))
    }

    fn search_products(&self, query: &str) -> Result<Vec<Product>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, category, tesco_price, sainsburys_price, asda_price, morrisons_price
             FROM products WHERE instr(lower(name), lower(?1)) > 0 ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![query], Self::map_product)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }
}
