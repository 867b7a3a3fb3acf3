use crate::model::{NewProduct, NewStore, StorageError};
use crate::storage::Storage;
use tracing::info;

/// Inserts the demo stores and price list unless stores already exist.
/// Returns whether anything was written.
pub fn seed_if_empty(storage: &mut dyn Storage) -> Result<bool, StorageError> {
    if !storage.all_stores()?.is_empty() {
        info!("Database already seeded");
        return Ok(false);
    }

    info!("Seeding database...");
    for store in uk_stores() {
        storage.create_store(store)?;
    }
    for product in uk_products() {
        storage.create_product(product)?;
    }
    Ok(true)
}

fn store(
    name: &str,
    chain: &str,
    address: &str,
    postcode: &str,
    phone: &str,
    latitude: f64,
    longitude: f64,
    opening_hours: &str,
) -> NewStore {
    NewStore {
        name: name.into(),
        chain: chain.into(),
        address: address.into(),
        postcode: postcode.into(),
        phone: Some(phone.into()),
        latitude,
        longitude,
        opening_hours: opening_hours.into(),
    }
}

fn uk_stores() -> Vec<NewStore> {
    vec![
        store(
            "Tesco Extra - Manchester Arndale",
            "Tesco",
            "49 High St, Manchester M4 3AH",
            "M4 3AH",
            "0345 677 9696",
            53.4834,
            -2.2426,
            "24 hours",
        ),
        store(
            "Sainsbury's Local",
            "Sainsbury's",
            "134 Deansgate, Manchester M3 2BQ",
            "M3 2BQ",
            "0161 834 3280",
            53.4794,
            -2.2453,
            "7am - 11pm",
        ),
        store(
            "ASDA Manchester",
            "ASDA",
            "Eastlands, Ashton New Rd, Manchester M11 4BD",
            "M11 4BD",
            "0161 230 1143",
            53.4831,
            -2.2007,
            "7am - 10pm",
        ),
        store(
            "Marks & Spencer",
            "M&S",
            "7 Market St, Manchester M1 1WR",
            "M1 1WR",
            "0161 831 7341",
            53.4808,
            -2.2426,
            "8am - 9pm",
        ),
    ]
}

fn product(name: &str, category: &str, prices: [f64; 4]) -> NewProduct {
    NewProduct {
        name: name.into(),
        category: category.into(),
        tesco_price: Some(prices[0]),
        sainsburys_price: Some(prices[1]),
        asda_price: Some(prices[2]),
        morrisons_price: Some(prices[3]),
    }
}

fn uk_products() -> Vec<NewProduct> {
    vec![
        product("Milk (2L)", "Dairy", [1.45, 1.50, 1.25, 1.40]),
        product("Bread (Wholemeal)", "Bakery", [1.20, 1.35, 1.30, 1.25]),
        product("Apples (1kg)", "Fresh Produce", [2.50, 2.25, 2.45, 2.35]),
        product("Chicken Breast (1kg)", "Meat & Fish", [6.50, 6.75, 6.20, 6.45]),
        product("Tomatoes (500g)", "Fresh Produce", [1.80, 1.95, 1.90, 1.85]),
        product("Bananas (1kg)", "Fresh Produce", [1.10, 1.15, 1.05, 1.12]),
        product("Cheddar Cheese (200g)", "Dairy", [2.50, 2.65, 2.40, 2.55]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemStorage, SqliteStorage};

    #[test]
    fn seeds_once() {
        let mut storage = MemStorage::new();
        assert!(seed_if_empty(&mut storage).unwrap());
        assert!(!seed_if_empty(&mut storage).unwrap());
        assert_eq!(storage.all_stores().unwrap().len(), 4);
        assert_eq!(storage.all_products().unwrap().len(), 7);
    }

    #[test]
    fn seeded_sqlite_answers_location_queries() {
        let mut storage = SqliteStorage::open_in_memory().unwrap();
        seed_if_empty(&mut storage).unwrap();

        // Sainsbury's on Deansgate is the closest to this point.
        let near = storage.stores_near(53.4794, -2.2453, 1.0).unwrap();
        assert_eq!(near[0].chain, "Sainsbury's");
        assert!(near.iter().all(|s| s.chain != "ASDA"));
        assert_eq!(storage.stores_near(53.4794, -2.2453, 10.0).unwrap().len(), 4);
    }
}
