use crate::analyzer::price_comparison::{round2, Chain};
use crate::model::ShoppingItem;
use serde::Serialize;

const BASE_ITEM_PRICE: f64 = 2.5;

#[derive(Debug, Clone, Serialize)]
pub struct OnlineService {
    pub id: &'static str,
    pub name: &'static str,
    pub chain: Chain,
    pub delivery_available: bool,
    pub click_collect_available: bool,
    pub delivery_slots: &'static [&'static str],
    pub min_order_value: f64,
    pub delivery_fee: f64,
    pub price_multiplier: f64,
    pub url: &'static str,
}

impl OnlineService {
    /// Flat per-item estimate scaled by the chain's price level.
    pub fn estimated_total(&self, items: &[ShoppingItem]) -> f64 {
        round2(items.len() as f64 * BASE_ITEM_PRICE * self.price_multiplier)
    }

    pub fn meets_minimum(&self, items: &[ShoppingItem]) -> bool {
        self.estimated_total(items) >= self.min_order_value
    }

    /// Basket estimate plus delivery.
    pub fn checkout_total(&self, items: &[ShoppingItem]) -> f64 {
        round2(self.estimated_total(items) + self.delivery_fee)
    }
}

pub fn online_services() -> Vec<OnlineService> {
    vec![
        OnlineService {
            id: "tesco-delivery",
            name: "Tesco Groceries",
            chain: Chain::Tesco,
            delivery_available: true,
            click_collect_available: true,
            delivery_slots: &["Today 18:00-20:00", "Tomorrow 10:00-12:00", "Tomorrow 14:00-16:00"],
            min_order_value: 40.0,
            delivery_fee: 4.50,
            price_multiplier: 1.1,
            url: "https://www.tesco.com/groceries",
        },
        OnlineService {
            id: "sainsburys-delivery",
            name: "Sainsbury's Groceries",
            chain: Chain::Sainsburys,
            delivery_available: true,
            click_collect_available: true,
            delivery_slots: &["Today 19:00-21:00", "Tomorrow 09:00-11:00", "Tomorrow 15:00-17:00"],
            min_order_value: 40.0,
            delivery_fee: 5.00,
            price_multiplier: 1.15,
            url: "https://www.sainsburys.co.uk/groceries-api",
        },
        OnlineService {
            id: "asda-delivery",
            name: "ASDA Groceries",
            chain: Chain::Asda,
            delivery_available: true,
            click_collect_available: true,
            delivery_slots: &["Tomorrow 11:00-13:00", "Tomorrow 16:00-18:00"],
            min_order_value: 25.0,
            delivery_fee: 3.50,
            price_multiplier: 1.05,
            url: "https://groceries.asda.com",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basket(n: usize) -> Vec<ShoppingItem> {
        (0..n).map(|i| ShoppingItem::manual(i.to_string(), "item")).collect()
    }

    #[test]
    fn estimates_follow_chain_multiplier() {
        let services = online_services();
        let items = basket(4);
        assert_eq!(services[0].estimated_total(&items), 11.0);
        assert_eq!(services[1].estimated_total(&items), 11.5);
        assert_eq!(services[2].estimated_total(&items), 10.5);
        assert_eq!(services[2].checkout_total(&items), 14.0);
    }

    #[test]
    fn minimum_order_depends_on_basket_size() {
        let asda = &online_services()[2];
        assert!(!asda.meets_minimum(&basket(9)));
        assert!(asda.meets_minimum(&basket(10)));
    }
}
