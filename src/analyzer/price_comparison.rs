use crate::model::{Product, ShoppingItem};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Chain {
    Tesco,
    Sainsburys,
    Asda,
    Morrisons,
}

impl Chain {
    pub const ALL: [Chain; 4] = [Chain::Tesco, Chain::Sainsburys, Chain::Asda, Chain::Morrisons];

    pub fn name(self) -> &'static str {
        match self {
            Chain::Tesco => "Tesco",
            Chain::Sainsburys => "Sainsbury's",
            Chain::Asda => "ASDA",
            Chain::Morrisons => "Morrisons",
        }
    }

    /// Listed price, ignoring missing and non-positive entries.
    pub fn price_of(self, product: &Product) -> Option<f64> {
        let price = match self {
            Chain::Tesco => product.tesco_price,
            Chain::Sainsburys => product.sainsburys_price,
            Chain::Asda => product.asda_price,
            Chain::Morrisons => product.morrisons_price,
        };
        price.filter(|p| p.is_finite() && *p > 0.0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemMatch {
    pub item: ShoppingItem,
    pub product: Product,
    pub best: Option<(Chain, f64)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceComparison {
    pub matches: Vec<ItemMatch>,
    /// Per-chain basket total, in `Chain::ALL` order. Missing prices count as 0.
    pub totals: Vec<(Chain, f64)>,
    pub cheapest: Option<(Chain, f64)>,
    /// Most expensive basket minus the cheapest one.
    pub savings: f64,
}

/// Matches when the product name contains the item text, or the item text
/// contains the product's first word.
pub fn find_product<'p>(item: &ShoppingItem, products: &'p [Product]) -> Option<&'p Product> {
    let text = item.text.trim().to_lowercase();
    if text.is_empty() {
        return None;
    }

    products.iter().find(|product| {
        let name = product.name.to_lowercase();
        let first_word = name.split(' ').next().unwrap_or("");
        name.contains(&text) || (!first_word.is_empty() && text.contains(first_word))
    })
}

pub fn best_price(product: &Product) -> Option<(Chain, f64)> {
    Chain::ALL
        .iter()
        .filter_map(|&chain| chain.price_of(product).map(|p| (chain, p)))
        .fold(None, |best, (chain, price)| match best {
            Some((_, best_price)) if best_price <= price => best,
            _ => Some((chain, price)),
        })
}

pub fn compare_prices(items: &[ShoppingItem], products: &[Product]) -> PriceComparison {
    let matches: Vec<ItemMatch> = items
        .iter()
        .filter_map(|item| {
            find_product(item, products).map(|product| ItemMatch {
                item: item.clone(),
                product: product.clone(),
                best: best_price(product),
            })
        })
        .collect();

    let totals: Vec<(Chain, f64)> = Chain::ALL
        .iter()
        .map(|&chain| {
            let total: f64 = matches
                .iter()
                .map(|m| chain.price_of(&m.product).unwrap_or(0.0))
                .sum();
            (chain, round2(total))
        })
        .collect();

    let cheapest = totals
        .iter()
        .copied()
        .filter(|(_, total)| *total > 0.0)
        .fold(None, |best: Option<(Chain, f64)>, (chain, total)| match best {
            Some((_, best_total)) if best_total <= total => best,
            _ => Some((chain, total)),
        });

    let highest = totals.iter().map(|(_, t)| *t).fold(0.0, f64::max);
    let savings = cheapest.map(|(_, low)| round2(highest - low)).unwrap_or(0.0);

    PriceComparison {
        matches,
        totals,
        cheapest,
        savings,
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, name: &str, prices: [Option<f64>; 4]) -> Product {
        Product {
            id,
            name: name.into(),
            category: "Dairy".into(),
            tesco_price: prices[0],
            sainsburys_price: prices[1],
            asda_price: prices[2],
            morrisons_price: prices[3],
        }
    }

    fn catalogue() -> Vec<Product> {
        vec![
            product(1, "Milk (2L)", [Some(1.45), Some(1.50), Some(1.25), Some(1.40)]),
            product(2, "Bread (Wholemeal)", [Some(1.20), Some(1.35), Some(1.30), Some(1.25)]),
            product(3, "Cheddar Cheese (200g)", [Some(2.50), None, Some(2.40), Some(2.55)]),
        ]
    }

    #[test]
    fn matches_by_substring_either_way() {
        let products = catalogue();
        let semi = ShoppingItem::manual("1", "semi-skimmed milk");
        let cheese = ShoppingItem::manual("2", "cheese");
        let bleach = ShoppingItem::manual("3", "bleach");
        let blank = ShoppingItem::manual("4", "  ");

        assert_eq!(find_product(&semi, &products).map(|p| p.id), Some(1));
        assert_eq!(find_product(&cheese, &products).map(|p| p.id), Some(3));
        assert!(find_product(&bleach, &products).is_none());
        assert!(find_product(&blank, &products).is_none());
    }

    #[test]
    fn best_price_skips_missing_prices() {
        let products = catalogue();
        assert_eq!(best_price(&products[0]), Some((Chain::Asda, 1.25)));
        assert_eq!(best_price(&products[2]), Some((Chain::Asda, 2.40)));
        assert_eq!(best_price(&product(9, "x", [None; 4])), None);
    }

    #[test]
    fn totals_cheapest_and_savings() {
        let items = vec![
            ShoppingItem::manual("1", "milk"),
            ShoppingItem::manual("2", "bread"),
            ShoppingItem::manual("3", "cheese"),
            ShoppingItem::manual("4", "bleach"),
        ];
        let result = compare_prices(&items, &catalogue());

        assert_eq!(result.matches.len(), 3);
        assert_eq!(
            result.totals,
            vec![
                (Chain::Tesco, 5.15),
                (Chain::Sainsburys, 2.85),
                (Chain::Asda, 4.95),
                (Chain::Morrisons, 5.2),
            ]
        );
        // Sainsbury's has no cheese price, so its basket is the smallest.
        assert_eq!(result.cheapest, Some((Chain::Sainsburys, 2.85)));
        assert_eq!(result.savings, 2.35);
    }

    #[test]
    fn no_matches_means_no_cheapest_chain() {
        let result = compare_prices(&[ShoppingItem::manual("1", "bleach")], &catalogue());
        assert!(result.matches.is_empty());
        assert!(result.cheapest.is_none());
        assert_eq!(result.savings, 0.0);
    }
}
