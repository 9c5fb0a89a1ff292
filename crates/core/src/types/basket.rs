//! Basket line-items and their aggregation.
//!
//! The Ducktastic API stores a basket as a multiset: one [`LineItem`] per unit
//! in the basket, not one row per (product, quantity). [`Basket`] groups those
//! units by product for display and keeps the total price.
//!
//! # Invariants
//!
//! - Each row's `count` equals the number of line-items with that product ID.
//! - `total` is the sum of every raw line-item price, which is the same as
//!   the sum of `count * unit price` over the rows.
//! - Rows appear in order of the first occurrence of their product.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// One unit of one product in a customer's basket, as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub product_price: Price,
    /// Image path relative to the storefront's image directory.
    #[serde(default)]
    pub img_src: String,
}

/// A product in the basket together with how many units of it there are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasketRow {
    /// Snapshot of the first line-item seen for this product.
    pub product: LineItem,
    /// Number of line-items for this product, always at least 1.
    pub count: u32,
}

impl BasketRow {
    /// Price of a single unit.
    #[must_use]
    pub const fn unit_price(&self) -> Price {
        self.product.product_price
    }

    /// `count * unit price`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price() * self.count
    }
}

/// A customer's basket grouped by product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Basket {
    rows: Vec<BasketRow>,
    index: HashMap<ProductId, usize>,
    total: Price,
    item_count: usize,
}

impl Basket {
    /// An empty basket.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Group a flat list of line-items by product.
    ///
    /// The first line-item seen for a product provides the snapshot kept in
    /// its row; later duplicates only bump the count. The total is summed
    /// over the raw line-items.
    pub fn aggregate<I>(items: I) -> Self
    where
        I: IntoIterator<Item = LineItem>,
    {
        let mut basket = Self::empty();
        for item in items {
            basket.total = basket.total + item.product_price;
            basket.item_count += 1;

            if let Some(&position) = basket.index.get(&item.product_id) {
                if let Some(row) = basket.rows.get_mut(position) {
                    row.count += 1;
                }
            } else {
                basket.index.insert(item.product_id, basket.rows.len());
                basket.rows.push(BasketRow {
                    product: item,
                    count: 1,
                });
            }
        }
        basket
    }

    /// Grouped rows in order of first occurrence.
    #[must_use]
    pub fn rows(&self) -> &[BasketRow] {
        &self.rows
    }

    /// The row for a product, if it is in the basket.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&BasketRow> {
        self.index
            .get(&product_id)
            .and_then(|&position| self.rows.get(position))
    }

    /// Total price of every unit in the basket.
    #[must_use]
    pub const fn total(&self) -> Price {
        self.total
    }

    /// Number of units (raw line-items) in the basket.
    #[must_use]
    pub const fn item_count(&self) -> usize {
        self.item_count
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Expand the rows back into one line-item per unit.
    #[must_use]
    pub fn to_line_items(&self) -> Vec<LineItem> {
        self.rows
            .iter()
            .flat_map(|row| (0..row.count).map(|_| row.product.clone()))
            .collect()
    }
}

impl FromIterator<LineItem> for Basket {
    fn from_iter<I: IntoIterator<Item = LineItem>>(iter: I) -> Self {
        Self::aggregate(iter)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn item(id: i32, price: i64) -> LineItem {
        LineItem {
            product_id: ProductId::new(id),
            product_name: format!("Duck {id}"),
            product_price: Price::from(price),
            img_src: format!("/ducks/{id}.png"),
        }
    }

    fn fixtures() -> Vec<Vec<LineItem>> {
        vec![
            vec![],
            vec![item(1, 50)],
            vec![item(1, 50), item(1, 50), item(2, 30)],
            vec![item(3, 10), item(1, 50), item(3, 10), item(2, 30), item(3, 10)],
            (0..25).map(|n| item(n % 4, i64::from(n % 4) * 15 + 5)).collect(),
        ]
    }

    #[test]
    fn test_example_basket() {
        let basket = Basket::aggregate(vec![item(1, 50), item(1, 50), item(2, 30)]);

        assert_eq!(basket.len(), 2);
        assert_eq!(basket.get(ProductId::new(1)).unwrap().count, 2);
        assert_eq!(basket.get(ProductId::new(2)).unwrap().count, 1);
        assert_eq!(basket.total(), Price::from(130));
        assert_eq!(basket.item_count(), 3);
    }

    #[test]
    fn test_empty_input() {
        let basket = Basket::aggregate(Vec::new());
        assert!(basket.is_empty());
        assert_eq!(basket.total(), Price::ZERO);
        assert_eq!(basket.item_count(), 0);
        assert_eq!(basket, Basket::empty());
    }

    #[test]
    fn test_count_matches_line_item_cardinality() {
        for items in fixtures() {
            let basket = Basket::aggregate(items.clone());
            for row in basket.rows() {
                let expected = items
                    .iter()
                    .filter(|i| i.product_id == row.product.product_id)
                    .count();
                assert_eq!(row.count as usize, expected);
            }
            let grouped: usize = basket.rows().iter().map(|r| r.count as usize).sum();
            assert_eq!(grouped, items.len());
        }
    }

    #[test]
    fn test_total_equals_sum_of_line_totals() {
        for items in fixtures() {
            let basket = Basket::aggregate(items);
            let from_rows: Price = basket.rows().iter().map(BasketRow::line_total).sum();
            assert_eq!(basket.total(), from_rows);
        }
    }

    #[test]
    fn test_reaggregation_is_idempotent() {
        for items in fixtures() {
            let basket = Basket::aggregate(items);
            let again = Basket::aggregate(basket.to_line_items());
            assert_eq!(again, basket);
        }
    }

    #[test]
    fn test_rows_keep_first_occurrence_order() {
        let basket: Basket = vec![item(3, 10), item(1, 50), item(3, 10), item(2, 30)]
            .into_iter()
            .collect();
        let ids: Vec<i32> = basket
            .rows()
            .iter()
            .map(|r| r.product.product_id.as_i32())
            .collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_first_snapshot_is_kept() {
        let mut renamed = item(1, 50);
        renamed.product_name = "Renamed duck".to_string();
        let basket = Basket::aggregate(vec![item(1, 50), renamed]);
        assert_eq!(basket.rows()[0].product.product_name, "Duck 1");
        assert_eq!(basket.rows()[0].count, 2);
    }

    #[test]
    fn test_decimal_prices() {
        let mut cheap = item(9, 0);
        cheap.product_price = Price::new(Decimal::new(1995, 2));
        let basket = Basket::aggregate(vec![cheap.clone(), cheap]);
        assert_eq!(basket.total().to_string(), "39.9 DKK");
        assert_eq!(basket.rows()[0].line_total(), basket.total());
    }

    #[test]
    fn test_deserialize_api_payload() {
        let json = r#"[
            {"productId": 1, "productName": "Rubber Duck", "productPrice": 50, "imgSrc": "/ducks/rubber.png", "basketId": 4},
            {"productId": 1, "productName": "Rubber Duck", "productPrice": 50, "imgSrc": "/ducks/rubber.png", "basketId": 4},
            {"productId": 2, "productName": "Pirate Duck", "productPrice": 30}
        ]"#;
        let items: Vec<LineItem> = serde_json::from_str(json).unwrap();
        let basket = Basket::aggregate(items);

        assert_eq!(basket.total(), Price::from(130));
        assert_eq!(basket.get(ProductId::new(2)).unwrap().product.img_src, "");
    }
}
