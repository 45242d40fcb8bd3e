//! Cart line items and the collection rules the store applies to them.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{CoreError, CoreResult};

/// A single cart entry.
///
/// `title`, `image_url` and `price` are display data carried through
/// untouched. `quantity` is not validated and may drop to zero or below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,
    pub title: String,
    pub image_url: String,
    #[serde(deserialize_with = "price_or_nan")]
    pub price: f64,
    pub quantity: i64,
}

/// Older snapshots may hold `null` where a non-finite price was written.
fn price_or_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// A product offered to the cart, before it has a quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLineItem {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub price: f64,
}

impl NewLineItem {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }

    fn with_quantity(self, quantity: i64) -> LineItem {
        LineItem {
            id: self.id,
            title: self.title,
            image_url: self.image_url,
            price: self.price,
            quantity,
        }
    }
}

/// Aggregate counts over a cart. Prices are opaque, so no totals in money.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    pub distinct_items: usize,
    pub total_quantity: i64,
}

/// Ordered cart contents, keyed logically by item id.
///
/// Insertion order is the only ordering. Entries are never removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartCollection {
    items: Vec<LineItem>,
}

impl CartCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// Bumps the quantity of an existing entry or appends a new one with
    /// quantity 1. Returns `true` when an entry was appended.
    ///
    /// Non-finite prices are rejected: JSON has no encoding for them.
    pub fn add(&mut self, item: NewLineItem) -> CoreResult<bool> {
        if !item.price.is_finite() {
            return Err(CoreError::InvalidInput(format!(
                "price of {} must be finite, got {}",
                item.id, item.price
            )));
        }
        if let Some(existing) = self.get_mut(&item.id) {
            existing.quantity = existing.quantity.saturating_add(1);
            return Ok(false);
        }
        self.items.push(item.with_quantity(1));
        Ok(true)
    }

    /// Returns `false` if no entry has this id.
    pub fn increment(&mut self, id: &str) -> bool {
        match self.get_mut(id) {
            Some(item) => {
                item.quantity = item.quantity.saturating_add(1);
                true
            }
            None => false,
        }
    }

    /// No floor: quantity can reach zero or go negative, and the entry stays.
    /// Only the `i64` range bounds it.
    pub fn decrement(&mut self, id: &str) -> bool {
        match self.get_mut(id) {
            Some(item) => {
                item.quantity = item.quantity.saturating_sub(1);
                true
            }
            None => false,
        }
    }

    pub fn summary(&self) -> CartSummary {
        CartSummary {
            distinct_items: self.items.len(),
            total_quantity: self
                .items
                .iter()
                .fold(0i64, |total, item| total.saturating_add(item.quantity)),
        }
    }

    /// Encodes the full collection as the persisted snapshot.
    pub fn to_json(&self) -> CoreResult<String> {
        serde_json::to_string(self)
            .map_err(|error| CoreError::Internal(format!("cart serialize error: {error}")))
    }

    /// Parses a persisted snapshot. The shape is trusted as-is.
    pub fn from_json(data: &str) -> CoreResult<Self> {
        serde_json::from_str(data).map_err(|error| {
            CoreError::Deserialization(format!("cart snapshot parse error: {error}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str) -> NewLineItem {
        NewLineItem::new(id, format!("Product {id}"), format!("https://img/{id}.png"), 9.5)
    }

    fn quantity(cart: &CartCollection, id: &str) -> i64 {
        cart.get(id).expect("item").quantity
    }

    #[test]
    fn add_new_item_appends_with_quantity_one() {
        let mut cart = CartCollection::new();
        assert!(cart.add(product("a")).expect("add"));
        assert!(cart.add(product("b")).expect("add"));

        let ids: Vec<&str> = cart.items().iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(quantity(&cart, "b"), 1);
        assert_eq!(cart.get("b").expect("item").title, "Product b");
    }

    #[test]
    fn add_existing_item_bumps_quantity_without_growing() {
        let mut cart = CartCollection::new();
        cart.add(product("p1")).expect("add");
        assert!(!cart.add(product("p1")).expect("add"));
        assert_eq!(cart.len(), 1);
        assert_eq!(quantity(&cart, "p1"), 2);
    }

    #[test]
    fn add_add_increment_yields_three() {
        let mut cart = CartCollection::new();
        cart.add(product("p1")).expect("add");
        cart.add(product("p1")).expect("add");
        assert!(cart.increment("p1"));
        assert_eq!(cart.len(), 1);
        assert_eq!(quantity(&cart, "p1"), 3);
    }

    #[test]
    fn unknown_id_leaves_collection_unchanged() {
        let mut cart = CartCollection::new();
        cart.add(product("a")).expect("add");
        cart.add(product("b")).expect("add");
        let before = cart.clone();

        assert!(!cart.increment("missing"));
        assert!(!cart.decrement("missing"));
        assert_eq!(cart, before);
    }

    #[test]
    fn increment_then_decrement_restores_quantity() {
        let mut cart = CartCollection::new();
        cart.add(product("a")).expect("add");
        cart.add(product("a")).expect("add");
        cart.increment("a");
        cart.decrement("a");
        assert_eq!(quantity(&cart, "a"), 2);
    }

    #[test]
    fn decrement_has_no_floor_and_never_removes() {
        let mut cart = CartCollection::new();
        cart.add(product("p1")).expect("add");
        cart.decrement("p1");
        assert_eq!(quantity(&cart, "p1"), 0);
        cart.decrement("p1");
        assert_eq!(quantity(&cart, "p1"), -1);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn mixed_operations_keep_ids_unique() {
        let mut cart = CartCollection::new();
        for id in ["a", "b", "a", "c", "b", "a"] {
            cart.add(product(id)).expect("add");
            cart.increment(id);
            cart.decrement("c");
        }
        let mut ids: Vec<&str> = cart.items().iter().map(|item| item.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), cart.len());
        assert_eq!(cart.len(), 3);
    }

    #[test]
    fn summary_counts_entries_and_quantities() {
        let mut cart = CartCollection::new();
        cart.add(product("a")).expect("add");
        cart.add(product("a")).expect("add");
        cart.add(product("b")).expect("add");
        assert_eq!(
            cart.summary(),
            CartSummary {
                distinct_items: 2,
                total_quantity: 3,
            }
        );
    }

    #[test]
    fn snapshot_uses_persisted_field_names() {
        let mut cart = CartCollection::new();
        cart.add(product("a")).expect("add");
        let json = cart.to_json().expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("value");
        assert_eq!(
            value,
            serde_json::json!([{
                "id": "a",
                "title": "Product a",
                "image_url": "https://img/a.png",
                "price": 9.5,
                "quantity": 1
            }])
        );
    }

    #[test]
    fn parses_persisted_snapshot() {
        let data = r#"[{"id":"a","title":"A","image_url":"u","price":3,"quantity":2}]"#;
        let cart = CartCollection::from_json(data).expect("parse");
        assert_eq!(cart.len(), 1);
        assert_eq!(quantity(&cart, "a"), 2);
        assert_eq!(cart.get("a").expect("item").price, 3.0);
    }

    #[test]
    fn malformed_snapshot_is_a_deserialization_error() {
        let err = CartCollection::from_json("{not json").expect_err("malformed");
        assert!(matches!(err, CoreError::Deserialization(_)));

        let err = CartCollection::from_json(r#"[{"id":"a"}]"#).expect_err("missing fields");
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn null_price_in_snapshot_keeps_the_cart() {
        let data = r#"[{"id":"a","title":"A","image_url":"u","price":null,"quantity":2},
            {"id":"b","title":"B","image_url":"u","price":1.5,"quantity":1}]"#;
        let cart = CartCollection::from_json(data).expect("parse");
        assert_eq!(cart.len(), 2);
        assert!(cart.get("a").expect("item").price.is_nan());
        assert_eq!(quantity(&cart, "a"), 2);
        assert_eq!(cart.get("b").expect("item").price, 1.5);
    }

    #[test]
    fn non_finite_price_is_rejected_and_snapshot_round_trips() {
        let mut cart = CartCollection::new();
        cart.add(product("a")).expect("add");
        for price in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let err = cart
                .add(NewLineItem::new("b", "B", "u", price))
                .expect_err("non-finite price");
            assert!(matches!(err, CoreError::InvalidInput(_)));
        }
        assert_eq!(cart.len(), 1);

        let reloaded = CartCollection::from_json(&cart.to_json().expect("json")).expect("parse");
        assert_eq!(reloaded, cart);
    }

    #[test]
    fn quantity_saturates_at_the_i64_bounds() {
        let data = format!(
            r#"[{{"id":"a","title":"A","image_url":"u","price":1,"quantity":{}}},
               {{"id":"b","title":"B","image_url":"u","price":1,"quantity":{}}}]"#,
            i64::MAX,
            i64::MIN
        );
        let mut cart = CartCollection::from_json(&data).expect("parse");

        assert!(cart.increment("a"));
        cart.add(product("a")).expect("add");
        assert_eq!(quantity(&cart, "a"), i64::MAX);

        assert!(cart.decrement("b"));
        assert_eq!(quantity(&cart, "b"), i64::MIN);

        assert_eq!(cart.summary().total_quantity, -1);
    }
}
