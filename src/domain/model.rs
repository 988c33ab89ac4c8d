use crate::utils::error::{CartError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ProductId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Product as served by the inventory service. Only `id` is interpreted;
/// every other field is carried through to the snapshot untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl Product {
    pub fn new(id: ProductId) -> Self {
        Self {
            id,
            metadata: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if key != "id" {
            self.metadata.insert(key, value.into());
        }
        self
    }

    fn first_str(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .find_map(|key| self.metadata.get(*key).and_then(Value::as_str))
    }

    pub fn title(&self) -> Option<&str> {
        self.first_str(&["title", "name"])
    }

    pub fn price(&self) -> Option<f64> {
        self.metadata.get("price").and_then(Value::as_f64)
    }

    pub fn image(&self) -> Option<&str> {
        self.first_str(&["image", "imageUrl"])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    #[serde(default)]
    pub id: Option<ProductId>,
    pub amount: i64,
}

/// A product held in the cart. Serialized flat: `{"id":1,...,"amount":2}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub product: Product,
    pub amount: u32,
}

impl CartLine {
    /// `amount` in the product payload is shadowed by the cart amount.
    pub fn new(mut product: Product, amount: u32) -> Self {
        product.metadata.remove("amount");
        Self { product, amount }
    }

    pub fn id(&self) -> ProductId {
        self.product.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

/// Ordered cart lines, at most one per product id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn iter(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter()
    }

    pub fn find(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id() == product_id)
    }

    pub fn amount_of(&self, product_id: ProductId) -> u32 {
        self.find(product_id).map(|line| line.amount).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total_units(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.amount)).sum()
    }

    pub fn check_invariants(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.lines.len());
        for line in &self.lines {
            if line.amount == 0 {
                return Err(CartError::InvariantViolation {
                    message: format!("product {} has amount 0", line.id()),
                });
            }
            if !seen.insert(line.id()) {
                return Err(CartError::InvariantViolation {
                    message: format!("product {} appears more than once", line.id()),
                });
            }
        }
        Ok(())
    }

    pub(crate) fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.id() == product_id)
    }

    pub(crate) fn position(&self, product_id: ProductId) -> Option<usize> {
        self.lines.iter().position(|line| line.id() == product_id)
    }

    pub(crate) fn push(&mut self, line: CartLine) {
        self.lines.push(line);
    }

    pub(crate) fn remove_at(&mut self, index: usize) -> CartLine {
        self.lines.remove(index)
    }
}

impl From<Vec<CartLine>> for Cart {
    fn from(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartLine;
    type IntoIter = std::slice::Iter<'a, CartLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn line(id: u64, amount: u32) -> CartLine {
        CartLine::new(
            Product::new(ProductId(id))
                .with_field("title", format!("Tênis {}", id))
                .with_field("price", 139.9)
                .with_field("image", format!("https://cdn.example.com/{}.jpg", id)),
            amount,
        )
    }

    #[test]
    fn test_snapshot_shape_is_flat_array() {
        let cart = Cart::from(vec![line(1, 2)]);
        let value = serde_json::to_value(&cart).unwrap();

        assert_eq!(
            value,
            json!([{
                "id": 1,
                "title": "Tênis 1",
                "price": 139.9,
                "image": "https://cdn.example.com/1.jpg",
                "amount": 2
            }])
        );
    }

    #[test]
    fn test_lookup_helpers() {
        let cart = Cart::from(vec![line(1, 2), line(7, 3)]);

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.amount_of(ProductId(7)), 3);
        assert_eq!(cart.amount_of(ProductId(99)), 0);
        assert_eq!(cart.position(ProductId(7)), Some(1));
        assert_eq!(cart.total_units(), 5);
        assert!(cart.find(ProductId(1)).is_some());
    }

    #[test]
    fn test_check_invariants() {
        assert!(Cart::from(vec![line(1, 1), line(2, 4)]).check_invariants().is_ok());
        assert!(Cart::from(vec![line(1, 1), line(1, 2)]).check_invariants().is_err());
        assert!(Cart::from(vec![line(3, 0)]).check_invariants().is_err());
    }

    #[test]
    fn test_stock_without_id() {
        let stock: Stock = serde_json::from_value(json!({"amount": 5})).unwrap();
        assert_eq!(stock.amount, 5);
        assert_eq!(stock.id, None);
    }

    #[test]
    fn test_negative_stock_deserializes() {
        let stock: Stock = serde_json::from_value(json!({"id": 1, "amount": -1})).unwrap();
        assert_eq!(stock.amount, -1);
    }

    #[test]
    fn test_unknown_product_fields_survive_snapshot() {
        let product: Product = serde_json::from_value(json!({
            "id": 1,
            "name": "Tênis",
            "price": 1.0,
            "imageUrl": "i",
            "brand": "Nike",
            "sizes": [38, 39]
        }))
        .unwrap();
        assert_eq!(product.title(), Some("Tênis"));
        assert_eq!(product.image(), Some("i"));
        assert_eq!(product.price(), Some(1.0));

        let cart = Cart::from(vec![CartLine::new(product, 2)]);
        let blob = serde_json::to_vec(&cart).unwrap();
        let restored: Cart = serde_json::from_slice(&blob).unwrap();

        assert_eq!(restored, cart);
        let line = &restored.lines()[0];
        assert_eq!(line.amount, 2);
        assert_eq!(line.product.metadata.get("brand"), Some(&json!("Nike")));
        assert!(!line.product.metadata.contains_key("amount"));
        assert!(!line.product.metadata.contains_key("id"));
    }

    #[test]
    fn test_product_amount_field_is_shadowed() {
        let product = Product::new(ProductId(3)).with_field("amount", 10);
        let value = serde_json::to_value(CartLine::new(product, 1)).unwrap();
        assert_eq!(value, json!({"id": 3, "amount": 1}));
    }
}
