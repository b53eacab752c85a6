//! Product records
//!
//! A product is loaded verbatim from the catalog file and never mutated.

use serde::{Deserialize, Serialize};
use serde_json::Number;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,

    /// Kept as the JSON number it was written as, so `15000` renders as `15000`
    pub price: Number,

    pub stock: i64,

    /// Comma-separated keywords, e.g. `"food,grain"`
    #[serde(default)]
    pub tags: String,
}

impl Product {
    pub fn new(name: &str, price: impl Into<Number>, stock: i64, tags: &str) -> Self {
        Self {
            name: name.to_string(),
            price: price.into(),
            stock,
            tags: tags.to_string(),
        }
    }

    /// Lowercased, trimmed, non-empty tags
    pub fn tag_list(&self) -> impl Iterator<Item = String> + '_ {
        self.tags
            .split(',')
            .map(|tag| tag.trim().to_lowercase())
            .filter(|tag| !tag.is_empty())
    }

    /// Canned answer used when a message names this product
    pub fn info_line(&self) -> String {
        format!(
            "{} is Rp{} and we have {} in stock.",
            self.name, self.price, self.stock
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_line_keeps_integer_price() {
        let rice = Product::new("Rice", 15000, 10, "food,grain");
        assert_eq!(rice.info_line(), "Rice is Rp15000 and we have 10 in stock.");
    }

    #[test]
    fn tag_list_skips_blanks() {
        let product = Product::new("Soap", 5000, 3, " Bath, ,soap ,");
        let tags: Vec<String> = product.tag_list().collect();
        assert_eq!(tags, vec!["bath", "soap"]);
    }

    #[test]
    fn deserializes_without_tags() {
        let product: Product =
            serde_json::from_str(r#"{"name":"Tea","price":13000.5,"stock":4}"#).unwrap();
        assert_eq!(product.tags, "");
        assert_eq!(product.price.to_string(), "13000.5");
    }
}
