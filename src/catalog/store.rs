//! Catalog store
//!
//! Immutable product list loaded once at startup from a JSON array.

use std::fs;
use std::path::Path;

use log::{info, warn};

use super::product::Product;
use crate::error::CatalogError;

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Read and validate the catalog file. Any failure here is fatal for the server.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path).map_err(|e| CatalogError::Io(path.to_path_buf(), e))?;
        let products: Vec<Product> =
            serde_json::from_str(&raw).map_err(|e| CatalogError::Parse(path.to_path_buf(), e))?;

        let catalog = Self::from_products(products)?;
        if catalog.is_empty() {
            warn!("Catalog {} contains no products", path.display());
        } else {
            info!("Loaded {} products from {}", catalog.len(), path.display());
        }
        Ok(catalog)
    }

    pub fn from_products(products: Vec<Product>) -> Result<Self, CatalogError> {
        if let Some(index) = products.iter().position(|p| p.name.trim().is_empty()) {
            return Err(CatalogError::InvalidProduct(format!(
                "product #{} has an empty name",
                index
            )));
        }
        Ok(Self { products })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_catalog(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "shop-chat-{}-{}.json",
            name,
            std::process::id()
        ));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_products_in_file_order() {
        let path = temp_catalog(
            "ok",
            r#"[{"name":"Rice","price":15000,"stock":10,"tags":"food,grain"},
                {"name":"Sugar","price":12000,"stock":0,"tags":"food"}]"#,
        );
        let catalog = Catalog::load(&path).unwrap();
        let names: Vec<&str> = catalog.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Rice", "Sugar"]);
        fs::remove_file(path).ok();
    }

    #[test]
    fn missing_file_is_an_error() {
        let path = std::env::temp_dir().join("shop-chat-definitely-missing.json");
        assert!(matches!(Catalog::load(&path), Err(CatalogError::Io(..))));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = temp_catalog("bad", r#"[{"name":"Rice","price":"cheap"}]"#);
        assert!(matches!(Catalog::load(&path), Err(CatalogError::Parse(..))));
        fs::remove_file(path).ok();
    }

    #[test]
    fn empty_catalog_loads() {
        let path = temp_catalog("empty", "[]");
        let catalog = Catalog::load(&path).unwrap();
        assert!(catalog.is_empty());
        fs::remove_file(path).ok();
    }

    #[test]
    fn rejects_unnamed_products() {
        let result = Catalog::from_products(vec![Product::new("  ", 1, 1, "")]);
        assert!(matches!(result, Err(CatalogError::InvalidProduct(_))));
    }
}
