//! Brand catalog index
//!
//! Read-only snapshot of the brand catalog, loaded fresh per request so
//! catalog edits take effect without a restart. The file is a JSON object
//! keyed by category, each category an ordered map of internal id to brand
//! attributes; insertion order in the file is the generation order.
//!
//! Lookup is a linear scan. Catalogs are tens of entries, correctness is
//! the requirement here, not speed.

use crate::error::AppError;
use crate::models::{Brand, BrandCategory};
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    service: Vec<Brand>,
    tire: Vec<Brand>,
}

impl Catalog {
    /// Load the catalog snapshot from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Catalog(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&raw)
    }

    /// Parse a catalog snapshot from a JSON string.
    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        let root: serde_json::Map<String, serde_json::Value> = serde_json::from_str(raw)
            .map_err(|e| AppError::Catalog(format!("Invalid catalog JSON: {}", e)))?;

        let mut catalog = Catalog::default();
        for category in BrandCategory::ALL {
            let Some(entries) = root.get(category.as_str()) else {
                continue;
            };
            let entries = entries.as_object().ok_or_else(|| {
                AppError::Catalog(format!(
                    "Catalog category '{}' must be an object keyed by brand id",
                    category
                ))
            })?;

            let brands = catalog.brands_mut(category);
            for (id, value) in entries {
                let mut brand: Brand = serde_json::from_value(value.clone()).map_err(|e| {
                    AppError::Catalog(format!("Invalid brand entry '{}': {}", id, e))
                })?;
                brand.id = id.clone();
                brands.push(brand);
            }
        }

        Ok(catalog)
    }

    /// All brands in a category, in catalog order.
    pub fn brands(&self, category: BrandCategory) -> &[Brand] {
        match category {
            BrandCategory::Service => &self.service,
            BrandCategory::Tire => &self.tire,
        }
    }

    /// Resolve a display name to the internal brand id. Returns `None` when
    /// no brand in the category carries the name; callers treat that as a
    /// skip-with-warning, never a fatal error.
    pub fn find_internal_id(&self, category: BrandCategory, display_name: &str) -> Option<&str> {
        self.brands(category)
            .iter()
            .find(|b| b.name == display_name)
            .map(|b| b.id.as_str())
    }

    fn brands_mut(&mut self, category: BrandCategory) -> &mut Vec<Brand> {
        match category {
            BrandCategory::Service => &mut self.service,
            BrandCategory::Tire => &mut self.tire,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r##"{
        "service": {
            "acme": {
                "name": "Acme",
                "colors": { "primary": "#112233", "secondary": "#ffffff" },
                "logoURL": "assets/acme/logo.jpg"
            },
            "zenith": {
                "name": "Zenith Auto Care",
                "colors": { "primary": "#445566", "secondary": "#eeeeee" },
                "logoURL": "assets/zenith/logo.jpg"
            }
        },
        "tire": {
            "acme-tire": {
                "name": "Acme Tire",
                "colors": { "primary": "#003366", "secondary": "#ffffff" },
                "logoURL": "assets/acme-tire/logo.jpg"
            }
        }
    }"##;

    #[test]
    fn test_find_internal_id_for_every_present_name() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        for category in BrandCategory::ALL {
            for brand in catalog.brands(category) {
                assert_eq!(
                    catalog.find_internal_id(category, &brand.name),
                    Some(brand.id.as_str())
                );
            }
        }
    }

    #[test]
    fn test_find_internal_id_absent_name() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        assert_eq!(catalog.find_internal_id(BrandCategory::Service, "Nope"), None);
        // Display names are scoped to their category
        assert_eq!(
            catalog.find_internal_id(BrandCategory::Service, "Acme Tire"),
            None
        );
    }

    #[test]
    fn test_brands_preserve_catalog_order() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        let ids: Vec<&str> = catalog
            .brands(BrandCategory::Service)
            .iter()
            .map(|b| b.id.as_str())
            .collect();
        assert_eq!(ids, vec!["acme", "zenith"]);
    }

    #[test]
    fn test_missing_category_is_empty() {
        let catalog = Catalog::from_json(r#"{ "service": {} }"#).unwrap();
        assert!(catalog.brands(BrandCategory::Tire).is_empty());
    }

    #[test]
    fn test_load_missing_file_is_catalog_error() {
        let err = Catalog::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, AppError::Catalog(_)));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, CATALOG).unwrap();
        let catalog = Catalog::load(&path).unwrap();
        assert_eq!(catalog.brands(BrandCategory::Service).len(), 2);
    }
}
