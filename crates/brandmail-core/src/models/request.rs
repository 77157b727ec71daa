//! Typed generation request
//!
//! The form boundary submits copy per category and coupon identifier lists
//! keyed by brand display name. Keeping this as a typed structure (instead
//! of string-concatenated field names) removes a class of lookup bugs when
//! display names contain special characters.

use crate::models::BrandCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Copy and coupon assignments for one category.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCopy {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body_copy: String,
    /// Comma-delimited coupon identifier string keyed by brand display name.
    #[serde(default)]
    pub coupons: BTreeMap<String, String>,
}

impl CategoryCopy {
    /// Ordered coupon identifiers for a brand. A brand with no entry at all
    /// is treated as an empty coupon list, not an error.
    pub fn coupon_ids(&self, display_name: &str) -> Vec<String> {
        self.coupons
            .get(display_name)
            .map(|raw| parse_coupon_ids(raw))
            .unwrap_or_default()
    }
}

/// The whole generation submission, one copy block per category.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct GenerateRequest {
    #[serde(default)]
    pub service: CategoryCopy,
    #[serde(default)]
    pub tire: CategoryCopy,
}

impl GenerateRequest {
    pub fn copy_for(&self, category: BrandCategory) -> &CategoryCopy {
        match category {
            BrandCategory::Service => &self.service,
            BrandCategory::Tire => &self.tire,
        }
    }
}

/// Parse a submitted comma-delimited identifier string. Identifiers are
/// trimmed and empty segments dropped; submitted order is preserved.
pub fn parse_coupon_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coupon_ids_trims_and_keeps_order() {
        assert_eq!(parse_coupon_ids(" 2, 1 ,7"), vec!["2", "1", "7"]);
        assert_eq!(parse_coupon_ids(""), Vec::<String>::new());
        assert_eq!(parse_coupon_ids(" , ,3,"), vec!["3"]);
    }

    #[test]
    fn test_missing_brand_entry_is_empty_list() {
        let copy = CategoryCopy::default();
        assert!(copy.coupon_ids("Acme").is_empty());
    }

    #[test]
    fn test_coupon_ids_for_known_brand() {
        let mut copy = CategoryCopy::default();
        copy.coupons.insert("Acme".to_string(), "1,2".to_string());
        assert_eq!(copy.coupon_ids("Acme"), vec!["1", "2"]);
    }

    #[test]
    fn test_request_deserializes_with_missing_category() {
        let req: GenerateRequest = serde_json::from_str(
            r#"{ "service": { "title": "Hi [Brand]", "bodyCopy": "Save big", "coupons": { "Acme": "1,2" } } }"#,
        )
        .unwrap();
        assert_eq!(req.service.title, "Hi [Brand]");
        assert_eq!(req.copy_for(BrandCategory::Service).coupon_ids("Acme"), vec!["1", "2"]);
        assert!(req.tire.title.is_empty());
    }
}
