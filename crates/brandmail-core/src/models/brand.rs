//! Brand catalog models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use utoipa::ToSchema;

/// Top-level grouping of brands. Determines which header image and copy
/// fields apply to a brand, and the first path segment in the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BrandCategory {
    Service,
    Tire,
}

impl BrandCategory {
    /// Iteration order for the generation loop and the archive layout.
    pub const ALL: [BrandCategory; 2] = [BrandCategory::Service, BrandCategory::Tire];

    pub fn as_str(&self) -> &'static str {
        match self {
            BrandCategory::Service => "service",
            BrandCategory::Tire => "tire",
        }
    }
}

impl fmt::Display for BrandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrandCategory {
    type Err = crate::error::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "service" => Ok(BrandCategory::Service),
            "tire" => Ok(BrandCategory::Tire),
            _ => Err(crate::error::AppError::InvalidInput(format!(
                "Unknown brand category: {}",
                s
            ))),
        }
    }
}

/// Styling colors for one brand, echoed into the rendered document.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BrandColors {
    pub primary: String,
    pub secondary: String,
    #[serde(default)]
    pub accent: Option<String>,
}

/// One labelled hyperlink in the header or footer link list.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Link {
    pub label: String,
    pub url: String,
}

/// One catalog entry. The internal id is the map key in the catalog file
/// (stable, used for archive paths); the display name is unique within a
/// category and is what form submissions are keyed by.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    /// Internal identifier, filled in from the catalog map key.
    #[serde(skip)]
    pub id: String,
    /// Display name, unique within a category.
    pub name: String,
    pub colors: BrandColors,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub header_links: Vec<Link>,
    #[serde(default)]
    pub footer_links: Vec<Link>,
    #[serde(alias = "logoURL")]
    #[schema(value_type = String)]
    pub logo_url: PathBuf,
    #[serde(default, alias = "footerGraphicURL")]
    #[schema(value_type = Option<String>)]
    pub footer_graphic_url: Option<PathBuf>,
    #[serde(default)]
    pub notification: Option<String>,
    #[serde(default)]
    pub disclaimer: Option<String>,
}
