use std::sync::Arc;

use axum::{extract::State, Json};
use brandmail_core::{Brand, BrandCategory, Catalog};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct BrandSummary {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BrandListing {
    pub service: Vec<BrandSummary>,
    pub tire: Vec<BrandSummary>,
}

fn summaries(brands: &[Brand]) -> Vec<BrandSummary> {
    brands
        .iter()
        .map(|b| BrandSummary {
            id: b.id.clone(),
            name: b.name.clone(),
        })
        .collect()
}

/// List the configured brands per category, in catalog order.
///
/// The catalog file is re-read on every call so edits take effect without
/// a restart.
#[utoipa::path(
    get,
    path = "/",
    tag = "brands",
    responses(
        (status = 200, description = "Brand listing by category", body = BrandListing),
        (status = 500, description = "Catalog could not be loaded", body = ErrorResponse)
    )
)]
pub async fn list_brands(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BrandListing>, HttpAppError> {
    let catalog = Catalog::load(&state.config.catalog_path)?;

    Ok(Json(BrandListing {
        service: summaries(catalog.brands(BrandCategory::Service)),
        tire: summaries(catalog.brands(BrandCategory::Tire)),
    }))
}
