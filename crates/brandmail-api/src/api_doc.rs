//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Brandmail API",
        version = "0.1.0",
        description = "Email bundle generator: turns a brand catalog, uploaded JPEG images, and free-text copy into per-brand HTML email bundles delivered as one zip archive."
    ),
    paths(
        handlers::brands::list_brands,
        handlers::generate::generate_emails,
    ),
    components(
        schemas(
            handlers::brands::BrandSummary,
            handlers::brands::BrandListing,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "brands", description = "Brand catalog listing"),
        (name = "emails", description = "Email bundle generation")
    )
)]
pub struct ApiDoc;
