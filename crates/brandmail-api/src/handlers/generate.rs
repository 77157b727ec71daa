//! Email bundle generation handler
//!
//! Receives the multipart form (header images, coupon images, and the JSON
//! copy payload), spools every file to disk, runs the generation pipeline,
//! and streams the finished zip back as an attachment. The spool directory
//! is removed on every path, success or failure.

use std::path::Path;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::multipart::Field,
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::Response,
};
use brandmail_core::{AppError, Catalog, GenerateRequest, UploadedFile};
use brandmail_pipeline::UploadSet;
use tokio::fs;
use uuid::Uuid;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

const REQUEST_FIELD: &str = "request";
const SERVICE_HEADER_FIELD: &str = "service_header_image";
const TIRE_HEADER_FIELD: &str = "tire_header_image";
const COUPON_FIELD: &str = "coupon_image";

/// Generate the per-brand email bundle.
///
/// Expects a multipart form with a JSON `request` part, one header image
/// per populated category, and any number of `coupon_image` parts whose
/// filenames start with a coupon identifier.
#[utoipa::path(
    post,
    path = "/generate-emails",
    tag = "emails",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Zip archive of per-brand email bundles", content_type = "application/zip"),
        (status = 400, description = "Invalid request payload or non-JPEG upload", body = ErrorResponse),
        (status = 413, description = "Uploaded file too large", body = ErrorResponse),
        (status = 500, description = "Generation failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "generate_emails"))]
pub async fn generate_emails(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, HttpAppError> {
    let spool = state
        .config
        .work_dir
        .join(format!("uploads-{}", Uuid::new_v4()));
    fs::create_dir_all(&spool).await.map_err(|e| {
        AppError::Internal(format!(
            "Failed to create spool directory {}: {}",
            spool.display(),
            e
        ))
    })?;

    let result = receive_and_generate(&state, multipart, &spool).await;

    // Spool removal failures are diagnostics only, never the request outcome.
    if let Err(e) = fs::remove_dir_all(&spool).await {
        tracing::warn!(
            spool = %spool.display(),
            error = %e,
            "Failed to remove upload spool directory"
        );
    }

    result
}

async fn receive_and_generate(
    state: &AppState,
    multipart: Multipart,
    spool: &Path,
) -> Result<Response, HttpAppError> {
    let (request, uploads) =
        spool_uploads(multipart, spool, state.config.max_file_size_bytes).await?;

    let catalog = Catalog::load(&state.config.catalog_path)?;
    let bundle =
        brandmail_pipeline::generate(&catalog, &request, &uploads, &state.config.work_dir).await?;

    tracing::info!(
        size_bytes = bundle.data.len(),
        filename = %bundle.filename,
        "Generated email bundle"
    );

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/zip")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", bundle.filename),
        )
        .body(Body::from(bundle.data))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}

/// Walk the multipart stream, spooling file parts in received order and
/// parsing the JSON copy payload. Unknown parts are skipped with a warning.
async fn spool_uploads(
    mut multipart: Multipart,
    spool: &Path,
    max_file_size: usize,
) -> Result<(GenerateRequest, UploadSet), HttpAppError> {
    let mut request: Option<GenerateRequest> = None;
    let mut uploads = UploadSet::default();
    let mut index = 0usize;

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            tracing::warn!("Skipping unnamed multipart field");
            continue;
        };

        match name.as_str() {
            REQUEST_FIELD => {
                let raw = field.text().await?;
                request = Some(serde_json::from_str(&raw).map_err(|e| {
                    AppError::InvalidInput(format!("Invalid request JSON: {}", e))
                })?);
            }
            SERVICE_HEADER_FIELD | TIRE_HEADER_FIELD | COUPON_FIELD => {
                index += 1;
                let file = spool_file(field, spool, index, max_file_size).await?;
                match name.as_str() {
                    SERVICE_HEADER_FIELD => uploads.service_header = Some(file),
                    TIRE_HEADER_FIELD => uploads.tire_header = Some(file),
                    _ => uploads.coupons.push(file),
                }
            }
            other => {
                tracing::warn!(field = other, "Skipping unknown multipart field");
            }
        }
    }

    let request = request.ok_or_else(|| {
        AppError::InvalidInput(format!("Missing required '{}' part", REQUEST_FIELD))
    })?;

    Ok((request, uploads))
}

/// Accept a declared JPEG media type, or a .jpg/.jpeg filename when the
/// client sent no media type at all.
fn is_jpeg_upload(filename: &str, content_type: Option<&str>) -> bool {
    match content_type {
        Some(ct) => ct.eq_ignore_ascii_case("image/jpeg") || ct.eq_ignore_ascii_case("image/jpg"),
        None => {
            let lower = filename.to_lowercase();
            lower.ends_with(".jpg") || lower.ends_with(".jpeg")
        }
    }
}

async fn spool_file(
    field: Field<'_>,
    spool: &Path,
    index: usize,
    max_file_size: usize,
) -> Result<UploadedFile, HttpAppError> {
    let part = field.name().unwrap_or("file").to_string();
    let original = field.file_name().unwrap_or_default().to_string();
    if original.is_empty() {
        return Err(
            AppError::InvalidInput(format!("File part '{}' has no filename", part)).into(),
        );
    }

    let content_type = field.content_type().map(str::to_string);
    if !is_jpeg_upload(&original, content_type.as_deref()) {
        return Err(
            AppError::InvalidInput(format!("File '{}' must be a JPEG image", original)).into(),
        );
    }

    let data = field.bytes().await?;
    if data.len() > max_file_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File '{}' is {} bytes, limit is {} bytes",
            original,
            data.len(),
            max_file_size
        ))
        .into());
    }

    // Index-prefixed spool names: identically named uploads never clobber each other
    let spooled = spool.join(format!("{:03}.jpg", index));
    fs::write(&spooled, &data).await.map_err(|e| {
        AppError::Internal(format!("Failed to spool upload '{}': {}", original, e))
    })?;

    tracing::debug!(
        part = %part,
        filename = %original,
        size_bytes = data.len(),
        "Spooled uploaded file"
    );

    Ok(UploadedFile::new(
        original,
        spooled,
        content_type.unwrap_or_else(|| "image/jpeg".to_string()),
    ))
}
