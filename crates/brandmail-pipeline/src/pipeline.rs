//! Generation pipeline orchestration
//!
//! Sequential loop over categories, then brands in catalog order. Brand
//! counts are small, so there is no per-brand parallelism; correctness of
//! the ordering and of the cleanup invariant is what matters here.

use crate::bundle::{pack_workspaces, remove_workspaces, BundleEntry};
use crate::matcher::match_coupons;
use crate::render::{render_email, substitute_brand, EmailData};
use crate::workspace::BrandWorkspace;
use brandmail_core::{
    AppError, Brand, BrandCategory, Catalog, CategoryCopy, GenerateRequest, UploadedFile,
};
use std::path::{Path, PathBuf};

pub const BUNDLE_FILENAME: &str = "emails.zip";

/// The files the upload boundary received for one request, in received
/// order (the coupon tie-break depends on that order being stable).
#[derive(Debug, Default, Clone)]
pub struct UploadSet {
    pub service_header: Option<UploadedFile>,
    pub tire_header: Option<UploadedFile>,
    pub coupons: Vec<UploadedFile>,
}

impl UploadSet {
    pub fn header_for(&self, category: BrandCategory) -> Option<&UploadedFile> {
        match category {
            BrandCategory::Service => self.service_header.as_ref(),
            BrandCategory::Tire => self.tire_header.as_ref(),
        }
    }
}

/// The finished archive plus its suggested download filename.
#[derive(Debug, Clone)]
pub struct Bundle {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Run the whole pipeline: build one workspace per catalog brand, render
/// each document, pack everything into one archive, and remove every
/// workspace that was created, whether or not packaging succeeded.
pub async fn generate(
    catalog: &Catalog,
    request: &GenerateRequest,
    uploads: &UploadSet,
    work_dir: &Path,
) -> Result<Bundle, AppError> {
    let mut created_roots: Vec<PathBuf> = Vec::new();

    let result = build_and_pack(catalog, request, uploads, work_dir, &mut created_roots).await;

    // Cleanup runs on every path; failures inside are diagnostics only.
    remove_workspaces(&created_roots).await;

    let data = result?;
    Ok(Bundle {
        filename: BUNDLE_FILENAME.to_string(),
        data,
    })
}

async fn build_and_pack(
    catalog: &Catalog,
    request: &GenerateRequest,
    uploads: &UploadSet,
    work_dir: &Path,
    created_roots: &mut Vec<PathBuf>,
) -> Result<Vec<u8>, AppError> {
    let mut entries: Vec<BundleEntry> = Vec::new();

    for category in BrandCategory::ALL {
        let brands = catalog.brands(category);
        let copy = request.copy_for(category);

        warn_on_unknown_display_names(catalog, category, copy);

        if brands.is_empty() {
            continue;
        }

        let header = uploads.header_for(category).ok_or_else(|| {
            AppError::AssetMissing(format!("No header image uploaded for category '{}'", category))
        })?;

        for brand in brands {
            let workspace =
                build_brand_workspace(category, brand, copy, header, uploads, work_dir, created_roots)
                    .await?;
            entries.push(BundleEntry {
                archive_prefix: workspace.archive_prefix(),
                root: workspace.root().to_path_buf(),
            });
        }
    }

    pack_workspaces(&entries).await
}

/// A coupon assignment keyed by a display name the catalog does not know is
/// a configuration mismatch: diagnostic, skip, keep going.
fn warn_on_unknown_display_names(catalog: &Catalog, category: BrandCategory, copy: &CategoryCopy) {
    for display_name in copy.coupons.keys() {
        if catalog.find_internal_id(category, display_name).is_none() {
            tracing::warn!(
                category = %category,
                display_name = %display_name,
                "Coupon assignment references a brand not in the catalog, skipping"
            );
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn build_brand_workspace(
    category: BrandCategory,
    brand: &Brand,
    copy: &CategoryCopy,
    header: &UploadedFile,
    uploads: &UploadSet,
    work_dir: &Path,
    created_roots: &mut Vec<PathBuf>,
) -> Result<BrandWorkspace, AppError> {
    let coupon_ids = copy.coupon_ids(&brand.name);
    let matched = match_coupons(&coupon_ids, &uploads.coupons);

    let mut workspace = BrandWorkspace::create(work_dir, category, &brand.id).await?;
    // Track the root before staging so a mid-build failure still gets cleaned up
    created_roots.push(workspace.root().to_path_buf());

    let logo_path = workspace.stage_logo(&brand.logo_url).await?;
    let header_path = workspace.stage_header(&header.path).await?;
    let footer_graphic_path = match &brand.footer_graphic_url {
        Some(src) => Some(workspace.stage_footer_graphic(src).await?),
        None => None,
    };

    let mut coupons = Vec::with_capacity(matched.len());
    for coupon in &matched {
        coupons.push(workspace.stage_coupon(coupon).await?);
    }

    let data = EmailData {
        title: substitute_brand(&copy.title, &brand.name),
        body_copy: substitute_brand(&copy.body_copy, &brand.name),
        brand_name: brand.name.clone(),
        colors: brand.colors.clone(),
        phone: brand.phone.clone(),
        header_links: brand.header_links.clone(),
        footer_links: brand.footer_links.clone(),
        logo_path,
        header_path,
        footer_graphic_path,
        coupons,
        notification: brand.notification.clone(),
        disclaimer: brand.disclaimer.clone(),
    };

    let html = render_email(&data)?;
    workspace.write_document(&html).await?;

    tracing::info!(
        category = %category,
        brand_id = %brand.id,
        coupons = data.coupons.len(),
        "Built brand workspace"
    );

    Ok(workspace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::path::Path;

    fn write_test_jpeg(path: &Path, width: u32, height: u32) {
        let img = RgbImage::from_pixel(width, height, Rgb([90, 90, 90]));
        img.save_with_format(path, ImageFormat::Jpeg).unwrap();
    }

    fn catalog_json(logo: &Path) -> String {
        format!(
            r##"{{
                "service": {{
                    "acme": {{
                        "name": "Acme",
                        "colors": {{ "primary": "#112233", "secondary": "#ffffff" }},
                        "logoURL": "{}"
                    }}
                }}
            }}"##,
            logo.display()
        )
    }

    fn leftover_workspaces(work_dir: &Path) -> Vec<String> {
        std::fs::read_dir(work_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.starts_with("service-") || n.starts_with("tire-"))
            .collect()
    }

    #[tokio::test]
    async fn test_generate_cleans_up_on_success() {
        let dir = tempfile::tempdir().unwrap();
        let logo = dir.path().join("logo.jpg");
        let header = dir.path().join("header.jpg");
        write_test_jpeg(&logo, 40, 40);
        write_test_jpeg(&header, 600, 200);

        let catalog = Catalog::from_json(&catalog_json(&logo)).unwrap();
        let uploads = UploadSet {
            service_header: Some(UploadedFile::new("header.jpg", &header, "image/jpeg")),
            ..Default::default()
        };

        let bundle = generate(&catalog, &GenerateRequest::default(), &uploads, dir.path())
            .await
            .unwrap();
        assert_eq!(bundle.filename, "emails.zip");
        assert!(!bundle.data.is_empty());
        assert!(leftover_workspaces(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_generate_cleans_up_on_fatal_error() {
        let dir = tempfile::tempdir().unwrap();
        let logo = dir.path().join("logo.jpg");
        let header = dir.path().join("header.jpg");
        let broken = dir.path().join("1_broken.jpg");
        write_test_jpeg(&logo, 40, 40);
        write_test_jpeg(&header, 600, 200);
        std::fs::write(&broken, b"not a jpeg").unwrap();

        let catalog = Catalog::from_json(&catalog_json(&logo)).unwrap();
        let mut request = GenerateRequest::default();
        request
            .service
            .coupons
            .insert("Acme".to_string(), "1".to_string());
        let uploads = UploadSet {
            service_header: Some(UploadedFile::new("header.jpg", &header, "image/jpeg")),
            coupons: vec![UploadedFile::new("1_broken.jpg", &broken, "image/jpeg")],
            ..Default::default()
        };

        let err = generate(&catalog, &request, &uploads, dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ImageProcessing(_)));
        assert!(leftover_workspaces(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_missing_header_for_populated_category_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let logo = dir.path().join("logo.jpg");
        write_test_jpeg(&logo, 40, 40);

        let catalog = Catalog::from_json(&catalog_json(&logo)).unwrap();
        let err = generate(
            &catalog,
            &GenerateRequest::default(),
            &UploadSet::default(),
            dir.path(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::AssetMissing(_)));
    }

    #[tokio::test]
    async fn test_unknown_display_name_does_not_abort() {
        let dir = tempfile::tempdir().unwrap();
        let logo = dir.path().join("logo.jpg");
        let header = dir.path().join("header.jpg");
        write_test_jpeg(&logo, 40, 40);
        write_test_jpeg(&header, 600, 200);

        let catalog = Catalog::from_json(&catalog_json(&logo)).unwrap();
        let mut request = GenerateRequest::default();
        request
            .service
            .coupons
            .insert("Ghost Brand".to_string(), "1,2".to_string());
        let uploads = UploadSet {
            service_header: Some(UploadedFile::new("header.jpg", &header, "image/jpeg")),
            ..Default::default()
        };

        let bundle = generate(&catalog, &request, &uploads, dir.path())
            .await
            .unwrap();
        assert!(!bundle.data.is_empty());
    }

    #[tokio::test]
    async fn test_empty_catalog_yields_empty_archive() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::from_json("{}").unwrap();

        let bundle = generate(
            &catalog,
            &GenerateRequest::default(),
            &UploadSet::default(),
            dir.path(),
        )
        .await
        .unwrap();

        let archive =
            zip::ZipArchive::new(std::io::Cursor::new(bundle.data)).unwrap();
        assert_eq!(archive.len(), 0);
    }
}
