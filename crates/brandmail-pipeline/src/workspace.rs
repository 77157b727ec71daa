//! Per-brand workspace assembly
//!
//! Each brand gets a fresh, uniquely named directory under the configured
//! work dir with an `images/` subdirectory. Assets are copied in with
//! archive-relative names so the rendered document stays self-contained
//! once the directory is zipped. Uniqueness comes from a random uuid
//! suffix, so an earlier failed request can never cause directory reuse.

use crate::dimensions::display_dimensions;
use crate::matcher::MatchedCoupon;
use brandmail_core::{AppError, BrandCategory};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

const IMAGES_DIR: &str = "images";
const DOCUMENT_NAME: &str = "index.html";

/// A coupon staged into a workspace, with the workspace-relative path and
/// the display dimensions the markup will carry.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedCoupon {
    pub id: String,
    pub rel_path: String,
    pub width: u32,
    pub height: u32,
}

/// Isolated temporary directory holding one brand's assets and rendered
/// document before packaging.
#[derive(Debug)]
pub struct BrandWorkspace {
    root: PathBuf,
    category: BrandCategory,
    brand_id: String,
    staged_names: HashSet<String>,
}

/// Strip path components from an uploaded filename; fall back when nothing
/// usable remains.
fn sanitize_filename(filename: &str, fallback: &str) -> String {
    Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .unwrap_or(fallback)
        .to_string()
}

impl BrandWorkspace {
    /// Create the workspace directory and its `images/` subdirectory.
    pub async fn create(
        work_dir: &Path,
        category: BrandCategory,
        brand_id: &str,
    ) -> Result<Self, AppError> {
        let root = work_dir.join(format!("{}-{}-{}", category, brand_id, Uuid::new_v4()));
        fs::create_dir_all(root.join(IMAGES_DIR)).await.map_err(|e| {
            AppError::Internal(format!(
                "Failed to create workspace {}: {}",
                root.display(),
                e
            ))
        })?;

        tracing::debug!(
            workspace = %root.display(),
            category = %category,
            brand_id = %brand_id,
            "Created brand workspace"
        );

        Ok(Self {
            root,
            category,
            brand_id: brand_id.to_string(),
            staged_names: HashSet::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn category(&self) -> BrandCategory {
        self.category
    }

    pub fn brand_id(&self) -> &str {
        &self.brand_id
    }

    /// Copy the brand logo in as `images/logo.jpg`. Mandatory: an
    /// unreadable source fails the whole request.
    pub async fn stage_logo(&mut self, src: &Path) -> Result<String, AppError> {
        self.stage_mandatory(src, "logo.jpg", "logo").await
    }

    /// Copy the category header image in as `images/header.jpg`. Mandatory.
    pub async fn stage_header(&mut self, src: &Path) -> Result<String, AppError> {
        self.stage_mandatory(src, "header.jpg", "header image").await
    }

    /// Copy the optional footer graphic in as `images/footer.jpg`. Only
    /// called when the brand has one configured; a configured path that
    /// cannot be read is still fatal.
    pub async fn stage_footer_graphic(&mut self, src: &Path) -> Result<String, AppError> {
        self.stage_mandatory(src, "footer.jpg", "footer graphic").await
    }

    async fn stage_mandatory(
        &mut self,
        src: &Path,
        name: &str,
        what: &str,
    ) -> Result<String, AppError> {
        let dest = self.root.join(IMAGES_DIR).join(name);
        fs::copy(src, &dest).await.map_err(|e| {
            AppError::AssetMissing(format!(
                "{} for brand '{}' unreadable at {}: {}",
                what,
                self.brand_id,
                src.display(),
                e
            ))
        })?;
        self.staged_names.insert(name.to_string());
        Ok(rel_image_path(name))
    }

    /// Copy a matched coupon into `images/`, keeping the original filename
    /// (de-duplicated within the workspace) and computing the display
    /// dimensions from the staged copy. An undecodable image propagates as
    /// a fatal error.
    pub async fn stage_coupon(&mut self, coupon: &MatchedCoupon) -> Result<ResolvedCoupon, AppError> {
        let fallback = format!("coupon_{}.jpg", coupon.id);
        let base = sanitize_filename(&coupon.file.original_filename, &fallback);
        let name = self.unique_name(base);

        let dest = self.root.join(IMAGES_DIR).join(&name);
        fs::copy(&coupon.file.path, &dest).await.map_err(|e| {
            AppError::Internal(format!(
                "Failed to copy coupon '{}' into workspace: {}",
                coupon.id, e
            ))
        })?;
        self.staged_names.insert(name.clone());

        let dims = display_dimensions(&dest)?;

        Ok(ResolvedCoupon {
            id: coupon.id.clone(),
            rel_path: rel_image_path(&name),
            width: dims.width,
            height: dims.height,
        })
    }

    /// Write the rendered document at the workspace root.
    pub async fn write_document(&self, html: &str) -> Result<(), AppError> {
        let path = self.root.join(DOCUMENT_NAME);
        fs::write(&path, html).await.map_err(|e| {
            AppError::Internal(format!("Failed to write {}: {}", path.display(), e))
        })?;
        Ok(())
    }

    /// Archive prefix for this workspace: `{category}/{brand_id}`.
    pub fn archive_prefix(&self) -> String {
        format!("{}/{}", self.category, self.brand_id)
    }

    /// Pick a name unique within `images/`, suffixing on collision.
    fn unique_name(&self, base: String) -> String {
        if !self.staged_names.contains(&base) {
            return base;
        }
        let (stem, ext) = match base.rsplit_once('.') {
            Some((stem, ext)) => (stem.to_string(), format!(".{}", ext)),
            None => (base.clone(), String::new()),
        };
        let mut n = 1;
        loop {
            let candidate = format!("{}-{}{}", stem, n, ext);
            if !self.staged_names.contains(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Workspace-relative path for a staged image, always forward-slashed so
/// the archive stays portable.
fn rel_image_path(name: &str) -> String {
    format!("{}/{}", IMAGES_DIR, name)
}
