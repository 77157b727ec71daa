//! Uploaded file model

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One file received by the upload boundary: the original filename as sent
/// by the client (which carries the coupon identifier as a leading token),
/// the temporary spool path on disk, and the declared media type.
///
/// Input-only to the pipeline; the upload boundary is responsible for
/// rejecting anything that is not a JPEG before it gets here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFile {
    pub original_filename: String,
    pub path: PathBuf,
    pub content_type: String,
}

impl UploadedFile {
    pub fn new(
        original_filename: impl Into<String>,
        path: impl Into<PathBuf>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            original_filename: original_filename.into(),
            path: path.into(),
            content_type: content_type.into(),
        }
    }

    pub fn is_jpeg(&self) -> bool {
        self.content_type.eq_ignore_ascii_case("image/jpeg")
    }
}
