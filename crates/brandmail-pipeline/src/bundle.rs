//! Bundle packaging
//!
//! Streams every brand workspace into one ZIP archive under
//! `{category}/{brand_id}/`, then removes the workspace directories. The
//! archive is finalized exactly once; removal failures are diagnostics and
//! never stop the remaining removals.

use brandmail_core::AppError;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tokio::fs;
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

/// One workspace queued for packaging.
#[derive(Debug, Clone)]
pub struct BundleEntry {
    /// Archive prefix, `{category}/{brand_id}`.
    pub archive_prefix: String,
    pub root: PathBuf,
}

/// Collect every file under `root` as forward-slashed relative paths,
/// sorted so the archive layout is deterministic across runs.
async fn collect_files(root: &Path) -> Result<Vec<String>, AppError> {
    let mut files = Vec::new();
    let mut dirs = vec![root.to_path_buf()];

    while let Some(dir) = dirs.pop() {
        let mut entries = fs::read_dir(&dir).await.map_err(|e| {
            AppError::Archive(format!("Failed to read {}: {}", dir.display(), e))
        })?;
        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            AppError::Archive(format!("Failed to read {}: {}", dir.display(), e))
        })? {
            let path = entry.path();
            if path.is_dir() {
                dirs.push(path);
            } else {
                let rel = path
                    .strip_prefix(root)
                    .map_err(|e| AppError::Archive(format!("Path outside workspace: {}", e)))?
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                files.push(rel);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Pack all workspaces into one ZIP buffer, in entry order.
pub async fn pack_workspaces(entries: &[BundleEntry]) -> Result<Vec<u8>, AppError> {
    let start = std::time::Instant::now();
    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644);

        for entry in entries {
            for rel in collect_files(&entry.root).await? {
                let data = fs::read(entry.root.join(&rel)).await.map_err(|e| {
                    AppError::Archive(format!(
                        "Failed to read {}/{}: {}",
                        entry.root.display(),
                        rel,
                        e
                    ))
                })?;

                let name = format!("{}/{}", entry.archive_prefix, rel);
                zip.start_file(&name, options)
                    .map_err(|e| AppError::Archive(format!("Failed to add {}: {}", name, e)))?;
                zip.write_all(&data)
                    .map_err(|e| AppError::Archive(format!("Failed to write {}: {}", name, e)))?;
            }
        }

        zip.finish()
            .map_err(|e| AppError::Archive(format!("Failed to finalize archive: {}", e)))?;
    }

    tracing::info!(
        workspaces = entries.len(),
        size_bytes = buffer.len(),
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Packed email bundle archive"
    );

    Ok(buffer)
}

/// Remove every workspace directory, best-effort. A failure on one
/// directory is logged and never prevents attempting the others.
pub async fn remove_workspaces(roots: &[PathBuf]) {
    for root in roots {
        match fs::remove_dir_all(root).await {
            Ok(()) => {
                tracing::debug!(workspace = %root.display(), "Removed brand workspace");
            }
            Err(e) => {
                tracing::warn!(
                    workspace = %root.display(),
                    error = %e,
                    "Failed to remove brand workspace"
                );
            }
        }
    }
}
