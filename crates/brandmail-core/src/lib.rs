//! Brandmail Core Library
//!
//! This crate provides the domain models, catalog index, error types, and
//! configuration shared across all Brandmail components.

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use catalog::Catalog;
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    Brand, BrandCategory, BrandColors, CategoryCopy, GenerateRequest, Link, UploadedFile,
};
