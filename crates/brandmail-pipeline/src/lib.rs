//! Brandmail generation pipeline
//!
//! Turns a catalog snapshot, a typed generation request, and the uploaded
//! images into one downloadable archive of per-brand email bundles. The
//! stages, in data-flow order: coupon matching, per-brand workspace
//! assembly, image dimension extraction, document rendering, and archive
//! packaging with guaranteed workspace cleanup.

pub mod bundle;
pub mod dimensions;
pub mod matcher;
pub mod pipeline;
pub mod render;
pub mod workspace;

pub use bundle::{pack_workspaces, remove_workspaces, BundleEntry};
pub use dimensions::{display_dimensions, DisplayDimensions};
pub use matcher::{match_coupons, MatchedCoupon};
pub use pipeline::{generate, Bundle, UploadSet};
pub use render::{render_email, substitute_brand, EmailData};
pub use workspace::{BrandWorkspace, ResolvedCoupon};
