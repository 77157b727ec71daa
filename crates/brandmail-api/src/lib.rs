//! Brandmail API
//!
//! HTTP surface for the email bundle generator: a brand listing endpoint
//! and the multipart generation endpoint that turns uploaded images plus
//! free-text copy into a downloadable zip of per-brand emails.

pub mod api_doc;
pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;
pub mod telemetry;
