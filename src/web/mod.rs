//! Presentation Layer
//!
//! - `view_models`: the `ContentCard` variants and the page view
//! - `pipeline`: one upload from bytes to `PageView`
//! - `images`: inline data URIs and the startup background image
//! - `handlers`: Askama page handlers (api feature)

pub mod view_models;
pub mod pipeline;
pub mod images;

#[cfg(feature = "api")]
pub mod handlers;

pub use pipeline::{process_upload, Upload};
pub use view_models::{ContentCard, PageView};
