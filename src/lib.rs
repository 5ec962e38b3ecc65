//! Cotton Species Guide
//!
//! Upload a photo of a cotton plant, detect the species with a YOLO model and show
//! farmer-facing guidance for it.
//!
//! - `catalog/`: static species profiles, crop calendars and cotton facts
//! - `detector/`: upload staging, ONNX inference (tract) and box overlay
//! - `resolution`: detections to a single displayed outcome
//! - `web/`: view models, the per-upload pipeline and page handlers
//! - `api_server`: Axum state and router (feature `api`)

pub mod catalog;
pub mod config;
pub mod detector;
pub mod resolution;
pub mod web;

#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use catalog::{crop_calendar, random_fact, species_profile, SpeciesCode};
pub use config::{AppConfig, ConfigError};
pub use detector::{DetectionError, DetectionResult, SpeciesDetector, StaticDetector, TractDetector};
pub use resolution::{resolve, resolve_labels, ResolvedOutcome};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
