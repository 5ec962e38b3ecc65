//! Detector Adapter
//!
//! Wraps the pretrained cotton detection model behind the `SpeciesDetector` trait.
//!
//! - `types`: detections, bounding boxes, per-image results
//! - `preprocessing` / `postprocessing`: YOLOv8 letterbox input and output decoding + NMS
//! - `tract_backend`: ONNX inference via tract
//! - `static_backend`: fixed results, used without a model file and in tests
//! - `overlay`: annotated image with one box per detection
//! - `staging`: scoped temp file for the upload, deleted on every path

pub mod types;
pub mod preprocessing;
pub mod postprocessing;
pub mod tract_backend;
pub mod static_backend;
pub mod overlay;
pub mod staging;

use image::DynamicImage;

pub use types::{BoundingBox, Detection, DetectionResult};
pub use tract_backend::TractDetector;
pub use static_backend::StaticDetector;
pub use staging::{run_staged, StagedDetection, StagedImage, UploadFormat};

/// Fallback class table when neither `CLASS_NAMES` nor the model metadata provides one.
pub const DEFAULT_CLASS_NAMES: [&str; 4] = ["G-arboreum", "G-barbadense", "G-herbaceum", "G-hirsutum"];

/// Why a detection run could not produce a result.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("unsupported upload: {0}")]
    UnsupportedFormat(String),

    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("could not stage upload: {0}")]
    Io(#[from] std::io::Error),

    #[error("model inference failed: {0}")]
    Inference(String),

    #[error("detection timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// Detection backend.
///
/// Implementations must treat the image as read-only and keep no copy after `detect`.
pub trait SpeciesDetector: Send + Sync {
    /// Backend identifier, for logs.
    fn name(&self) -> &'static str;

    /// Run detection on one decoded image.
    fn detect(&self, image: &DynamicImage) -> Result<DetectionResult, DetectionError>;
}
