use image::DynamicImage;

use super::types::{BoundingBox, Detection, DetectionResult};
use super::{DetectionError, SpeciesDetector};

/// Backend that returns a fixed answer for every image.
///
/// Used when no model file is configured, and by tests that need a predictable detector.
#[derive(Debug, Clone, Default)]
pub struct StaticDetector {
    detections: Vec<Detection>,
    failure: Option<String>,
}

impl StaticDetector {
    /// Detects nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Detects each label once, full-frame, with the given confidence.
    pub fn with_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = (S, f32)>,
        S: Into<String>,
    {
        let detections = labels
            .into_iter()
            .enumerate()
            .map(|(i, (label, confidence))| Detection {
                class_id: i as u32,
                label: label.into(),
                confidence,
                bbox: BoundingBox { x1: 0.0, y1: 0.0, x2: 0.0, y2: 0.0 },
            })
            .collect();
        Self { detections, failure: None }
    }

    /// Fails every detection with an inference error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self { detections: Vec::new(), failure: Some(message.into()) }
    }
}

impl SpeciesDetector for StaticDetector {
    fn name(&self) -> &'static str {
        "static"
    }

    fn detect(&self, image: &DynamicImage) -> Result<DetectionResult, DetectionError> {
        if let Some(message) = &self.failure {
            return Err(DetectionError::Inference(message.clone()));
        }

        // Zero-size boxes become full-frame boxes so the overlay has something to draw
        let (w, h) = (image.width() as f32, image.height() as f32);
        let detections = self
            .detections
            .iter()
            .cloned()
            .map(|mut d| {
                if d.bbox.area() == 0.0 {
                    d.bbox = BoundingBox { x1: 0.0, y1: 0.0, x2: w, y2: h };
                }
                d
            })
            .collect();

        Ok(DetectionResult::new(detections))
    }
}
