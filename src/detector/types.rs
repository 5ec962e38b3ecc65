//! Detection data types shared by every backend.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

/// Axis-aligned box in original image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub fn area(&self) -> f32 {
        (self.x2 - self.x1).max(0.0) * (self.y2 - self.y1).max(0.0)
    }

    pub fn intersection_area(&self, other: &BoundingBox) -> f32 {
        let x1 = self.x1.max(other.x1);
        let y1 = self.y1.max(other.y1);
        let x2 = self.x2.min(other.x2);
        let y2 = self.y2.min(other.y2);

        if x2 > x1 && y2 > y1 {
            (x2 - x1) * (y2 - y1)
        } else {
            0.0
        }
    }

    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let intersection = self.intersection_area(other);
        let union = self.area() + other.area() - intersection;

        if union > 0.0 {
            intersection / union
        } else {
            0.0
        }
    }
}

/// One model output: a labelled region with a confidence score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub class_id: u32,
    pub label: String,
    pub confidence: f32,
    pub bbox: BoundingBox,
}

/// All detections for one uploaded image.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DetectionResult {
    pub detections: Vec<Detection>,
}

impl DetectionResult {
    pub fn new(detections: Vec<Detection>) -> Self {
        Self { detections }
    }

    /// Label-only result (no geometry, no confidences).
    ///
    /// Every label gets the same confidence, so ranking falls back to label order.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let detections = labels
            .into_iter()
            .map(|label| Detection {
                class_id: 0,
                label: label.as_ref().to_string(),
                confidence: 1.0,
                bbox: BoundingBox { x1: 0.0, y1: 0.0, x2: 0.0, y2: 0.0 },
            })
            .collect();
        Self { detections }
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    /// Deduplicated labels, best confidence first; ties broken by label.
    pub fn labels(&self) -> Vec<&str> {
        let mut best: BTreeMap<&str, f32> = BTreeMap::new();
        for detection in &self.detections {
            let entry = best.entry(detection.label.as_str()).or_insert(f32::NEG_INFINITY);
            if detection.confidence > *entry {
                *entry = detection.confidence;
            }
        }

        let mut ranked: Vec<(&str, f32)> = best.into_iter().collect();
        ranked.sort_by(|(label_a, conf_a), (label_b, conf_b)| {
            conf_b
                .partial_cmp(conf_a)
                .unwrap_or(Ordering::Equal)
                .then_with(|| label_a.cmp(label_b))
        });
        ranked.into_iter().map(|(label, _)| label).collect()
    }

    /// The single species shown on the page, if anything was detected.
    pub fn primary_species(&self) -> Option<&str> {
        self.labels().into_iter().next()
    }
}
