use std::path::Path;

use anyhow::{Context, Result};
use image::DynamicImage;
use tract_onnx::prelude::*;

use super::postprocessing::decode_yolo_output;
use super::preprocessing::letterbox;
use super::types::DetectionResult;
use super::{DetectionError, SpeciesDetector, DEFAULT_CLASS_NAMES};

/// Metadata key Ultralytics exports use for the class table.
const NAMES_METADATA_KEY: &str = "names";

type DetectionPlan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Tract-based backend for a YOLOv8 detection model exported to ONNX.
///
/// The model is loaded once and shared read-only between requests.
pub struct TractDetector {
    model: DetectionPlan,
    input_size: u32,
    class_names: Vec<String>,
    confidence_threshold: f32,
    iou_threshold: f32,
}

impl TractDetector {
    /// Load an ONNX model from disk and prepare it for inference.
    ///
    /// Class names come from `class_names` when given, otherwise from the model's own
    /// `names` metadata, otherwise from `DEFAULT_CLASS_NAMES`.
    pub fn load<P: AsRef<Path>>(
        model_path: P,
        input_size: u32,
        class_names: Option<Vec<String>>,
    ) -> Result<Self> {
        let model_path = model_path.as_ref();
        let size = input_size as usize;
        let onnx = tract_onnx::onnx();

        let proto = onnx
            .proto_model_for_path(model_path)
            .with_context(|| format!("failed to read ONNX model from {}", model_path.display()))?;
        let embedded = proto
            .metadata_props
            .iter()
            .find(|entry| entry.key == NAMES_METADATA_KEY)
            .map(|entry| entry.value.as_str());
        let class_names = select_class_names(class_names, embedded);

        let model = onnx
            .model_for_path(model_path)
            .with_context(|| format!("failed to load ONNX model from {}", model_path.display()))?
            .with_input_fact(0, InferenceFact::dt_shape(f32::datum_type(), tvec!(1, 3, size, size)))
            .context("failed to set input fact")?
            .into_optimized()
            .context("failed to optimize ONNX model")?
            .into_runnable()
            .context("failed to build runnable ONNX model")?;

        tracing::info!(
            "Loaded detection model {} ({}px input, {} classes)",
            model_path.display(),
            input_size,
            class_names.len()
        );

        Ok(Self {
            model,
            input_size,
            class_names,
            confidence_threshold: 0.25,
            iou_threshold: 0.45,
        })
    }

    /// Override the default confidence and IoU thresholds.
    pub fn with_thresholds(mut self, confidence: f32, iou: f32) -> Self {
        self.confidence_threshold = confidence;
        self.iou_threshold = iou;
        self
    }

    pub fn class_names(&self) -> &[String] {
        &self.class_names
    }
}

/// Parse an Ultralytics class table, e.g. `{0: 'G-arboreum', 1: 'G-barbadense'}`.
///
/// Indices must cover `0..n` exactly once; anything else is rejected.
pub fn parse_names_metadata(value: &str) -> Option<Vec<String>> {
    let body = value.trim().strip_prefix('{')?.strip_suffix('}')?;

    let mut entries: Vec<(usize, String)> = Vec::new();
    for entry in body.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (index, name) = entry.split_once(':')?;
        let index: usize = index.trim().parse().ok()?;
        let name = name.trim().trim_matches(|c: char| c == '\'' || c == '"').trim();
        if name.is_empty() {
            return None;
        }
        entries.push((index, name.to_string()));
    }

    entries.sort_by_key(|(index, _)| *index);
    let contiguous = entries.iter().enumerate().all(|(i, (index, _))| i == *index);
    if entries.is_empty() || !contiguous {
        return None;
    }

    Some(entries.into_iter().map(|(_, name)| name).collect())
}

fn select_class_names(configured: Option<Vec<String>>, embedded: Option<&str>) -> Vec<String> {
    if let Some(names) = configured {
        tracing::info!("Using configured class names: {}", names.join(", "));
        return names;
    }

    match embedded.map(|raw| (raw, parse_names_metadata(raw))) {
        Some((_, Some(names))) => {
            tracing::info!("Using class names from model metadata: {}", names.join(", "));
            names
        }
        Some((raw, None)) => {
            tracing::warn!("Unreadable class names in model metadata ({}); using defaults", raw);
            default_class_names()
        }
        None => {
            tracing::warn!("Model has no class names metadata and CLASS_NAMES is unset; using defaults");
            default_class_names()
        }
    }
}

fn default_class_names() -> Vec<String> {
    DEFAULT_CLASS_NAMES.iter().map(|s| s.to_string()).collect()
}

impl SpeciesDetector for TractDetector {
    fn name(&self) -> &'static str {
        "tract"
    }

    fn detect(&self, image: &DynamicImage) -> Result<DetectionResult, DetectionError> {
        let (tensor, transform) = letterbox(image, self.input_size);

        let outputs = self
            .model
            .run(tvec!(tensor.into()))
            .map_err(|e| DetectionError::Inference(format!("ONNX inference failed: {e}")))?;

        let output = outputs
            .first()
            .ok_or_else(|| DetectionError::Inference("model produced no outputs".to_string()))?;
        let view = output
            .to_array_view::<f32>()
            .map_err(|e| DetectionError::Inference(format!("model output was not f32: {e}")))?;

        let detections = decode_yolo_output(
            view,
            &self.class_names,
            &transform,
            self.confidence_threshold,
            self.iou_threshold,
        )?;

        Ok(DetectionResult::new(detections))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ultralytics_names() {
        let names = parse_names_metadata(
            "{0: 'G-arboreum', 1: 'G-barbadense', 2: 'G-herbaceum', 3: 'G-hirsutum'}",
        )
        .unwrap();
        assert_eq!(names, DEFAULT_CLASS_NAMES);
    }

    #[test]
    fn test_parse_names_follows_indices_not_position() {
        let names = parse_names_metadata("{1: \"G-hirsutum\", 0: \"G-barbadense\"}").unwrap();
        assert_eq!(names, vec!["G-barbadense", "G-hirsutum"]);
    }

    #[test]
    fn test_parse_names_rejects_malformed_tables() {
        assert!(parse_names_metadata("").is_none());
        assert!(parse_names_metadata("{}").is_none());
        assert!(parse_names_metadata("['a', 'b']").is_none());
        assert!(parse_names_metadata("{0: 'a', 2: 'b'}").is_none());
        assert!(parse_names_metadata("{zero: 'a'}").is_none());
    }

    #[test]
    fn test_configured_names_override_metadata() {
        let configured = Some(vec!["G-hirsutum".to_string()]);
        let names = select_class_names(configured, Some("{0: 'G-arboreum'}"));
        assert_eq!(names, vec!["G-hirsutum"]);
    }

    #[test]
    fn test_metadata_names_used_when_not_configured() {
        let names = select_class_names(None, Some("{0: 'G-hirsutum', 1: 'G-arboreum'}"));
        assert_eq!(names, vec!["G-hirsutum", "G-arboreum"]);
    }

    #[test]
    fn test_defaults_when_metadata_missing_or_unreadable() {
        assert_eq!(select_class_names(None, None), DEFAULT_CLASS_NAMES);
        assert_eq!(select_class_names(None, Some("garbage")), DEFAULT_CLASS_NAMES);
    }
}
