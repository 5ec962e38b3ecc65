use std::cmp::Ordering;
use std::collections::HashMap;

use tract_onnx::prelude::tract_ndarray::ArrayViewD;

use super::preprocessing::Letterbox;
use super::types::{BoundingBox, Detection};
use super::DetectionError;

/// Per-class non-maximum suppression. Output is sorted by confidence, descending.
pub fn nms(detections: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
    if detections.is_empty() {
        return detections;
    }

    let mut class_groups: HashMap<u32, Vec<Detection>> = HashMap::new();
    for detection in detections {
        class_groups
            .entry(detection.class_id)
            .or_default()
            .push(detection);
    }

    let mut kept = Vec::new();

    for (_, mut class_detections) in class_groups {
        class_detections.sort_by(|a, b| {
            b.confidence.partial_cmp(&a.confidence).unwrap_or(Ordering::Equal)
        });

        let mut suppressed = vec![false; class_detections.len()];

        for i in 0..class_detections.len() {
            if suppressed[i] {
                continue;
            }

            for j in (i + 1)..class_detections.len() {
                if !suppressed[j]
                    && class_detections[i].bbox.iou(&class_detections[j].bbox) > iou_threshold
                {
                    suppressed[j] = true;
                }
            }

            kept.push(class_detections[i].clone());
        }
    }

    kept.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.label.cmp(&b.label))
    });
    kept
}

/// Which axis carries the `4 + classes` box attributes.
///
/// Exports disagree on axis order. The configured class count decides; only when neither
/// axis matches does the shorter axis count as the attribute axis.
fn attributes_on_last_axis(axis1: usize, axis2: usize, num_classes: usize) -> bool {
    let expected = 4 + num_classes;
    match (axis1 == expected, axis2 == expected) {
        (true, _) => false,
        (false, true) => true,
        (false, false) => {
            tracing::warn!(
                "output shape [1, {}, {}] matches neither layout for {} classes; guessing from axis sizes",
                axis1,
                axis2,
                num_classes
            );
            axis1 > axis2
        }
    }
}

/// Decode a YOLOv8 head, `[1, 4 + classes, boxes]` (or its transpose).
///
/// Rows are `cx, cy, w, h` in model space followed by one score per class.
pub fn decode_yolo_output(
    output: ArrayViewD<'_, f32>,
    class_names: &[String],
    letterbox: &Letterbox,
    confidence_threshold: f32,
    iou_threshold: f32,
) -> Result<Vec<Detection>, DetectionError> {
    let shape = output.shape();
    if shape.len() != 3 || shape[0] != 1 {
        return Err(DetectionError::Inference(format!(
            "expected [1, 4 + classes, boxes] output, got {:?}",
            shape
        )));
    }

    let transposed = attributes_on_last_axis(shape[1], shape[2], class_names.len());
    let (num_attrs, num_boxes) = if transposed {
        (shape[2], shape[1])
    } else {
        (shape[1], shape[2])
    };

    if num_attrs < 5 {
        return Err(DetectionError::Inference(format!(
            "output has {} attributes per box, need at least 5",
            num_attrs
        )));
    }
    let num_classes = num_attrs - 4;
    if num_classes != class_names.len() {
        tracing::warn!(
            "model reports {} classes but {} class names are configured",
            num_classes,
            class_names.len()
        );
    }

    let at = |attr: usize, i: usize| -> f32 {
        if transposed {
            output[[0, i, attr]]
        } else {
            output[[0, attr, i]]
        }
    };

    let mut detections = Vec::new();

    for i in 0..num_boxes {
        let mut best_class = 0usize;
        let mut best_score = f32::NEG_INFINITY;
        for class_idx in 0..num_classes {
            let score = at(4 + class_idx, i);
            if score > best_score {
                best_score = score;
                best_class = class_idx;
            }
        }

        if best_score.is_nan() || best_score <= confidence_threshold {
            continue;
        }

        let (cx, cy, w, h) = (at(0, i), at(1, i), at(2, i), at(3, i));
        let (x1, y1) = letterbox.unmap(cx - w / 2.0, cy - h / 2.0);
        let (x2, y2) = letterbox.unmap(cx + w / 2.0, cy + h / 2.0);

        let label = class_names
            .get(best_class)
            .cloned()
            .unwrap_or_else(|| format!("class_{}", best_class));

        detections.push(Detection {
            class_id: best_class as u32,
            label,
            confidence: best_score,
            bbox: BoundingBox { x1, y1, x2, y2 },
        });
    }

    Ok(nms(detections, iou_threshold))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::preprocessing::letterbox;
    use image::{DynamicImage, RgbImage};
    use tract_onnx::prelude::tract_ndarray::Array3;

    fn det(class_id: u32, confidence: f32, x1: f32) -> Detection {
        Detection {
            class_id,
            label: format!("c{}", class_id),
            confidence,
            bbox: BoundingBox { x1, y1: 0.0, x2: x1 + 10.0, y2: 10.0 },
        }
    }

    fn names() -> Vec<String> {
        vec!["G-arboreum".to_string(), "G-hirsutum".to_string()]
    }

    #[test]
    fn test_nms_suppresses_same_class_overlap() {
        let kept = nms(vec![det(0, 0.6, 1.0), det(0, 0.9, 0.0), det(0, 0.5, 50.0)], 0.45);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].confidence, 0.9);
        assert_eq!(kept[1].confidence, 0.5);
    }

    #[test]
    fn test_nms_keeps_overlapping_boxes_of_different_classes() {
        let kept = nms(vec![det(0, 0.9, 0.0), det(1, 0.8, 0.0)], 0.45);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_decode_thresholds_and_maps_boxes() {
        // 640x640 source, so the letterbox is the identity transform
        let img = DynamicImage::ImageRgb8(RgbImage::new(640, 640));
        let (_, lb) = letterbox(&img, 640);

        // [1, 6, 3]: 4 box attributes + 2 classes, 3 candidate boxes
        let mut out = Array3::<f32>::zeros((1, 6, 3));
        // Box 0: class 1 at 0.8
        out[[0, 0, 0]] = 100.0;
        out[[0, 1, 0]] = 100.0;
        out[[0, 2, 0]] = 40.0;
        out[[0, 3, 0]] = 20.0;
        out[[0, 5, 0]] = 0.8;
        // Box 1: below threshold
        out[[0, 4, 1]] = 0.1;
        // Box 2: class 0 at 0.6
        out[[0, 0, 2]] = 300.0;
        out[[0, 1, 2]] = 300.0;
        out[[0, 2, 2]] = 10.0;
        out[[0, 3, 2]] = 10.0;
        out[[0, 4, 2]] = 0.6;

        let out = out.into_dyn();
        let detections = decode_yolo_output(out.view(), &names(), &lb, 0.25, 0.45).unwrap();

        assert_eq!(detections.len(), 2);
        assert_eq!(detections[0].label, "G-hirsutum");
        assert_eq!(detections[0].bbox, BoundingBox { x1: 80.0, y1: 90.0, x2: 120.0, y2: 110.0 });
        assert_eq!(detections[1].label, "G-arboreum");
        assert_eq!(detections[1].class_id, 0);
    }

    #[test]
    fn test_decode_accepts_transposed_output() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(640, 640));
        let (_, lb) = letterbox(&img, 640);

        // [1, 8400, 6] layout
        let mut out = Array3::<f32>::zeros((1, 8400, 6));
        out[[0, 7, 0]] = 50.0;
        out[[0, 7, 1]] = 50.0;
        out[[0, 7, 2]] = 10.0;
        out[[0, 7, 3]] = 10.0;
        out[[0, 7, 4]] = 0.9;

        let out = out.into_dyn();
        let detections = decode_yolo_output(out.view(), &names(), &lb, 0.25, 0.45).unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].label, "G-arboreum");
    }

    #[test]
    fn test_decode_fewer_boxes_than_attributes_keeps_layout() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(640, 640));
        let (_, lb) = letterbox(&img, 640);

        // [1, 6, 2]: two boxes, so the box axis is the shorter one
        let mut out = Array3::<f32>::zeros((1, 6, 2));
        out[[0, 0, 1]] = 200.0;
        out[[0, 1, 1]] = 200.0;
        out[[0, 2, 1]] = 20.0;
        out[[0, 3, 1]] = 20.0;
        out[[0, 5, 1]] = 0.7;

        let out = out.into_dyn();
        let detections = decode_yolo_output(out.view(), &names(), &lb, 0.25, 0.45).unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].label, "G-hirsutum");
        assert_eq!(detections[0].bbox, BoundingBox { x1: 190.0, y1: 190.0, x2: 210.0, y2: 210.0 });
    }

    #[test]
    fn test_layout_follows_class_count() {
        assert!(!attributes_on_last_axis(6, 3, 2));
        assert!(attributes_on_last_axis(3, 6, 2));
        assert!(!attributes_on_last_axis(8, 8400, 4));
        assert!(attributes_on_last_axis(8400, 8, 4));
        // Neither axis matches: shorter axis holds the attributes
        assert!(attributes_on_last_axis(8400, 7, 4));
    }

    #[test]
    fn test_decode_rejects_unexpected_rank() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(64, 64));
        let (_, lb) = letterbox(&img, 64);
        let out = tract_onnx::prelude::tract_ndarray::Array2::<f32>::zeros((6, 3)).into_dyn();

        let err = decode_yolo_output(out.view(), &names(), &lb, 0.25, 0.45).unwrap_err();
        assert!(matches!(err, DetectionError::Inference(_)));
    }
}
