//! Upload → detect → resolve → view, for one request.
//!
//! Nothing in here returns an error: every failure becomes a notice card.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;

use crate::detector::overlay::annotate;
use crate::detector::{run_staged, SpeciesDetector, StagedImage, UploadFormat};
use crate::resolution::resolve;

use super::images::{data_uri, jpeg_data_uri};
use super::view_models::{ImageView, PageView};

/// One uploaded file as received from the form.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

pub async fn process_upload<R: Rng + Send>(
    detector: Arc<dyn SpeciesDetector>,
    upload: Upload,
    timeout: Duration,
    rng: &mut R,
) -> PageView {
    let format = match UploadFormat::validate(upload.file_name.as_deref(), &upload.bytes) {
        Ok(format) => format,
        Err(e) => {
            tracing::info!("Rejected upload {:?}: {}", upload.file_name, e);
            return PageView::from_failure(&e);
        }
    };

    let uploaded = ImageView {
        caption: "📸 Uploaded Image",
        data_uri: data_uri(format.mime(), &upload.bytes),
    };

    let staged = match StagedImage::stage(&upload.bytes, format) {
        Ok(staged) => staged,
        Err(e) => {
            tracing::warn!("Could not stage upload: {}", e);
            return PageView::from_failure(&e);
        }
    };

    let found = match run_staged(detector, staged, timeout).await {
        Ok(found) => found,
        Err(e) => return PageView::from_failure(&e).with_images(Some(uploaded), None),
    };

    let annotated = match jpeg_data_uri(&annotate(&found.image, &found.result.detections)) {
        Ok(uri) => Some(ImageView { caption: "🔍 Detected Cotton Species", data_uri: uri }),
        Err(e) => {
            tracing::warn!("Could not encode annotated image: {}", e);
            None
        }
    };

    let outcome = resolve(&found.result);
    tracing::info!("Resolved upload to {:?}", outcome.label());

    PageView::from_outcome(&outcome, rng).with_images(Some(uploaded), annotated)
}
