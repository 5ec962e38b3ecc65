//! Upload staging and the detection run.
//!
//! The upload is written to a `NamedTempFile`, decoded from that path and handed to the
//! detector. The temp file is removed when `run_staged` returns, whatever the outcome.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use image::{DynamicImage, ImageFormat};
use tempfile::NamedTempFile;

use super::types::DetectionResult;
use super::{DetectionError, SpeciesDetector};

/// Accepted upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    Jpeg,
    Png,
}

impl UploadFormat {
    /// Format from a file name extension (`jpg`, `jpeg`, `png`, any case).
    pub fn from_filename(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(UploadFormat::Jpeg),
            "png" => Some(UploadFormat::Png),
            _ => None,
        }
    }

    /// Check the declared name against the file's magic bytes.
    pub fn validate(file_name: Option<&str>, bytes: &[u8]) -> Result<Self, DetectionError> {
        let sniffed = match image::guess_format(bytes) {
            Ok(ImageFormat::Jpeg) => UploadFormat::Jpeg,
            Ok(ImageFormat::Png) => UploadFormat::Png,
            Ok(other) => {
                return Err(DetectionError::UnsupportedFormat(format!("{:?} images are not accepted", other)))
            }
            Err(_) => return Err(DetectionError::UnsupportedFormat("not a JPEG or PNG image".to_string())),
        };

        if let Some(name) = file_name.filter(|n| !n.is_empty()) {
            match UploadFormat::from_filename(name) {
                Some(declared) if declared == sniffed => {}
                Some(_) => {
                    return Err(DetectionError::UnsupportedFormat(format!(
                        "{} does not match its contents",
                        name
                    )))
                }
                None => {
                    return Err(DetectionError::UnsupportedFormat(format!(
                        "{}: only jpg, jpeg and png are accepted",
                        name
                    )))
                }
            }
        }

        Ok(sniffed)
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            UploadFormat::Jpeg => ".jpg",
            UploadFormat::Png => ".png",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            UploadFormat::Jpeg => "image/jpeg",
            UploadFormat::Png => "image/png",
        }
    }

    fn image_format(&self) -> ImageFormat {
        match self {
            UploadFormat::Jpeg => ImageFormat::Jpeg,
            UploadFormat::Png => ImageFormat::Png,
        }
    }
}

/// Upload bytes held in a temp file for the lifetime of one detection run.
pub struct StagedImage {
    file: NamedTempFile,
    format: UploadFormat,
}

impl StagedImage {
    pub fn stage(bytes: &[u8], format: UploadFormat) -> Result<Self, DetectionError> {
        let mut file = tempfile::Builder::new()
            .prefix("cotton-upload-")
            .suffix(format.suffix())
            .tempfile()?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(Self { file, format })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn format(&self) -> UploadFormat {
        self.format
    }
}

/// Decoded upload plus what the detector found in it.
pub struct StagedDetection {
    pub image: DynamicImage,
    pub result: DetectionResult,
}

fn decode_staged(path: &Path, format: UploadFormat) -> Result<DynamicImage, DetectionError> {
    let bytes = std::fs::read(path)?;
    Ok(image::load_from_memory_with_format(&bytes, format.image_format())?)
}

/// Decode the staged upload and run the detector under a deadline.
///
/// Inference is CPU-bound, so it runs on the blocking pool. The staged file is dropped
/// (and deleted) before this returns, on success, failure and timeout alike.
pub async fn run_staged(
    detector: Arc<dyn SpeciesDetector>,
    staged: StagedImage,
    timeout: Duration,
) -> Result<StagedDetection, DetectionError> {
    let start = Instant::now();
    let path = staged.path().to_path_buf();
    let format = staged.format();
    let backend = detector.name();

    let work = tokio::task::spawn_blocking(move || -> Result<StagedDetection, DetectionError> {
        let image = decode_staged(&path, format)?;
        let result = detector.detect(&image)?;
        Ok(StagedDetection { image, result })
    });

    let outcome = tokio::time::timeout(timeout, work).await;
    drop(staged);

    let detection = match outcome {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(DetectionError::Inference(format!("detection task failed: {join_error}"))),
        Err(_) => Err(DetectionError::Timeout(timeout)),
    };

    match &detection {
        Ok(found) => tracing::info!(
            "{} detector found {} object(s) [{}] in {:?}",
            backend,
            found.result.detections.len(),
            found.result.labels().join(", "),
            start.elapsed()
        ),
        Err(e) => tracing::warn!("{} detector failed after {:?}: {}", backend, start.elapsed(), e),
    }

    detection
}
