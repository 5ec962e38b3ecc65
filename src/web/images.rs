//! Inline `data:` URIs for images shown on the page.

use std::io::Cursor;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD as B64, Engine as _};
use image::{ImageFormat, RgbImage};

pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, B64.encode(bytes))
}

/// Encode an annotated frame as JPEG for display.
pub fn jpeg_data_uri(image: &RgbImage) -> Result<String, image::ImageError> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Jpeg)?;
    Ok(data_uri("image/jpeg", buf.get_ref()))
}

/// Read the page background once at startup.
///
/// A missing or unreadable file is cosmetic only: log it and fall back to plain styling.
pub fn load_background(path: &Path) -> Option<String> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Background image {} not loaded: {}", path.display(), e);
            return None;
        }
    };

    let mime = match image::guess_format(&bytes) {
        Ok(ImageFormat::Png) => "image/png",
        Ok(ImageFormat::Jpeg) => "image/jpeg",
        _ => {
            tracing::warn!("Background image {} is not a JPEG or PNG", path.display());
            return None;
        }
    };

    tracing::info!("Loaded background image {} ({} bytes)", path.display(), bytes.len());
    Some(data_uri(mime, &bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use std::io::Write;

    #[test]
    fn test_data_uri_format() {
        assert_eq!(data_uri("image/png", b"abc"), "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_jpeg_data_uri_decodes_back() {
        let img = RgbImage::from_pixel(8, 8, Rgb([0, 128, 0]));
        let uri = jpeg_data_uri(&img).unwrap();
        let payload = uri.strip_prefix("data:image/jpeg;base64,").unwrap();
        let bytes = B64.decode(payload).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_missing_background_is_none() {
        assert!(load_background(Path::new("/definitely/not/here.jpg")).is_none());
    }

    #[test]
    fn test_background_loads_png() {
        let img = RgbImage::from_pixel(2, 2, Rgb([255, 255, 255]));
        let mut bytes = Cursor::new(Vec::new());
        img.write_to(&mut bytes, ImageFormat::Png).unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(bytes.get_ref()).unwrap();

        let uri = load_background(file.path()).unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_non_image_background_is_none() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not an image").unwrap();
        assert!(load_background(file.path()).is_none());
    }
}
