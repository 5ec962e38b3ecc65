use image::{imageops::FilterType, DynamicImage, Rgb, RgbImage};
use tract_onnx::prelude::*;

/// Gray used by YOLO for letterbox padding.
const PAD_VALUE: u8 = 114;

/// Transform needed to map model-space boxes back to the original image.
#[derive(Debug, Clone, Copy)]
pub struct Letterbox {
    pub scale: f32,
    pub pad_x: f32,
    pub pad_y: f32,
    pub orig_width: u32,
    pub orig_height: u32,
}

impl Letterbox {
    /// Map a model-space coordinate back to original image pixels, clamped to the image.
    pub fn unmap(&self, x: f32, y: f32) -> (f32, f32) {
        let ox = ((x - self.pad_x) / self.scale).clamp(0.0, self.orig_width as f32);
        let oy = ((y - self.pad_y) / self.scale).clamp(0.0, self.orig_height as f32);
        (ox, oy)
    }
}

/// Resize with preserved aspect ratio onto a square gray canvas, NCHW f32 in [0, 1].
pub fn letterbox(img: &DynamicImage, target_size: u32) -> (Tensor, Letterbox) {
    let rgb_img = img.to_rgb8();
    let (orig_width, orig_height) = rgb_img.dimensions();

    let max_dim = orig_width.max(orig_height).max(1);
    let scale = target_size as f32 / max_dim as f32;
    let new_width = ((orig_width as f32 * scale).round() as u32).clamp(1, target_size);
    let new_height = ((orig_height as f32 * scale).round() as u32).clamp(1, target_size);

    let resized = image::imageops::resize(&rgb_img, new_width, new_height, FilterType::Triangle);

    let x_offset = (target_size - new_width) / 2;
    let y_offset = (target_size - new_height) / 2;

    let mut canvas = RgbImage::from_pixel(target_size, target_size, Rgb([PAD_VALUE; 3]));
    image::imageops::replace(&mut canvas, &resized, x_offset as i64, y_offset as i64);

    let size = target_size as usize;
    let tensor = tract_ndarray::Array4::from_shape_fn((1, 3, size, size), |(_, channel, y, x)| {
        canvas.get_pixel(x as u32, y as u32)[channel] as f32 / 255.0
    })
    .into_tensor();

    let transform = Letterbox {
        scale,
        pad_x: x_offset as f32,
        pad_y: y_offset as f32,
        orig_width,
        orig_height,
    };
    (tensor, transform)
}
