//! Annotated copy of the upload with one box per detection. Display only.

use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use super::types::Detection;

const LINE_WIDTH: u32 = 3;

fn class_color(class_id: u32) -> Rgb<u8> {
    let (r, g, b) = match class_id {
        0 => (46, 125, 50),   // green
        1 => (21, 101, 192),  // blue
        2 => (239, 108, 0),   // orange
        3 => (173, 20, 87),   // magenta
        _ => (128, 128, 128), // gray
    };
    Rgb([r, g, b])
}

/// Draw every detection onto a copy of the image.
pub fn annotate(image: &DynamicImage, detections: &[Detection]) -> RgbImage {
    let mut canvas = image.to_rgb8();
    let (w, h) = (canvas.width() as i32, canvas.height() as i32);

    for detection in detections {
        let x_min = (detection.bbox.x1.round() as i32).clamp(0, w);
        let y_min = (detection.bbox.y1.round() as i32).clamp(0, h);
        let x_max = (detection.bbox.x2.round() as i32).clamp(0, w);
        let y_max = (detection.bbox.y2.round() as i32).clamp(0, h);
        let rw = (x_max - x_min).max(1) as u32;
        let rh = (y_max - y_min).max(1) as u32;
        let color = class_color(detection.class_id);

        // Concentric rectangles give a thick border
        let thickness = LINE_WIDTH.min(rw / 2).min(rh / 2).max(1);
        for t in 0..thickness {
            let rect = Rect::at(x_min + t as i32, y_min + t as i32)
                .of_size((rw - 2 * t).max(1), (rh - 2 * t).max(1));
            draw_hollow_rect_mut(&mut canvas, rect, color);
        }
    }

    canvas
}
