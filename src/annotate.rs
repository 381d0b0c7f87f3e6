use crate::detection::Detection;
use ab_glyph::{FontRef, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use thiserror::Error;

const FONT_BYTES: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const TEXT_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
const BOX_THICKNESS: i32 = 2;
const LABEL_BAND: i32 = 20;
const LABEL_SCALE: PxScale = PxScale { x: 16.0, y: 16.0 };

#[derive(Error, Debug)]
pub enum AnnotateError {
    #[error("Failed to load label font: {0}")]
    InvalidFont(#[from] ab_glyph::InvalidFont),
}

/// Draws detections onto an image: a hollow green rectangle per bounding box
/// plus a `"<class> <confidence>"` label on a filled background above it.
///
/// Coordinates are not validated against the image bounds; drawing outside
/// the buffer is silently clipped. Detections are rendered in input order and
/// later ones may overwrite earlier labels.
pub struct Annotator {
    font: FontRef<'static>,
}

impl Annotator {
    pub fn new() -> Result<Self, AnnotateError> {
        let font = FontRef::try_from_slice(FONT_BYTES)?;
        Ok(Self { font })
    }

    pub fn annotate(&self, image: &mut RgbImage, detections: &[Detection]) {
        for detection in detections {
            let [x1, y1, x2, y2] = detection.bbox;
            let width = (x2 - x1).max(1) as u32;
            let height = (y2 - y1).max(1) as u32;

            for offset in 0..BOX_THICKNESS {
                let rect = Rect::at(x1 - offset, y1 - offset)
                    .of_size(width + 2 * offset as u32, height + 2 * offset as u32);
                draw_hollow_rect_mut(image, rect, BOX_COLOR);
            }

            let label = format!("{} {:.2}", detection.class_label, detection.confidence);
            let (text_w, text_h) = text_size(LABEL_SCALE, &self.font, &label);

            let band = Rect::at(x1, y1 - LABEL_BAND).of_size(text_w.max(1), LABEL_BAND as u32);
            draw_filled_rect_mut(image, band, BOX_COLOR);

            let text_y = y1 - LABEL_BAND + (LABEL_BAND - text_h as i32).max(0) / 2;
            draw_text_mut(
                image,
                TEXT_COLOR,
                x1 + 1,
                text_y,
                LABEL_SCALE,
                &self.font,
                &label,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(bbox: [i32; 4], confidence: f32, class_label: &str) -> Detection {
        Detection {
            bbox,
            confidence,
            class_label: class_label.to_string(),
        }
    }

    fn white_image(width: u32, height: u32) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([255, 255, 255]))
    }

    #[test]
    fn draws_box_and_label_for_each_detection() {
        let annotator = Annotator::new().unwrap();
        let mut image = white_image(200, 200);
        let detections = vec![
            detection([10, 30, 60, 80], 0.87, "cat"),
            detection([100, 120, 160, 180], 0.42, "dog"),
        ];

        annotator.annotate(&mut image, &detections);

        assert_eq!(image.dimensions(), (200, 200));
        // Top-left corner of each box outline.
        assert_eq!(*image.get_pixel(10, 30), Rgb([0, 255, 0]));
        assert_eq!(*image.get_pixel(100, 120), Rgb([0, 255, 0]));
        // Top-left corner of each label background band.
        assert_eq!(*image.get_pixel(10, 10), Rgb([0, 255, 0]));
        assert_eq!(*image.get_pixel(100, 100), Rgb([0, 255, 0]));
    }

    #[test]
    fn zero_detections_leave_image_unchanged() {
        let annotator = Annotator::new().unwrap();
        let mut image = white_image(64, 64);
        let original = image.clone();

        annotator.annotate(&mut image, &[]);

        assert_eq!(image, original);
    }

    #[test]
    fn annotation_changes_the_image() {
        let annotator = Annotator::new().unwrap();
        let mut image = white_image(100, 100);
        let original = image.clone();

        annotator.annotate(&mut image, &[detection([10, 30, 50, 50], 0.9, "cat")]);

        assert_ne!(image, original);
        // Pixels well away from the box and label band stay untouched.
        assert_eq!(*image.get_pixel(80, 80), Rgb([255, 255, 255]));
    }

    #[test]
    fn out_of_bounds_boxes_are_clipped_silently() {
        let annotator = Annotator::new().unwrap();
        let mut image = white_image(100, 100);

        annotator.annotate(
            &mut image,
            &[
                detection([-10, -10, 2000, 2000], 0.5, "giant"),
                detection([50, 50, 40, 40], 0.5, "inverted"),
            ],
        );

        assert_eq!(image.dimensions(), (100, 100));
    }

    #[test]
    fn annotation_is_not_idempotent() {
        let annotator = Annotator::new().unwrap();
        let mut image = white_image(100, 100);
        let detections = vec![detection([10, 30, 60, 60], 0.87, "cat")];

        annotator.annotate(&mut image, &detections);
        let once = image.clone();
        annotator.annotate(&mut image, &detections);

        // Re-drawing re-blends the anti-aliased glyph edges, so a second
        // pass keeps changing the buffer.
        assert_ne!(image, once);
    }
}
