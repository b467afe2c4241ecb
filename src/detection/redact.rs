use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use crate::models::WordDetection;

/// Fill value painted over recognized words.
pub const REDACTION_FILL: Luma<u8> = Luma([255u8]);

/// Paint a filled white rectangle over every detection that carries a word.
///
/// The image is mutated in place. Corners are inclusive, so a box of
/// `(x, y, w, h)` covers `(w + 1) x (h + 1)` pixels; parts outside the image
/// are clipped. Returns the number of word boxes handled.
pub fn blank_text(image: &mut GrayImage, detections: &[WordDetection]) -> usize {
    let (width, height) = image.dimensions();
    let mut painted = 0;

    for detection in detections.iter().filter(|d| d.has_word()) {
        painted += 1;

        // Clip in i64 so boxes spanning the whole coordinate range cannot overflow
        let corners = detection.bbox.to_corners();
        let x1 = i64::from(corners.x1).max(0);
        let y1 = i64::from(corners.y1).max(0);
        let x2 = i64::from(corners.x2).min(i64::from(width) - 1);
        let y2 = i64::from(corners.y2).min(i64::from(height) - 1);
        if x2 < x1 || y2 < y1 {
            continue;
        }

        let rect = Rect::at(x1 as i32, y1 as i32).of_size((x2 - x1 + 1) as u32, (y2 - y1 + 1) as u32);
        draw_filled_rect_mut(image, rect, REDACTION_FILL);
    }

    painted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BoundingBox;

    fn canvas() -> GrayImage {
        GrayImage::from_pixel(50, 40, Luma([7u8]))
    }

    #[test]
    fn fills_box_inclusive_of_far_corner() {
        let mut image = canvas();
        let words = vec![WordDetection::new(BoundingBox::new(10, 5, 4, 3), "Snyder")];

        let painted = blank_text(&mut image, &words);

        assert_eq!(painted, 1);
        for y in 5..=8 {
            for x in 10..=14 {
                assert_eq!(image.get_pixel(x, y)[0], 255, "({x}, {y})");
            }
        }
        assert_eq!(image.get_pixel(9, 5)[0], 7);
        assert_eq!(image.get_pixel(15, 5)[0], 7);
        assert_eq!(image.get_pixel(10, 4)[0], 7);
        assert_eq!(image.get_pixel(10, 9)[0], 7);
    }

    #[test]
    fn empty_tokens_are_skipped() {
        let mut image = canvas();
        let words = vec![
            WordDetection::new(BoundingBox::new(0, 0, 20, 20), ""),
            WordDetection::new(BoundingBox::new(20, 20, 10, 10), "   "),
        ];

        let painted = blank_text(&mut image, &words);

        assert_eq!(painted, 0);
        assert_eq!(image, canvas());
    }

    #[test]
    fn pixels_outside_every_box_are_unchanged() {
        let original = GrayImage::from_fn(50, 40, |x, y| Luma([((x * 3 + y) % 200) as u8]));
        let mut image = original.clone();
        let boxes = [BoundingBox::new(2, 2, 5, 5), BoundingBox::new(30, 10, 8, 12)];
        let words: Vec<_> = boxes
            .iter()
            .map(|&bbox| WordDetection::new(bbox, "word"))
            .collect();

        blank_text(&mut image, &words);

        let covered = |x: u32, y: u32| {
            boxes.iter().any(|b| {
                let c = b.to_corners();
                (c.x1..=c.x2).contains(&(x as i32)) && (c.y1..=c.y2).contains(&(y as i32))
            })
        };
        for (x, y, pixel) in image.enumerate_pixels() {
            if covered(x, y) {
                assert_eq!(pixel[0], 255);
            } else {
                assert_eq!(pixel, original.get_pixel(x, y));
            }
        }
    }

    #[test]
    fn boxes_running_off_the_edge_are_clipped() {
        let mut image = canvas();
        let words = vec![WordDetection::new(BoundingBox::new(45, 35, 20, 20), "edge")];

        blank_text(&mut image, &words);

        assert_eq!(image.dimensions(), (50, 40));
        assert_eq!(image.get_pixel(49, 39)[0], 255);
        assert_eq!(image.get_pixel(44, 39)[0], 7);
    }

    #[test]
    fn boxes_entirely_off_the_image_leave_it_untouched() {
        let mut image = canvas();
        let words = vec![WordDetection::new(BoundingBox::new(-30, -30, 10, 10), "gone")];

        assert_eq!(blank_text(&mut image, &words), 1);
        assert_eq!(image, canvas());
    }

    #[test]
    fn box_spanning_whole_coordinate_range_covers_image() {
        let mut image = canvas();
        let words = vec![WordDetection::new(
            BoundingBox::new(i32::MIN, i32::MIN, u32::MAX, u32::MAX),
            "everything",
        )];

        let painted = blank_text(&mut image, &words);

        assert_eq!(painted, 1);
        assert!(image.pixels().all(|pixel| pixel[0] == 255));
    }
}
