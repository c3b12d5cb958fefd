//! Offscreen text rendering for message shapes.
//!
//! Lines are drawn white-on-black onto a fixed 2048x1024 canvas using 8x8
//! bitmap glyphs scaled up to the requested font size, then the canvas is
//! sampled on a regular grid to produce the point cloud.

use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use glam::Vec3;
use image::{Rgba, RgbaImage};

pub const CANVAS_WIDTH: u32 = 2048;
pub const CANVAS_HEIGHT: u32 = 1024;
pub const LINE_HEIGHT_RATIO: f32 = 1.2;
/// Canvas pixel → world unit
pub const WORLD_SCALE: f32 = 0.08;
/// Red channel must exceed this for a sample to hit
const HIT_THRESHOLD: u8 = 128;

const GLYPH_CELLS: u32 = 8;
const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);
const INK: Rgba<u8> = Rgba([255, 255, 255, 255]);

const HEART: [u8; 8] = [0x36, 0x7f, 0x7f, 0x7f, 0x3e, 0x1c, 0x08, 0x00];

/// 8x8 bitmap for a character; `None` for characters that take no space
fn glyph(ch: char) -> Option<[u8; 8]> {
    match ch {
        // emoji presentation selector
        '\u{fe0f}' | '\u{200d}' => None,
        '❤' | '♥' => Some(HEART),
        _ => Some(
            BASIC_FONTS
                .get(ch)
                .or_else(|| LATIN_FONTS.get(ch))
                .unwrap_or([0; 8]),
        ),
    }
}

pub struct TextCanvas {
    image: RgbaImage,
}

impl Default for TextCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl TextCanvas {
    pub fn new() -> Self {
        Self {
            image: RgbaImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, BACKGROUND),
        }
    }

    /// Draw the lines upper-cased, centered, stacked 1.2 font sizes apart and
    /// vertically centered as a block.
    pub fn draw_lines<S: AsRef<str>>(&mut self, lines: &[S], font_size: u32) {
        let font_size = font_size as f32;
        let line_height = font_size * LINE_HEIGHT_RATIO;
        let block = lines.len().saturating_sub(1) as f32 * line_height;
        let start_y = (CANVAS_HEIGHT as f32 - block) / 2.0;

        for (index, line) in lines.iter().enumerate() {
            let center_y = start_y + index as f32 * line_height;
            self.draw_line(&line.as_ref().to_uppercase(), font_size, center_y);
        }
    }

    fn draw_line(&mut self, text: &str, font_size: f32, center_y: f32) {
        let glyphs: Vec<[u8; 8]> = text.chars().filter_map(glyph).collect();
        let cell = font_size / GLYPH_CELLS as f32;
        let line_width = glyphs.len() as f32 * font_size;

        let left = CANVAS_WIDTH as f32 / 2.0 - line_width / 2.0;
        let top = center_y - font_size / 2.0;

        for (i, rows) in glyphs.iter().enumerate() {
            let glyph_left = left + i as f32 * font_size;
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..GLYPH_CELLS {
                    if bits & (1 << col) != 0 {
                        self.fill_rect(
                            glyph_left + col as f32 * cell,
                            top + row as f32 * cell,
                            cell,
                        );
                    }
                }
            }
        }
    }

    /// Fill a square, clipped to the canvas
    fn fill_rect(&mut self, x: f32, y: f32, size: f32) {
        let clip = |v: f32, max: u32| v.round().clamp(0.0, max as f32) as u32;
        let (x0, x1) = (clip(x, CANVAS_WIDTH), clip(x + size, CANVAS_WIDTH));
        let (y0, y1) = (clip(y, CANVAS_HEIGHT), clip(y + size, CANVAS_HEIGHT));

        for py in y0..y1 {
            for px in x0..x1 {
                self.image.put_pixel(px, py, INK);
            }
        }
    }

    /// Sample every `stride`-th pixel in both axes, row-major, and map hits
    /// to world space centered on the canvas.
    pub fn sample_points(&self, stride: usize) -> Vec<Vec3> {
        let stride = stride.max(1);
        let half_w = CANVAS_WIDTH as f32 / 2.0;
        let half_h = CANVAS_HEIGHT as f32 / 2.0;

        let mut points = Vec::new();
        for py in (0..CANVAS_HEIGHT).step_by(stride) {
            for px in (0..CANVAS_WIDTH).step_by(stride) {
                if self.image.get_pixel(px, py).0[0] > HIT_THRESHOLD {
                    points.push(Vec3::new(
                        (px as f32 - half_w) * WORLD_SCALE,
                        -(py as f32 - half_h) * WORLD_SCALE,
                        0.0,
                    ));
                }
            }
        }
        points
    }
}

/// Rasterize `lines` at `font_size` and sample with `stride`
pub fn rasterize<S: AsRef<str>>(lines: &[S], font_size: u32, stride: usize) -> Vec<Vec3> {
    let mut canvas = TextCanvas::new();
    canvas.draw_lines(lines, font_size);
    canvas.sample_points(stride)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_canvas_has_no_points() {
        assert!(TextCanvas::new().sample_points(3).is_empty());
        assert!(rasterize(&["   "], 120, 3).is_empty());
    }

    #[test]
    fn test_text_is_centered() {
        let points = rasterize(&["HH"], 160, 3);
        assert!(!points.is_empty());
        let mean_x = points.iter().map(|p| p.x).sum::<f32>() / points.len() as f32;
        // symmetric glyphs: cloud centered horizontally within a cell or two
        assert!(mean_x.abs() < 160.0 / 8.0 * 2.0 * WORLD_SCALE);
        assert!(points.iter().all(|p| p.z == 0.0));
    }

    #[test]
    fn test_lowercase_is_upper_cased() {
        assert_eq!(rasterize(&["haii"], 120, 3), rasterize(&["HAII"], 120, 3));
    }

    #[test]
    fn test_lines_stack_downwards() {
        let points = rasterize(&["I", "I"], 100, 2);
        let top = points.iter().map(|p| p.y).fold(f32::MIN, f32::max);
        let bottom = points.iter().map(|p| p.y).fold(f32::MAX, f32::min);
        // two lines, 120px apart, each about 100px tall
        assert!(top - bottom > 150.0 * WORLD_SCALE);
    }

    #[test]
    fn test_heart_glyph_and_selector() {
        let heart = rasterize(&["❤️"], 160, 3);
        assert!(!heart.is_empty());
        assert_eq!(heart, rasterize(&["❤"], 160, 3));
    }

    #[test]
    fn test_points_in_row_major_order() {
        let points = rasterize(&["AB"], 120, 3);
        for pair in points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert!(a.y > b.y || (a.y == b.y && a.x < b.x));
        }
    }
}
