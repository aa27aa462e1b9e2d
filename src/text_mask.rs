//! Label seeding from a rasterized text mask.
//!
//! The label is drawn with a built-in bold 5x7 bitmap font into an RGBA
//! buffer the size of the simulation box (one pixel per sigma), then sampled
//! on a regular grid. Every sample whose alpha exceeds [`ALPHA_THRESHOLD`]
//! becomes a seed position.

use ultraviolet::Vec2;

pub const ALPHA_THRESHOLD: u8 = 128;
/// Glyph height as a fraction of the raster height
const TEXT_HEIGHT_FRACTION: f32 = 0.8;
/// Downward baseline shift as a fraction of the raster height
const BASELINE_OFFSET_FRACTION: f32 = 0.05;
/// Widest the text may get, as a fraction of the raster width
const MAX_WIDTH_FRACTION: f32 = 0.95;

const GLYPH_COLS: usize = 5;
const GLYPH_ROWS: usize = 7;
/// Glyph width plus one column of spacing
const ADVANCE: usize = GLYPH_COLS + 1;

fn glyph(c: char) -> [u8; GLYPH_ROWS] {
    match c {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100],
        '!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        _ => [0; GLYPH_ROWS],
    }
}

/// An RGBA raster of a label.
#[derive(Clone, Debug)]
pub struct TextMask {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

impl TextMask {
    pub fn alpha(&self, x: usize, y: usize) -> u8 {
        self.rgba[(y * self.width + x) * 4 + 3]
    }

    /// Draw `text` centered into a `width x height` raster.
    pub fn render(text: &str, width: usize, height: usize) -> Self {
        let mut rgba = vec![0u8; width * height * 4];
        let chars: Vec<char> = text.chars().map(|c| c.to_ascii_uppercase()).collect();
        if chars.is_empty() || width == 0 || height == 0 {
            return Self { width, height, rgba };
        }

        let font_cols = chars.len() * ADVANCE - 1;
        let mut cell = TEXT_HEIGHT_FRACTION * height as f32 / GLYPH_ROWS as f32;
        let max_width = MAX_WIDTH_FRACTION * width as f32;
        if font_cols as f32 * cell > max_width {
            cell = max_width / font_cols as f32;
        }
        let text_w = font_cols as f32 * cell;
        let text_h = GLYPH_ROWS as f32 * cell;
        let x0 = (width as f32 - text_w) / 2.0;
        let y0 = (height as f32 - text_h) / 2.0 + BASELINE_OFFSET_FRACTION * height as f32;

        for py in 0..height {
            for px in 0..width {
                let fx = (px as f32 + 0.5 - x0) / cell;
                let fy = (py as f32 + 0.5 - y0) / cell;
                // bold: smear every stroke half a font cell to the right
                if ink(&chars, fx, fy) || ink(&chars, fx - 0.5, fy) {
                    let i = (py * width + px) * 4;
                    rgba[i..i + 4].copy_from_slice(&[255, 255, 255, 255]);
                }
            }
        }
        Self { width, height, rgba }
    }
}

fn ink(chars: &[char], fx: f32, fy: f32) -> bool {
    if fx < 0.0 || fy < 0.0 {
        return false;
    }
    let col = fx as usize;
    let row = fy as usize;
    if row >= GLYPH_ROWS {
        return false;
    }
    let (index, glyph_col) = (col / ADVANCE, col % ADVANCE);
    if index >= chars.len() || glyph_col >= GLYPH_COLS {
        return false;
    }
    (glyph(chars[index])[row] >> (GLYPH_COLS - 1 - glyph_col)) & 1 == 1
}

/// Seed positions for label particles, in box coordinates.
///
/// The raster is `ceil(box_width) x ceil(box_height)` pixels; samples are
/// taken every `gap` pixels and placed at pixel centers.
pub fn seed_label_positions(text: &str, box_width: f32, box_height: f32, gap: usize) -> Vec<Vec2> {
    let width = box_width.ceil().max(0.0) as usize;
    let height = box_height.ceil().max(0.0) as usize;
    let mask = TextMask::render(text, width, height);
    let gap = gap.max(1);
    let sx = box_width / width.max(1) as f32;
    let sy = box_height / height.max(1) as f32;

    let mut seeds = Vec::new();
    for y in (0..height).step_by(gap) {
        for x in (0..width).step_by(gap) {
            if mask.alpha(x, y) > ALPHA_THRESHOLD {
                seeds.push(Vec2::new((x as f32 + 0.5) * sx, (y as f32 + 0.5) * sy));
            }
        }
    }
    seeds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_letter_seeds_inside_box() {
        let seeds = seed_label_positions("A", 20.0, 10.0, 1);
        assert!(!seeds.is_empty());
        for s in &seeds {
            assert!(s.x >= 0.0 && s.x < 20.0, "x out of box: {:?}", s);
            assert!(s.y >= 0.0 && s.y < 10.0, "y out of box: {:?}", s);
        }
    }

    #[test]
    fn seeding_is_deterministic() {
        let a = seed_label_positions("A", 20.0, 10.0, 1);
        let b = seed_label_positions("A", 20.0, 10.0, 1);
        assert_eq!(a.len(), b.len());
        assert_eq!(a, b);
    }

    #[test]
    fn larger_gap_samples_fewer_points() {
        let dense = seed_label_positions("MMSL", 48.0, 18.0, 1);
        let sparse = seed_label_positions("MMSL", 48.0, 18.0, 2);
        assert!(!sparse.is_empty());
        assert!(sparse.len() < dense.len());
    }

    #[test]
    fn text_is_roughly_centered() {
        // H is left/right symmetric, so its centroid sits on the box center
        let seeds = seed_label_positions("H", 20.0, 10.0, 1);
        let mean_x = seeds.iter().map(|s| s.x).sum::<f32>() / seeds.len() as f32;
        assert!((mean_x - 10.0).abs() < 1.5, "mean x = {}", mean_x);
    }

    #[test]
    fn blank_and_unknown_text_yield_nothing() {
        assert!(seed_label_positions("", 20.0, 10.0, 1).is_empty());
        assert!(seed_label_positions("   ", 20.0, 10.0, 1).is_empty());
        assert!(seed_label_positions("A", 0.0, 0.0, 1).is_empty());
    }

    #[test]
    fn lowercase_matches_uppercase() {
        assert_eq!(
            seed_label_positions("ab", 20.0, 10.0, 1),
            seed_label_positions("AB", 20.0, 10.0, 1)
        );
    }
}
