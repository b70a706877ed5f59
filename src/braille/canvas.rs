/// Dot bits indexed by `[x % 2][y % 4]` inside one character cell:
///
/// ```text
/// 0x01 0x08
/// 0x02 0x10
/// 0x04 0x20
/// 0x40 0x80
/// ```
const DOT_BITS: [[u8; 4]; 2] = [[0x01, 0x02, 0x04, 0x40], [0x08, 0x10, 0x20, 0x80]];

/// First codepoint of the Unicode Braille block (U+2800..U+28FF)
const BRAILLE_BASE: u32 = 0x2800;

/// Grid of Braille characters, each one a 2x4 block of dots.
/// Pixel resolution is `width * 2` by `height * 4`.
#[derive(Clone, Debug)]
pub struct BrailleCanvas {
    /// Width in character cells
    width: usize,
    /// Height in character cells
    height: usize,
    /// One bit pattern per cell, row-major
    cells: Vec<u8>,
}

impl BrailleCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    /// Turn on the dot at pixel (x, y). Off-canvas pixels are dropped.
    pub fn set_pixel(&mut self, x: usize, y: usize) {
        let (col, row) = (x / 2, y / 4);
        if col < self.width && row < self.height {
            self.cells[row * self.width + col] |= DOT_BITS[x % 2][y % 4];
        }
    }

    /// Same as `set_pixel`, for projected coordinates that can go negative
    pub fn set_pixel_signed(&mut self, x: i32, y: i32) {
        if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) {
            self.set_pixel(x, y);
        }
    }

    /// Braille glyph for a character cell, `None` when no dot is set
    pub fn glyph(&self, col: usize, row: usize) -> Option<char> {
        if col >= self.width || row >= self.height {
            return None;
        }
        match self.cells[row * self.width + col] {
            0 => None,
            bits => char::from_u32(BRAILLE_BASE + u32::from(bits)),
        }
    }

    /// Non-empty cells as (col, row, glyph), row by row
    pub fn glyphs(&self) -> impl Iterator<Item = (usize, usize, char)> + '_ {
        (0..self.height).flat_map(move |row| {
            (0..self.width).filter_map(move |col| self.glyph(col, row).map(|ch| (col, row, ch)))
        })
    }

    #[cfg(test)]
    pub fn to_string(&self) -> String {
        let blank = char::from_u32(BRAILLE_BASE).unwrap_or(' ');
        (0..self.height)
            .map(|row| {
                (0..self.width)
                    .map(|col| self.glyph(col, row).unwrap_or(blank))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_left_dot() {
        let mut canvas = BrailleCanvas::new(1, 1);
        canvas.set_pixel(0, 0);
        assert_eq!(canvas.to_string(), "⠁");
    }

    #[test]
    fn test_full_cell() {
        let mut canvas = BrailleCanvas::new(1, 1);
        for x in 0..2 {
            for y in 0..4 {
                canvas.set_pixel(x, y);
            }
        }
        assert_eq!(canvas.to_string(), "⣿");
    }

    #[test]
    fn test_dots_span_cells() {
        let mut canvas = BrailleCanvas::new(2, 1);
        for i in 0..4 {
            canvas.set_pixel(i, i);
        }
        // 0x01 | 0x10, then 0x04 | 0x80
        assert_eq!(canvas.to_string(), "⠑⢄");
    }

    #[test]
    fn test_empty_cells_render_blank() {
        let mut canvas = BrailleCanvas::new(2, 2);
        canvas.set_pixel(3, 7);
        assert_eq!(canvas.to_string(), "⠀⠀\n⠀⢀");
    }

    #[test]
    fn test_out_of_bounds_ignored() {
        let mut canvas = BrailleCanvas::new(2, 2);
        canvas.set_pixel(4, 0);
        canvas.set_pixel(0, 8);
        canvas.set_pixel_signed(-1, 3);
        canvas.set_pixel_signed(2, -5);
        assert_eq!(canvas.glyphs().count(), 0);
    }

    #[test]
    fn test_glyphs_skip_empty_cells() {
        let mut canvas = BrailleCanvas::new(3, 2);
        canvas.set_pixel(5, 7);
        let glyphs: Vec<_> = canvas.glyphs().collect();
        assert_eq!(glyphs, vec![(2, 1, '⢀')]);
        assert_eq!(canvas.glyph(0, 0), None);
        assert_eq!(canvas.glyph(9, 9), None);
    }
}
