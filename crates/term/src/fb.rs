//! Character-cell framebuffer for the map preview.
//!
//! Map pixels are shown two per cell with the upper half block `▀`: the
//! foreground paints the upper pixel and the background the lower one.

use crate::core::color::composite;
use crate::types::Rgba;

/// Upper half block.
pub const HALF_BLOCK: char = '\u{2580}';

/// 24-bit terminal color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Flatten a translucent pixel onto an opaque `backdrop`.
    pub fn over(pixel: Rgba, backdrop: Rgb) -> Self {
        let out = composite(pixel, Rgba::opaque(backdrop.r, backdrop.g, backdrop.b));
        Self::new(out.r, out.g, out.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub fg: Rgb,
    pub bg: Rgb,
}

impl Default for CellStyle {
    fn default() -> Self {
        Self {
            fg: Rgb::new(220, 220, 220),
            bg: Rgb::new(0, 0, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: CellStyle,
}

impl Cell {
    /// A half-block cell showing `upper` over `lower`.
    pub const fn pixels(upper: Rgb, lower: Rgb) -> Self {
        Self {
            ch: HALF_BLOCK,
            style: CellStyle {
                fg: upper,
                bg: lower,
            },
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: CellStyle::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Resize, keeping the allocation when possible. Contents are cleared.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells.resize((width as usize) * (height as usize), Cell::default());
    }

    #[inline(always)]
    fn idx(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    /// `None` outside the buffer.
    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        self.idx(x, y).map(|i| self.cells[i])
    }

    /// Writes outside the buffer are dropped.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.idx(x, y) {
            self.cells[i] = cell;
        }
    }

    pub fn clear(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Write `s` from `(x, y)`, truncated at the right edge.
    pub fn put_str(&mut self, x: u16, y: u16, s: &str, style: CellStyle) {
        for (cx, ch) in (x..self.width).zip(s.chars()) {
            self.set(cx, y, Cell { ch, style });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_access_is_ignored() {
        let mut fb = FrameBuffer::new(2, 1);
        fb.set(5, 5, Cell::pixels(Rgb::new(1, 1, 1), Rgb::new(2, 2, 2)));
        assert_eq!(fb.get(5, 5), None);
        assert_eq!(fb.get(1, 0), Some(Cell::default()));
    }

    #[test]
    fn put_str_truncates() {
        let mut fb = FrameBuffer::new(3, 1);
        fb.put_str(1, 0, "abc", CellStyle::default());
        assert_eq!(fb.get(1, 0).unwrap().ch, 'a');
        assert_eq!(fb.get(2, 0).unwrap().ch, 'b');
    }

    #[test]
    fn translucent_pixels_blend_onto_backdrop() {
        let backdrop = Rgb::new(0, 0, 0);
        assert_eq!(Rgb::over(Rgba::TRANSPARENT, backdrop), backdrop);
        assert_eq!(Rgb::over(Rgba::opaque(9, 8, 7), backdrop), Rgb::new(9, 8, 7));
        assert_eq!(
            Rgb::over(Rgba::new(255, 255, 255, 128), backdrop),
            Rgb::new(128, 128, 128)
        );
    }
}
