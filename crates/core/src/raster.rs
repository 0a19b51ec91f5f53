//! Raster - a software RGBA pixel buffer and its drawing primitives.
//!
//! Coordinates: `(x, y)` with `x` growing right and `y` growing down.
//! Storage is a flat row-major `Vec<Rgba>` (`y * width + x`).
//!
//! All primitives that take a position clip against the buffer, so stamping a
//! texture partially off-canvas is well-defined. Direct pixel access through
//! [`Raster::get`]/[`Raster::set`] is not clipped and panics out of range.

use std::path::Path;

use image::RgbaImage;

use crate::color::{composite, multiply};
use crate::error::Result;
use crate::types::Rgba;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Raster {
    /// A fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba::TRANSPARENT)
    }

    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    #[inline(always)]
    fn idx(&self, x: u32, y: u32) -> usize {
        debug_assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} raster",
            self.width,
            self.height
        );
        (y as usize) * (self.width as usize) + (x as usize)
    }

    pub fn get(&self, x: u32, y: u32) -> Rgba {
        self.pixels[self.idx(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, color: Rgba) {
        let i = self.idx(x, y);
        self.pixels[i] = color;
    }

    /// Resize the buffer, keeping the allocation when possible.
    ///
    /// Contents are reset to transparent.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels
            .resize((width as usize) * (height as usize), Rgba::TRANSPARENT);
    }

    pub fn fill(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    /// Overwrite a rectangle with `color` (no blending).
    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Rgba) {
        let Some((x0, y0, x1, y1)) = self.clip(x, y, w, h) else {
            return;
        };
        let width = self.width as usize;
        for row in y0..y1 {
            let start = row * width;
            self.pixels[start + x0..start + x1].fill(color);
        }
    }

    /// Replicate edge pixels outward by one.
    ///
    /// Row 0 and the last row become copies of their inner neighbours, then
    /// column 0 and the last column likewise, so corners take the diagonal
    /// interior pixel. Tile samplers using bilinear filtering then never pick
    /// up background at tile seams. Buffers thinner than 2 pixels are left
    /// unchanged.
    pub fn fill_border(&mut self) {
        let (w, h) = (self.width as usize, self.height as usize);
        if w < 2 || h < 2 {
            return;
        }

        self.pixels.copy_within(w..2 * w, 0);
        self.pixels.copy_within((h - 2) * w..(h - 1) * w, (h - 1) * w);

        for y in 0..h {
            let row = y * w;
            self.pixels[row] = self.pixels[row + 1];
            self.pixels[row + w - 1] = self.pixels[row + w - 2];
        }
    }

    /// Composite `src` over this buffer with its top-left corner at `(x, y)`.
    pub fn stamp(&mut self, src: &Raster, x: i32, y: i32) {
        let Some((x0, y0, x1, y1)) = self.clip(x, y, src.width, src.height) else {
            return;
        };
        let width = self.width as usize;
        for dy in y0..y1 {
            let sy = (dy as i64 - y as i64) as usize;
            for dx in x0..x1 {
                let sx = (dx as i64 - x as i64) as usize;
                let s = src.pixels[sy * src.width as usize + sx];
                let d = &mut self.pixels[dy * width + dx];
                *d = composite(s, *d);
            }
        }
    }

    /// Repeat `texture` across the whole buffer, compositing each copy.
    pub fn tile_repeat(&mut self, texture: &Raster) {
        if texture.width == 0 || texture.height == 0 {
            return;
        }
        let (tw, th) = (texture.width as usize, texture.height as usize);
        let width = self.width as usize;
        for y in 0..self.height as usize {
            let src_row = (y % th) * tw;
            for x in 0..width {
                let s = texture.pixels[src_row + x % tw];
                let d = &mut self.pixels[y * width + x];
                *d = composite(s, *d);
            }
        }
    }

    /// Copy a `w x h` region of `src` starting at `(sx, sy)` to `(dx, dy)`.
    ///
    /// The source region must lie inside `src`; the destination is clipped.
    pub fn blit(&mut self, src: &Raster, sx: u32, sy: u32, w: u32, h: u32, dx: i32, dy: i32) {
        debug_assert!(
            sx + w <= src.width && sy + h <= src.height,
            "blit source region outside {}x{} raster",
            src.width,
            src.height
        );
        let Some((x0, y0, x1, y1)) = self.clip(dx, dy, w, h) else {
            return;
        };
        let width = self.width as usize;
        let src_w = src.width as usize;
        for row in y0..y1 {
            let src_y = sy as usize + (row as i64 - dy as i64) as usize;
            let src_x = sx as usize + (x0 as i64 - dx as i64) as usize;
            let len = x1 - x0;
            let from = src_y * src_w + src_x;
            self.pixels[row * width + x0..row * width + x1]
                .copy_from_slice(&src.pixels[from..from + len]);
        }
    }

    /// Multiply every pixel by `tint` in place.
    pub fn multiply(&mut self, tint: Rgba) {
        if tint == Rgba::WHITE {
            return;
        }
        for p in &mut self.pixels {
            *p = multiply(*p, tint);
        }
    }

    pub fn to_image(&self) -> RgbaImage {
        let bytes: Vec<u8> = self.pixels.iter().flat_map(|p| p.to_array()).collect();
        // Length always matches width * height * 4.
        RgbaImage::from_raw(self.width, self.height, bytes)
            .unwrap_or_else(|| RgbaImage::new(self.width, self.height))
    }

    pub fn from_image(image: &RgbaImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            pixels: image.pixels().map(|p| Rgba::from_array(p.0)).collect(),
        }
    }

    /// Decode an image file (PNG or JPEG) into a raster.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let image = image::open(path)?.to_rgba8();
        Ok(Self::from_image(&image))
    }

    /// Clip a rectangle to the buffer, returning `(x0, y0, x1, y1)`.
    fn clip(&self, x: i32, y: i32, w: u32, h: u32) -> Option<(usize, usize, usize, usize)> {
        let x0 = (x as i64).max(0);
        let y0 = (y as i64).max(0);
        let x1 = (x as i64 + w as i64).min(self.width as i64);
        let y1 = (y as i64 + h as i64).min(self.height as i64);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as usize, y0 as usize, x1 as usize, y1 as usize))
    }
}
