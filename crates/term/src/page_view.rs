//! PageView: samples a page raster into a framebuffer.
//!
//! This module is pure (no I/O). The bottom row is a status line; the rest
//! shows the page two pixels per cell, scaled to fit with its aspect ratio
//! kept and centered.

use crate::core::Raster;
use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PageView {
    backdrop: Rgb,
    status_style: CellStyle,
}

impl Default for PageView {
    fn default() -> Self {
        Self {
            backdrop: Rgb::new(16, 16, 20),
            status_style: CellStyle {
                fg: Rgb::new(200, 200, 200),
                bg: Rgb::new(40, 40, 48),
            },
        }
    }
}

/// Source pixels per screen pixel so that `src` fits inside `dst`.
pub fn fit_scale(src: (u32, u32), dst: (u32, u32)) -> f32 {
    if dst.0 == 0 || dst.1 == 0 {
        return 0.0;
    }
    (src.0 as f32 / dst.0 as f32).max(src.1 as f32 / dst.1 as f32)
}

impl PageView {
    pub fn with_backdrop(mut self, backdrop: Rgb) -> Self {
        self.backdrop = backdrop;
        self
    }

    pub fn backdrop(&self) -> Rgb {
        self.backdrop
    }

    /// Render `page` plus a `status` line into `fb`, resizing it to `viewport`.
    pub fn render_into(
        &self,
        page: &Raster,
        status: &str,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        if fb.width() != viewport.width || fb.height() != viewport.height {
            fb.resize(viewport.width, viewport.height);
        }
        fb.clear(Cell::pixels(self.backdrop, self.backdrop));
        if viewport.height == 0 {
            return;
        }

        let map_rows = viewport.height - 1;
        let screen = (viewport.width as u32, map_rows as u32 * 2);
        let scale = fit_scale((page.width(), page.height()), screen);
        if scale > 0.0 {
            let drawn_w = ((page.width() as f32 / scale).ceil() as u32).min(screen.0);
            let drawn_h = ((page.height() as f32 / scale).ceil() as u32).min(screen.1);
            let offset = ((screen.0 - drawn_w) / 2, (screen.1 - drawn_h) / 2);

            let sample = |sx: u32, sy: u32| -> Rgb {
                if sx < offset.0 || sy < offset.1 {
                    return self.backdrop;
                }
                let px = ((sx - offset.0) as f32 * scale) as u32;
                let py = ((sy - offset.1) as f32 * scale) as u32;
                if px >= page.width() || py >= page.height() {
                    return self.backdrop;
                }
                Rgb::over(page.get(px, py), self.backdrop)
            };

            for cy in 0..map_rows {
                for cx in 0..viewport.width {
                    let (x, y) = (cx as u32, cy as u32 * 2);
                    fb.set(cx, cy, Cell::pixels(sample(x, y), sample(x, y + 1)));
                }
            }
        }

        let status_row = viewport.height - 1;
        for x in 0..viewport.width {
            fb.set(
                x,
                status_row,
                Cell {
                    ch: ' ',
                    style: self.status_style,
                },
            );
        }
        fb.put_str(0, status_row, status, self.status_style);
    }
}
