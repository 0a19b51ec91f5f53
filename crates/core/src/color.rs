//! Color math: source-over compositing, interpolation and tinting.
//!
//! Colors are straight (non-premultiplied) 8-bit RGBA. Blending is done in
//! `f32` and rounded back to the nearest 8-bit value.

use crate::types::Rgba;

#[inline(always)]
fn to_unit(v: u8) -> f32 {
    v as f32 / 255.0
}

#[inline(always)]
fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 255.0) + 0.5) as u8
}

/// Composite `src` over `dst`.
///
/// Output alpha is `sa + da * (1 - sa)`; each channel is
/// `(sc * sa + dc * da * (1 - sa)) / out_alpha`. An opaque source replaces the
/// destination exactly and a fully transparent result is `Rgba::TRANSPARENT`.
///
/// # Examples
///
/// ```
/// use dungeon_map_core::color::composite;
/// use dungeon_map_core::types::Rgba;
///
/// let red = Rgba::opaque(255, 0, 0);
/// assert_eq!(composite(red, Rgba::opaque(0, 0, 255)), red);
///
/// let half_white = Rgba::new(255, 255, 255, 128);
/// let out = composite(half_white, Rgba::BLACK);
/// assert_eq!(out.a, 255);
/// assert_eq!(out.r, 128);
/// ```
#[inline]
pub fn composite(src: Rgba, dst: Rgba) -> Rgba {
    if src.a == 255 {
        return src;
    }
    if src.a == 0 {
        return dst;
    }

    let sa = to_unit(src.a);
    let da = to_unit(dst.a);
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba::TRANSPARENT;
    }

    let dst_weight = da * (1.0 - sa);
    let channel = |s: u8, d: u8| to_byte((s as f32 * sa + d as f32 * dst_weight) / out_a);

    Rgba::new(
        channel(src.r, dst.r),
        channel(src.g, dst.g),
        channel(src.b, dst.b),
        to_byte(out_a * 255.0),
    )
}

/// Linear interpolation between two colors, alpha included.
///
/// `t` is clamped to `[0, 1]`.
pub fn lerp(a: Rgba, b: Rgba, t: f32) -> Rgba {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let channel = |x: u8, y: u8| to_byte(x as f32 + (y as f32 - x as f32) * t);
    Rgba::new(
        channel(a.r, b.r),
        channel(a.g, b.g),
        channel(a.b, b.b),
        channel(a.a, b.a),
    )
}

/// Channel-wise multiply, `tint` acting as a presentation filter.
///
/// White leaves the color unchanged; the tint's alpha scales the alpha.
pub fn multiply(color: Rgba, tint: Rgba) -> Rgba {
    if tint == Rgba::WHITE {
        return color;
    }
    let channel = |c: u8, t: u8| to_byte(c as f32 * to_unit(t));
    Rgba::new(
        channel(color.r, tint.r),
        channel(color.g, tint.g),
        channel(color.b, tint.b),
        channel(color.a, tint.a),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_source_ignores_background() {
        let src = Rgba::opaque(12, 34, 56);
        for dst in [
            Rgba::TRANSPARENT,
            Rgba::WHITE,
            Rgba::new(200, 10, 10, 77),
            Rgba::BLACK,
        ] {
            assert_eq!(composite(src, dst), src);
        }
    }

    #[test]
    fn transparent_source_keeps_destination() {
        let dst = Rgba::new(10, 20, 30, 40);
        assert_eq!(composite(Rgba::new(255, 255, 255, 0), dst), dst);
    }

    #[test]
    fn translucent_over_transparent_keeps_source_color() {
        let src = Rgba::new(200, 100, 50, 128);
        let out = composite(src, Rgba::TRANSPARENT);
        assert_eq!(out, src);
    }

    #[test]
    fn half_over_half_accumulates_alpha() {
        let src = Rgba::new(255, 0, 0, 128);
        let dst = Rgba::new(0, 0, 255, 128);
        let out = composite(src, dst);
        // 0.502 + 0.502 * 0.498 = 0.752
        assert_eq!(out.a, 192);
        assert!(out.r > out.b, "source should dominate: {out:?}");
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = Rgba::new(0, 0, 0, 0);
        let b = Rgba::new(200, 100, 50, 255);
        assert_eq!(lerp(a, b, 0.0), a);
        assert_eq!(lerp(a, b, 1.0), b);
        assert_eq!(lerp(a, b, 0.5), Rgba::new(100, 50, 25, 128));
        assert_eq!(lerp(a, b, 7.0), b);
        assert_eq!(lerp(a, b, f32::NAN), a);
    }

    #[test]
    fn multiply_by_white_is_identity() {
        let c = Rgba::new(9, 99, 199, 150);
        assert_eq!(multiply(c, Rgba::WHITE), c);
        assert_eq!(multiply(c, Rgba::TRANSPARENT), Rgba::TRANSPARENT);
    }
}
