//! Color gradients evaluated by linear interpolation between stops.

use serde::{Deserialize, Serialize};

use crate::color::lerp;
use crate::types::Rgba;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Position in `[0, 1]`.
    pub position: f32,
    pub color: Rgba,
}

impl GradientStop {
    pub const fn new(position: f32, color: Rgba) -> Self {
        Self { position, color }
    }
}

/// Piecewise-linear gradient over `[0, 1]`, alpha interpolated like color.
///
/// Stops are kept sorted by position. Before the first stop and after the last
/// the end colors are held.
///
/// # Examples
///
/// ```
/// use dungeon_map_core::gradient::{Gradient, GradientStop};
/// use dungeon_map_core::types::Rgba;
///
/// let g = Gradient::new(vec![
///     GradientStop::new(0.0, Rgba::new(0, 0, 0, 0)),
///     GradientStop::new(1.0, Rgba::new(200, 200, 200, 255)),
/// ]);
/// assert_eq!(g.evaluate(0.5), Rgba::new(100, 100, 100, 128));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<GradientStop>", into = "Vec<GradientStop>")]
pub struct Gradient {
    stops: Vec<GradientStop>,
}

impl Gradient {
    pub fn new(mut stops: Vec<GradientStop>) -> Self {
        for s in &mut stops {
            s.position = if s.position.is_nan() {
                0.0
            } else {
                s.position.clamp(0.0, 1.0)
            };
        }
        stops.sort_by(|a, b| a.position.total_cmp(&b.position));
        Self { stops }
    }

    /// Opaque at the center, fading to transparent at both ends.
    pub fn onion_default() -> Self {
        Self::new(vec![
            GradientStop::new(0.0, Rgba::new(255, 255, 255, 0)),
            GradientStop::new(0.5, Rgba::WHITE),
            GradientStop::new(1.0, Rgba::new(255, 255, 255, 0)),
        ])
    }

    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    /// Color at `t` (clamped to `[0, 1]`). An empty gradient is white.
    pub fn evaluate(&self, t: f32) -> Rgba {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let (first, last) = match (self.stops.first(), self.stops.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return Rgba::WHITE,
        };
        if t <= first.position {
            return first.color;
        }
        if t >= last.position {
            return last.color;
        }

        // First stop strictly past t; the one before it brackets from below.
        let upper = self.stops.partition_point(|s| s.position <= t);
        let lo = &self.stops[upper - 1];
        let hi = &self.stops[upper];
        let span = hi.position - lo.position;
        if span <= f32::EPSILON {
            return hi.color;
        }
        lerp(lo.color, hi.color, (t - lo.position) / span)
    }
}

impl From<Vec<GradientStop>> for Gradient {
    fn from(value: Vec<GradientStop>) -> Self {
        Gradient::new(value)
    }
}

impl From<Gradient> for Vec<GradientStop> {
    fn from(value: Gradient) -> Self {
        value.stops
    }
}

impl Default for Gradient {
    fn default() -> Self {
        Self::onion_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holds_end_colors_outside_stops() {
        let g = Gradient::new(vec![
            GradientStop::new(0.25, Rgba::BLACK),
            GradientStop::new(0.75, Rgba::WHITE),
        ]);
        assert_eq!(g.evaluate(0.0), Rgba::BLACK);
        assert_eq!(g.evaluate(1.0), Rgba::WHITE);
        assert_eq!(g.evaluate(-3.0), Rgba::BLACK);
        assert_eq!(g.evaluate(0.5), Rgba::opaque(128, 128, 128));
    }

    #[test]
    fn stops_are_sorted_on_construction() {
        let g = Gradient::new(vec![
            GradientStop::new(1.0, Rgba::WHITE),
            GradientStop::new(0.0, Rgba::BLACK),
        ]);
        assert_eq!(g.stops()[0].color, Rgba::BLACK);
        assert_eq!(g.evaluate(0.0), Rgba::BLACK);
    }

    #[test]
    fn onion_default_peaks_in_the_middle() {
        let g = Gradient::onion_default();
        assert_eq!(g.evaluate(0.5), Rgba::WHITE);
        assert_eq!(g.evaluate(0.0).a, 0);
        assert_eq!(g.evaluate(1.0).a, 0);
        assert!(g.evaluate(0.25).a > 0 && g.evaluate(0.25).a < 255);
    }

    #[test]
    fn empty_gradient_is_white() {
        assert_eq!(Gradient::new(Vec::new()).evaluate(0.3), Rgba::WHITE);
    }
}
