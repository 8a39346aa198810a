//! Correlation value → RGB color mapping.
//!
//! Three stops: blue for anti-correlated motion, white around zero, red for
//! correlated motion. The blend parameter is shifted by a fixed `skew` so
//! both ends saturate before ±1 (at `±(1 - skew)`), pushing pale colors
//! toward the near-zero values the dead-zone filter usually hides.

use serde::{Deserialize, Serialize};

/// Blend skew of the stock viewer.
pub const DEFAULT_SKEW: f32 = 0.25;

const BLUE: [f32; 3] = [0.0, 0.0, 255.0];
const WHITE: [f32; 3] = [255.0, 255.0, 255.0];
const RED: [f32; 3] = [255.0, 0.0, 0.0];

/// Blue → white → red ramp over `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationRamp {
    skew: f32,
}

impl CorrelationRamp {
    /// Ramp with the given blend skew. `0.0` gives the plain split where
    /// `0` maps to pure white.
    #[must_use]
    pub fn new(skew: f32) -> Self {
        Self { skew }
    }

    /// Ramp without skew.
    #[must_use]
    pub fn unskewed() -> Self {
        Self::new(0.0)
    }

    /// Blend skew in effect.
    #[must_use]
    pub fn skew(&self) -> f32 {
        self.skew
    }

    /// 8-bit color for `value`.
    #[must_use]
    pub fn color(&self, value: f32) -> [u8; 3] {
        let (from, to, t) = if value < 0.0 {
            (BLUE, WHITE, value + (1.0 - self.skew))
        } else {
            (WHITE, RED, value + self.skew)
        };
        let t = t.clamp(0.0, 1.0);
        [
            lerp_channel(from[0], to[0], t),
            lerp_channel(from[1], to[1], t),
            lerp_channel(from[2], to[2], t),
        ]
    }

    /// Color for `value` with channels in `[0, 1]`.
    #[must_use]
    pub fn color_normalized(&self, value: f32) -> [f32; 3] {
        normalized(self.color(value))
    }
}

impl Default for CorrelationRamp {
    fn default() -> Self {
        Self::new(DEFAULT_SKEW)
    }
}

fn lerp_channel(from: f32, to: f32, t: f32) -> u8 {
    (from * (1.0 - t) + to * t).round().clamp(0.0, 255.0) as u8
}

/// Map `value` with the default ramp.
#[must_use]
pub fn correlation_color(value: f32) -> [u8; 3] {
    CorrelationRamp::default().color(value)
}

/// Scale 8-bit channels to `[0, 1]`.
#[must_use]
pub fn normalized(rgb: [u8; 3]) -> [f32; 3] {
    [
        f32::from(rgb[0]) / 255.0,
        f32::from(rgb[1]) / 255.0,
        f32::from(rgb[2]) / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unskewed_stops() {
        let ramp = CorrelationRamp::unskewed();
        assert_eq!(ramp.color(0.0), [255, 255, 255]);
        assert_eq!(ramp.color(-1.0), [0, 0, 255]);
        assert_eq!(ramp.color(1.0), [255, 0, 0]);
        assert_eq!(ramp.color(0.5), [255, 128, 128]);
        assert_eq!(ramp.color(-0.5), [128, 128, 255]);
    }

    #[test]
    fn default_skew_saturates_early() {
        assert_eq!(correlation_color(-1.0), [0, 0, 255]);
        assert_eq!(correlation_color(-0.75), [0, 0, 255]);
        assert_eq!(correlation_color(1.0), [255, 0, 0]);
        assert_eq!(correlation_color(0.75), [255, 0, 0]);
    }

    #[test]
    fn default_skew_zero_is_pale_red() {
        // Zero falls on the non-negative branch with t = skew.
        assert_eq!(correlation_color(0.0), [255, 191, 191]);
        let just_below = correlation_color(-1e-6);
        assert_eq!(just_below, [191, 191, 255]);
    }

    #[test]
    fn channels_stay_in_range_for_any_input() {
        for k in -40..=40 {
            let v = k as f32 * 0.05;
            let [r, g, b] = correlation_color(v);
            // red and blue are never both below 255 at once
            assert!(r == 255 || b == 255, "{v}: {r} {g} {b}");
        }
    }

    #[test]
    fn normalized_divides_by_255() {
        assert_eq!(normalized([255, 0, 51]), [1.0, 0.0, 0.2]);
    }
}
