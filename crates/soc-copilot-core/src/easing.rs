//! Easing curves for count-up animation.
//!
//! An easing curve maps normalized linear progress `p` in `[0, 1]` to eased
//! progress. Every curve here is monotonically non-decreasing and fixes both
//! endpoints (`0 -> 0`, `1 -> 1`), so an eased count-up never overshoots its
//! target and never runs backwards.

use serde::{Deserialize, Serialize};

/// Available easing curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    /// Constant rate.
    Linear,
    /// Quadratic ease-out.
    EaseOutQuad,
    /// Cubic ease-out: `1 - (1 - p)^3`. Steep start, flat finish.
    #[default]
    EaseOutCubic,
    /// Quartic ease-out.
    EaseOutQuart,
    /// Cubic ease-in-out.
    EaseInOutCubic,
}

impl Easing {
    /// Apply the curve to a progress value.
    ///
    /// Input outside `[0, 1]` is clamped; NaN is treated as `0`.
    ///
    /// ```
    /// use soc_copilot_core::Easing;
    ///
    /// assert_eq!(Easing::EaseOutCubic.apply(0.5), 0.875);
    /// assert_eq!(Easing::Linear.apply(1.5), 1.0);
    /// ```
    #[inline]
    pub fn apply(self, p: f64) -> f64 {
        let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };

        match self {
            Easing::Linear => p,
            Easing::EaseOutQuad => 1.0 - (1.0 - p).powi(2),
            Easing::EaseOutCubic => ease_out_cubic(p),
            Easing::EaseOutQuart => 1.0 - (1.0 - p).powi(4),
            Easing::EaseInOutCubic => {
                if p < 0.5 {
                    4.0 * p * p * p
                } else {
                    1.0 - (-2.0 * p + 2.0).powi(3) / 2.0
                }
            }
        }
    }

    /// Interpolate from `start` to `end` at linear progress `p`.
    #[inline]
    pub fn interpolate(self, start: f64, end: f64, p: f64) -> f64 {
        start + (end - start) * self.apply(p)
    }

    /// Config name of the curve, as accepted by serde.
    pub fn name(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseOutQuad => "ease-out-quad",
            Easing::EaseOutCubic => "ease-out-cubic",
            Easing::EaseOutQuart => "ease-out-quart",
            Easing::EaseInOutCubic => "ease-in-out-cubic",
        }
    }
}

#[inline]
fn ease_out_cubic(p: f64) -> f64 {
    1.0 - (1.0 - p).powi(3)
}
