// extensions/easing.rs
//
// Pure easing functions for animation interpolation.
// No dependencies on Entity/Scene — just math.

use glam::Vec3;
use std::f32::consts::PI;

/// Easing function type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant velocity (no easing).
    #[default]
    Linear,
    /// Slow start.
    QuadIn,
    /// Slow end.
    QuadOut,
    /// Slow start and end.
    QuadInOut,
    /// Stronger slow end.
    CubicOut,
    /// Sine wave easing (smooth).
    SineInOut,
    /// Wind up before leaving.
    BackIn,
    /// Overshoot then settle.
    BackOut,
}

impl Easing {
    /// Apply the easing function to a normalized time value `t` in [0, 1].
    /// Back variants briefly leave [0, 1].
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        const C1: f32 = 1.70158;
        const C3: f32 = C1 + 1.0;

        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
            Easing::BackIn => C3 * t * t * t - C1 * t * t,
            Easing::BackOut => 1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2),
        }
    }
}

// ── Interpolation helpers ────────────────────────────────────────────────

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linearly interpolate between two Vec3 values (positions, scales, RGB).
#[inline]
pub fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}

/// Interpolate with easing.
#[inline]
pub fn ease(a: f32, b: f32, t: f32, easing: Easing) -> f32 {
    lerp(a, b, easing.apply(t))
}

/// Interpolate Vec3 with easing.
#[inline]
pub fn ease_vec3(a: Vec3, b: Vec3, t: f32, easing: Easing) -> Vec3 {
    lerp_vec3(a, b, easing.apply(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 8] = [
        Easing::Linear,
        Easing::QuadIn,
        Easing::QuadOut,
        Easing::QuadInOut,
        Easing::CubicOut,
        Easing::SineInOut,
        Easing::BackIn,
        Easing::BackOut,
    ];

    #[test]
    fn every_curve_hits_its_endpoints() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 1e-5, "{:?} at 0", easing);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-5, "{:?} at 1", easing);
        }
    }

    #[test]
    fn back_out_overshoots_and_back_in_winds_up() {
        assert!(Easing::BackOut.apply(0.7) > 1.0);
        assert!(Easing::BackIn.apply(0.2) < 0.0);
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(Easing::Linear.apply(-1.0), 0.0);
        assert_eq!(Easing::Linear.apply(2.0), 1.0);
    }

    #[test]
    fn ease_vec3_interpolates_componentwise() {
        let mid = ease_vec3(Vec3::ZERO, Vec3::new(2.0, 4.0, -2.0), 0.5, Easing::Linear);
        assert!((mid - Vec3::new(1.0, 2.0, -1.0)).length() < 1e-6);
    }
}
