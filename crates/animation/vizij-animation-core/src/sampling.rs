//! Keyframe curve sampling.
//!
//! Curves are piecewise linear between bracketing keyframes and held flat
//! outside their span. Equal key times form a step: the later key wins at and
//! after that time.

use vizij_face_api::math::lerp_f32;

use crate::config::SampleBand;
use crate::snippet::{Curve, Keyframe};

/// Sample sorted keys at local time `t` (seconds).
pub fn sample_keys(keys: &[Keyframe], t: f32) -> f32 {
    let n = keys.len();
    match n {
        0 => 0.0,
        1 => keys[0].intensity,
        _ => {
            if t <= keys[0].time {
                return keys[0].intensity;
            }
            if t >= keys[n - 1].time {
                return keys[n - 1].intensity;
            }
            // First key strictly after t; 1..n-1 given the guards above.
            let hi = keys.partition_point(|k| k.time <= t);
            let a = keys[hi - 1];
            let b = keys[hi];
            let span = b.time - a.time;
            if span <= f32::EPSILON {
                return b.intensity;
            }
            lerp_f32(a.intensity, b.intensity, (t - a.time) / span)
        }
    }
}

/// Sample a compiled curve, apply the snippet's intensity scale and clamp to `band`.
#[inline]
pub fn sample_curve(curve: &Curve, t: f32, intensity_scale: f32, band: SampleBand) -> f32 {
    band.clamp(sample_keys(&curve.keys, t) * intensity_scale)
}

/// Remainder with the sign of `b` (always in `[0, b)` for positive `b`).
pub(crate) fn fmod(a: f32, b: f32) -> f32 {
    if b == 0.0 {
        return 0.0;
    }
    let m = a % b;
    if (m < 0.0 && b > 0.0) || (m > 0.0 && b < 0.0) {
        m + b
    } else {
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn k(pairs: &[(f32, f32)]) -> Vec<Keyframe> {
        pairs.iter().map(|(t, v)| Keyframe::new(*t, *v)).collect()
    }

    #[test]
    fn interpolates_between_bracketing_keys() {
        let keys = k(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
        assert!((sample_keys(&keys, 0.25) - 0.25).abs() < 1e-6);
        assert!((sample_keys(&keys, 1.5) - 0.5).abs() < 1e-6);
        assert_eq!(sample_keys(&keys, 1.0), 1.0);
    }

    #[test]
    fn holds_outside_span() {
        let keys = k(&[(0.2, 0.3), (0.4, 0.9)]);
        assert_eq!(sample_keys(&keys, 0.0), 0.3);
        assert_eq!(sample_keys(&keys, 5.0), 0.9);
        assert_eq!(sample_keys(&[], 1.0), 0.0);
    }

    #[test]
    fn coincident_keys_step_to_the_later_value() {
        let keys = k(&[(0.0, 0.0), (0.5, 0.0), (0.5, 1.0), (1.0, 1.0)]);
        assert_eq!(sample_keys(&keys, 0.5), 1.0);
        assert_eq!(sample_keys(&keys, 0.49), 0.0);
    }

    #[test]
    fn fmod_wraps_negative_into_range() {
        assert!((fmod(1.25, 1.0) - 0.25).abs() < 1e-6);
        assert!((fmod(-0.25, 1.0) - 0.75).abs() < 1e-6);
        assert_eq!(fmod(3.0, 0.0), 0.0);
    }
}
