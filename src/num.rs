//! Utilities for numerics.

use std::cmp::Ordering;

/// An `f32` that implements [`Ord`] according to the IEEE 754 totalOrder predicate.
///
/// Useful as a key for [`Iterator::max_by_key`] and friends when selecting the largest contour or
/// the farthest point.
#[derive(Debug, Clone, Copy)]
pub struct TotalF32(pub f32);

impl PartialEq for TotalF32 {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for TotalF32 {}

impl PartialOrd for TotalF32 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TotalF32 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Wraps an angle in radians into the range `[-π, π]`.
pub fn wrap_angle(radians: f32) -> f32 {
    use std::f32::consts::{PI, TAU};

    let wrapped = (radians + PI).rem_euclid(TAU) - PI;
    // `rem_euclid` maps `π` to `-π`; keep `π` so already-wrapped inputs stay unchanged.
    if wrapped == -PI && radians > 0.0 {
        PI
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, PI};

    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn total_order() {
        let mut values = [TotalF32(2.0), TotalF32(-1.0), TotalF32(0.5)];
        values.sort();
        assert_eq!(values.map(|v| v.0), [-1.0, 0.5, 2.0]);
        assert_eq!(TotalF32(f32::NAN), TotalF32(f32::NAN));
    }

    #[test]
    fn wrap() {
        assert_relative_eq!(wrap_angle(0.0), 0.0);
        assert_relative_eq!(wrap_angle(PI), PI);
        assert_relative_eq!(wrap_angle(-PI), -PI);
        assert_relative_eq!(wrap_angle(3.0 * FRAC_PI_2), -FRAC_PI_2, epsilon = 1e-5);
        assert_relative_eq!(wrap_angle(-3.0 * FRAC_PI_2), FRAC_PI_2, epsilon = 1e-5);
    }
}
