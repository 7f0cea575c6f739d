//! Unit vectors and great-circle distance.

use crate::constants::PI;
use crate::field::SkyPoint;

/// Cosines closer to ±1 than this switch to the chord formula.
const CHORD_SWITCH: f64 = 1e-8;

/// Cartesian unit vector for a point on the celestial sphere.
#[inline]
pub fn unit_vector(p: SkyPoint) -> [f64; 3] {
    let (sin_ra, cos_ra) = libm::sincos(p.ra);
    let (sin_dec, cos_dec) = libm::sincos(p.dec);
    [cos_dec * cos_ra, cos_dec * sin_ra, sin_dec]
}

#[inline]
fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
fn norm(a: [f64; 3]) -> f64 {
    libm::sqrt(dot(a, a))
}

/// Great-circle distance between two sky points, in radians.
///
/// Uses the spherical law of cosines on unit vectors. The cosine is clamped
/// to `[-1, 1]` before `acos`; when it lies within `1e-8` of either end the
/// chord length `|u1 ∓ u2|` is used instead, because `acos` has no precision
/// left there. The result is exactly `0.0` for identical inputs and never NaN
/// for finite inputs.
pub fn angular_separation(p1: SkyPoint, p2: SkyPoint) -> f64 {
    let u1 = unit_vector(p1);
    let u2 = unit_vector(p2);
    let cos_sep = dot(u1, u2).clamp(-1.0, 1.0);

    if cos_sep > 1.0 - CHORD_SWITCH {
        let chord = norm([u1[0] - u2[0], u1[1] - u2[1], u1[2] - u2[2]]);
        return 2.0 * libm::asin((chord / 2.0).min(1.0));
    }
    if cos_sep < -1.0 + CHORD_SWITCH {
        let chord = norm([u1[0] + u2[0], u1[1] + u2[1], u1[2] + u2[2]]);
        return PI - 2.0 * libm::asin((chord / 2.0).min(1.0));
    }
    libm::acos(cos_sep)
}
