//! HEALPix nested pixelisation used to bucket catalog records.
//!
//! Only the two operations the field index needs: point → pixel and a
//! conservative disc → pixel set.

use std::collections::BTreeSet;

use skychart_core::constants::{HALF_PI, PI, RAD_TO_DEG, TWOPI};
use skychart_core::{angular_separation, SkyPoint};

#[inline]
pub fn npix(order: u32) -> u64 {
    let nside = 1u64 << order;
    12 * nside * nside
}

/// Nested pixel index of `p` (Gorski et al. 2005).
pub fn ang2pix_nest(order: u32, p: SkyPoint) -> u64 {
    let phi = p.ra;
    let z = libm::sin(p.dec);
    let nside = 1u64 << order;
    let (face, ix, iy) = compute_face_and_position(phi, z, nside);
    face as u64 * nside * nside + xy2pix_nest(ix, iy, order)
}

/// Pixels that may overlap the disc of `radius` radians around `center`.
///
/// Conservative: sampling at quarter-pixel resolution, padded by one pixel, so
/// a pixel that overlaps is never missed. Returned in ascending order.
pub fn query_disc_nest(order: u32, center: SkyPoint, radius: f64) -> Vec<u64> {
    let nside = 1u64 << order;
    // ~58.6° / nside is the mean pixel size
    let pixel_size = 58.6 / RAD_TO_DEG / nside as f64;
    let step = pixel_size * 0.25;
    let reach = radius + pixel_size;

    let mut pixels = BTreeSet::new();

    let dec_min = (center.dec - reach).max(-HALF_PI);
    let dec_max = (center.dec + reach).min(HALF_PI);
    let ra_span = disc_ra_span(center.dec, reach);

    let mut dec = dec_min;
    loop {
        let d = dec.min(dec_max);
        let cos_dec = libm::cos(d).max(0.01);
        let ra_step = step / cos_dec;
        let ra_range = if d.abs() > 89.0 / RAD_TO_DEG { TWOPI } else { ra_span };

        let ra_min = center.ra - ra_range / 2.0;
        let ra_max = center.ra + ra_range / 2.0;
        let mut ra = ra_min;
        loop {
            let sample = SkyPoint::new(ra.min(ra_max), d);
            if angular_separation(center, sample) <= reach {
                pixels.insert(ang2pix_nest(order, sample));
            }
            if ra >= ra_max {
                break;
            }
            ra += ra_step;
        }

        if dec >= dec_max {
            break;
        }
        dec += step;
    }

    pixels.into_iter().collect()
}

/// Full RA width covered by a disc of `reach` radians centred at `dec`.
///
/// The widest row of a cap is `2·asin(sin reach / cos dec)`; once the cap
/// touches a pole every right ascension is inside it.
fn disc_ra_span(dec: f64, reach: f64) -> f64 {
    if dec.abs() + reach >= HALF_PI {
        return TWOPI;
    }
    let ratio = (libm::sin(reach) / libm::cos(dec)).min(1.0);
    (2.0 * libm::asin(ratio)).min(TWOPI)
}

/// Face number and in-face position for the point.
fn compute_face_and_position(phi: f64, z: f64, nside: u64) -> (u32, u64, u64) {
    let z_abs = libm::fabs(z);
    let tt = phi_to_tt(phi);
    if z_abs <= 2.0 / 3.0 {
        compute_equatorial_face(tt, z, nside)
    } else {
        compute_polar_face(tt, z, z_abs, nside)
    }
}

fn phi_to_tt(phi: f64) -> f64 {
    let phi_norm = if phi < 0.0 { phi + TWOPI } else { phi };
    (phi_norm * 2.0 / PI).min(4.0 - 1e-12)
}

fn compute_equatorial_face(tt: f64, z: f64, nside: u64) -> (u32, u64, u64) {
    let temp1 = nside as f64 * (0.5 + tt);
    let temp2 = nside as f64 * z * 0.75;
    let jp = (temp1 - temp2) as i64;
    let jm = (temp1 + temp2) as i64;
    let nside_i = nside as i64;
    let ifp = jp / nside_i;
    let ifm = jm / nside_i;
    let face = equatorial_face_number(ifp, ifm);
    let ix = (jm - (face as i64 % 4) * nside_i).clamp(0, nside_i - 1);
    let iy = (nside_i - 1 - (jp - (face as i64 / 4) * nside_i)).clamp(0, nside_i - 1);
    (face, ix as u64, iy as u64)
}

fn equatorial_face_number(ifp: i64, ifm: i64) -> u32 {
    match (ifp, ifm) {
        (4, _) => ((ifm + 4) % 4) as u32,
        (_, 4) => ((ifp + 4) % 4 + 4) as u32,
        _ if ifp == ifm => (ifp + 4) as u32,
        _ if ifp < ifm => ifp as u32,
        _ => (ifm + 8) as u32,
    }
}

fn compute_polar_face(tt: f64, z: f64, z_abs: f64, nside: u64) -> (u32, u64, u64) {
    let tp = tt - libm::floor(tt);
    let tmp = nside as f64 * libm::sqrt(3.0 * (1.0 - z_abs));
    let jp = ((tp * tmp) as i64).min(nside as i64 - 1);
    let jm = (((1.0 - tp) * tmp) as i64).min(nside as i64 - 1);
    let ntt = libm::floor(tt) as u32;
    let face = (ntt % 4) + if z > 0.0 { 0 } else { 8 };
    let (ix, iy) = if z > 0.0 {
        (nside as i64 - jm - 1, nside as i64 - jp - 1)
    } else {
        (jp, jm)
    };
    (face, ix as u64, iy as u64)
}

/// Interleaves `ix`/`iy` bits into the in-face nested index (Z-order).
fn xy2pix_nest(ix: u64, iy: u64, order: u32) -> u64 {
    let mut result: u64 = 0;
    for i in 0..order {
        let bit_x = (ix >> i) & 1;
        let bit_y = (iy >> i) & 1;
        result |= (bit_x << (2 * i)) | (bit_y << (2 * i + 1));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use skychart_core::constants::DEG_TO_RAD;

    #[test]
    fn test_xy2pix_nest() {
        assert_eq!(xy2pix_nest(0, 0, 2), 0);
        assert_eq!(xy2pix_nest(1, 0, 2), 1);
        assert_eq!(xy2pix_nest(0, 1, 2), 2);
        assert_eq!(xy2pix_nest(1, 1, 2), 3);
    }

    #[test]
    fn test_ang2pix_in_range() {
        let n = npix(4);
        for ra in [0.0, 90.0, 180.0, 270.0, 359.999] {
            for dec in [-90.0, -89.0, -45.0, 0.0, 41.8, 45.0, 89.0, 90.0] {
                let p = SkyPoint::from_degrees(ra, dec);
                assert!(ang2pix_nest(4, p) < n, "({ra}, {dec})");
            }
        }
    }

    #[test]
    fn test_disc_contains_centre_pixel() {
        for &(ra, dec) in &[(0.0, 0.0), (0.0, 90.0), (200.0, -60.0), (359.9, 10.0)] {
            let center = SkyPoint::from_degrees(ra, dec);
            let pixels = query_disc_nest(4, center, 2.0 * DEG_TO_RAD);
            assert!(pixels.contains(&ang2pix_nest(4, center)), "({ra}, {dec})");
        }
    }

    #[test]
    fn test_ra_span() {
        assert_eq!(disc_ra_span(75.0 * DEG_TO_RAD, 20.0 * DEG_TO_RAD), TWOPI);
        assert_eq!(disc_ra_span(-80.0 * DEG_TO_RAD, 15.0 * DEG_TO_RAD), TWOPI);
        let at_equator = disc_ra_span(0.0, 10.0 * DEG_TO_RAD);
        assert!((at_equator - 20.0 * DEG_TO_RAD).abs() < 1e-12);
        // wider than the naive reach / cos(dec) at high declination
        let dec = 55.0 * DEG_TO_RAD;
        let reach = 30.0 * DEG_TO_RAD;
        assert!(disc_ra_span(dec, reach) > 2.0 * reach / libm::cos(dec));
    }

    #[test]
    fn test_wide_disc_at_high_declination() {
        let center = SkyPoint::from_degrees(0.0, 75.0);
        let radius = 29.9 * DEG_TO_RAD;
        let pixels = query_disc_nest(4, center, radius);
        for dec in 45..90 {
            for ra in 0..360 {
                let p = SkyPoint::from_degrees(ra as f64, dec as f64);
                if angular_separation(center, p) <= radius {
                    assert!(pixels.contains(&ang2pix_nest(4, p)), "missed ({ra}, {dec})");
                }
            }
        }
    }

    #[test]
    fn test_disc_contains_points_inside() {
        let center = SkyPoint::from_degrees(83.8, -5.4);
        let radius = 5.0 * DEG_TO_RAD;
        let pixels = query_disc_nest(4, center, radius);
        for k in 0..36 {
            let angle = k as f64 * 10.0 * DEG_TO_RAD;
            let p = SkyPoint::new(
                center.ra + 0.99 * radius * libm::cos(angle) / libm::cos(center.dec),
                center.dec + 0.99 * radius * libm::sin(angle),
            );
            if angular_separation(center, p) <= radius {
                assert!(pixels.contains(&ang2pix_nest(4, p)), "missed point {k}");
            }
        }
    }
}
