//! Field index over catalog records.
//!
//! Records are bucketed by HEALPix pixel at [`INDEX_ORDER`] (3072 pixels of
//! roughly 3.7°). Each bucket is sorted by magnitude, brightest first and
//! unknown magnitudes last, so a magnitude-limited query stops scanning a
//! bucket at the first record that is too faint. Fields wider than
//! [`FULL_SCAN_RADIUS`] scan every record instead.

pub mod healpix;

use skychart_core::constants::DEG_TO_RAD;
use skychart_core::{angular_separation, SkyPoint};

pub use healpix::{ang2pix_nest, query_disc_nest};

pub const INDEX_ORDER: u32 = 4;

/// Radius (radians) above which queries skip the pixel lookup.
pub const FULL_SCAN_RADIUS: f64 = 30.0 * DEG_TO_RAD;

#[derive(Debug, Clone)]
pub struct SkyIndex {
    order: u32,
    buckets: Vec<Vec<usize>>,
    positions: Vec<SkyPoint>,
    mags: Vec<f64>,
}

impl SkyIndex {
    /// Indexes `(position, magnitude)` pairs; the entry index is the
    /// position in the iterator.
    pub fn build(entries: impl IntoIterator<Item = (SkyPoint, Option<f64>)>) -> Self {
        let order = INDEX_ORDER;
        let mut buckets = vec![Vec::new(); healpix::npix(order) as usize];
        let mut positions = Vec::new();
        let mut mags = Vec::new();

        for (i, (position, mag)) in entries.into_iter().enumerate() {
            buckets[ang2pix_nest(order, position) as usize].push(i);
            positions.push(position);
            mags.push(mag.unwrap_or(f64::INFINITY));
        }
        for bucket in &mut buckets {
            bucket.sort_by(|&a, &b| mags[a].total_cmp(&mags[b]).then(a.cmp(&b)));
        }

        Self {
            order,
            buckets,
            positions,
            mags,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Entries in pixels overlapping the disc, filtered by `mag_limit` but
    /// not by exact distance. Ascending entry order.
    pub fn candidates(&self, center: SkyPoint, radius: f64, mag_limit: Option<f64>) -> Vec<usize> {
        let passes = |i: usize| mag_limit.map_or(true, |limit| self.mags[i] <= limit);

        let mut found: Vec<usize> = if radius > FULL_SCAN_RADIUS {
            (0..self.len()).filter(|&i| passes(i)).collect()
        } else {
            let mut found = Vec::new();
            for pixel in query_disc_nest(self.order, center, radius) {
                found.extend(
                    self.buckets[pixel as usize]
                        .iter()
                        .copied()
                        .take_while(|&i| passes(i)),
                );
            }
            found
        };
        found.sort_unstable();
        found
    }

    /// Entries whose stored position is within `radius` of `center`.
    pub fn query(&self, center: SkyPoint, radius: f64, mag_limit: Option<f64>) -> Vec<usize> {
        self.candidates(center, radius, mag_limit)
            .into_iter()
            .filter(|&i| angular_separation(center, self.positions[i]) <= radius)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(points: &[(f64, f64, Option<f64>)]) -> SkyIndex {
        SkyIndex::build(
            points
                .iter()
                .map(|&(ra, dec, mag)| (SkyPoint::from_degrees(ra, dec), mag)),
        )
    }

    #[test]
    fn test_query_exact_radius() {
        let index = index_of(&[
            (10.0, 0.0, Some(5.0)),
            (10.9, 0.0, Some(6.0)),
            (11.5, 0.0, Some(7.0)),
            (190.0, 0.0, Some(1.0)),
        ]);
        let center = SkyPoint::from_degrees(10.0, 0.0);
        assert_eq!(index.query(center, 1.0 * DEG_TO_RAD, None), vec![0, 1]);
        assert_eq!(index.query(center, 1.0 * DEG_TO_RAD, Some(5.5)), vec![0]);
    }

    #[test]
    fn test_unknown_magnitude_only_without_limit() {
        let index = index_of(&[(10.0, 0.0, None), (10.1, 0.0, Some(3.0))]);
        let center = SkyPoint::from_degrees(10.0, 0.0);
        assert_eq!(index.query(center, DEG_TO_RAD, None), vec![0, 1]);
        assert_eq!(index.query(center, DEG_TO_RAD, Some(20.0)), vec![1]);
    }

    #[test]
    fn test_query_across_ra_wrap_and_pole() {
        let index = index_of(&[(359.8, 0.0, Some(1.0)), (0.2, 0.0, Some(1.0)), (123.0, 89.9, Some(1.0))]);
        assert_eq!(index.query(SkyPoint::from_degrees(0.0, 0.0), DEG_TO_RAD, None), vec![0, 1]);
        assert_eq!(index.query(SkyPoint::from_degrees(0.0, 90.0), DEG_TO_RAD, None), vec![2]);
    }

    #[test]
    fn test_wide_field_matches_full_scan() {
        let points: Vec<(f64, f64, Option<f64>)> = (0..200)
            .map(|i| ((i * 37 % 360) as f64, ((i * 13 % 170) as f64) - 85.0, Some((i % 10) as f64)))
            .collect();
        let index = index_of(&points);
        let center = SkyPoint::from_degrees(100.0, 20.0);
        let radius = 40.0 * DEG_TO_RAD;
        let expected: Vec<usize> = points
            .iter()
            .enumerate()
            .filter(|(_, p)| angular_separation(center, SkyPoint::from_degrees(p.0, p.1)) <= radius)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(index.query(center, radius, None), expected);
    }

    #[test]
    fn test_pixel_query_matches_brute_force() {
        let points: Vec<(f64, f64, Option<f64>)> = (0..400)
            .map(|i| (20.0 + (i % 20) as f64 * 0.5, -5.0 + (i / 20) as f64 * 0.5, Some(8.0)))
            .collect();
        let index = index_of(&points);
        let center = SkyPoint::from_degrees(25.0, 0.0);
        let radius = 3.0 * DEG_TO_RAD;
        let expected: Vec<usize> = points
            .iter()
            .enumerate()
            .filter(|(_, p)| angular_separation(center, SkyPoint::from_degrees(p.0, p.1)) <= radius)
            .map(|(i, _)| i)
            .collect();
        assert!(!expected.is_empty());
        assert_eq!(index.query(center, radius, None), expected);
    }

    #[test]
    fn test_pixel_query_matches_brute_force_over_the_sky() {
        let points: Vec<(f64, f64, Option<f64>)> = (-89..=89)
            .flat_map(|dec| (0..360).map(move |ra| (ra as f64, dec as f64, Some(6.0))))
            .collect();
        let index = index_of(&points);
        let positions: Vec<SkyPoint> = points.iter().map(|p| SkyPoint::from_degrees(p.0, p.1)).collect();

        for dec in [0.0, 45.0, 62.0, 75.0, -80.0] {
            for radius_deg in [1.0, 10.0, 20.0, 29.9] {
                let center = SkyPoint::from_degrees(37.0, dec);
                let radius = radius_deg * DEG_TO_RAD;
                assert!(radius <= FULL_SCAN_RADIUS);
                let expected: Vec<usize> = positions
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| angular_separation(center, **p) <= radius)
                    .map(|(i, _)| i)
                    .collect();
                assert!(!expected.is_empty());
                assert_eq!(
                    index.query(center, radius, Some(10.0)),
                    expected,
                    "center dec {dec}, radius {radius_deg}"
                );
            }
        }
    }
}
