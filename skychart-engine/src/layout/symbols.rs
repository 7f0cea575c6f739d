//! Deep-sky and star symbols.
//!
//! | Type | Symbol |
//! |------|--------|
//! | galaxy | ellipse along the position angle |
//! | open cluster | dashed circle |
//! | asterism | dashed diamond |
//! | globular cluster | circle with a cross |
//! | planetary nebula | circle with four spokes |
//! | diffuse nebula | square |
//! | supernova remnant | circle |
//! | galaxy cluster, part of galaxy, unknown | X |

use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2};

use skychart_catalog::{DeepSkyObject, DeepSkyType};
use skychart_core::Projector;

use super::labels::{box_candidates, circular_candidates, cross_candidates, Candidate};
use super::Canvas;
use crate::config::ChartConfig;
use crate::draw::{Pen, Point};

const ELLIPSE_POINTS: usize = 48;
const OPEN_CLUSTER_DASH: (f64, f64) = (0.6, 0.4);

/// Chart-plane geometry of one deep-sky symbol, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DsoShape {
    pub kind: DeepSkyType,
    pub center: Point,
    /// Half the major axis, never below the configured minimum.
    pub rlong: f64,
    pub rshort: f64,
    /// Major-axis direction, radians counter-clockwise from `+x`.
    pub angle: f64,
}

impl DsoShape {
    pub fn for_object(projector: &Projector, object: &DeepSkyObject, center: Point, config: &ChartConfig) -> Self {
        let min = config.min_dso_radius_mm;
        let default_ratio = if object.kind == DeepSkyType::Galaxy { 0.5 } else { 1.0 };
        let half_mm = |axis: f64| projector.scale() * libm::tan(axis / 2.0);

        let (rlong, rshort) = match object.kind {
            DeepSkyType::GalaxyCluster | DeepSkyType::PartOfGalaxy | DeepSkyType::Unknown => (min, min),
            _ => {
                let rlong = object.major_axis.map_or(0.0, half_mm);
                let rshort = object.minor_axis.map_or(rlong * default_ratio, half_mm);
                if rlong < min {
                    let ratio = if rlong > 0.0 { rshort / rlong } else { default_ratio };
                    (min, min * ratio)
                } else {
                    (rlong, rshort)
                }
            }
        };

        let angle = match (object.kind, projector.local_axes(object.position)) {
            (DeepSkyType::Galaxy, Some((north, east))) => {
                let (s, c) = libm::sincos(object.position_angle.unwrap_or(0.0));
                libm::atan2(north[1] * c + east[1] * s, north[0] * c + east[0] * s)
            }
            _ => FRAC_PI_2,
        };

        Self {
            kind: object.kind,
            center,
            rlong,
            rshort,
            angle,
        }
    }

    /// Symbol for a user marker or a legend entry.
    pub fn plain(kind: DeepSkyType, center: Point, r: f64) -> Self {
        Self {
            kind,
            center,
            rlong: r,
            rshort: if kind == DeepSkyType::Galaxy { r / 2.0 } else { r },
            angle: 0.0,
        }
    }

    /// Half extents of the galaxy ellipse along the chart axes.
    fn ellipse_extents(&self) -> (f64, f64) {
        let (s, c) = libm::sincos(self.angle);
        (
            libm::hypot(self.rlong * c, self.rshort * s),
            libm::hypot(self.rlong * s, self.rshort * c),
        )
    }

    pub fn label_candidates(&self, size: f64) -> [Candidate; 4] {
        use DeepSkyType::*;
        let r = self.rlong;
        match self.kind {
            Galaxy => {
                let (hx, hy) = self.ellipse_extents();
                box_candidates(self.center, hx, hy, size)
            }
            OpenCluster | GlobularCluster | SupernovaRemnant | PlanetaryNebula => {
                circular_candidates(self.center, r, size)
            }
            Asterism | Nebula => box_candidates(self.center, r, r, size),
            GalaxyCluster | PartOfGalaxy | Unknown => cross_candidates(self.center, r * FRAC_1_SQRT_2, size),
        }
    }
}

fn offset(center: Point, dx: f64, dy: f64) -> Point {
    (center.0 + dx, center.1 + dy)
}

/// Draws `shape`, clipped to the field.
pub fn draw(canvas: &mut Canvas, shape: &DsoShape, config: &ChartConfig) {
    use DeepSkyType::*;
    let pen = Pen::solid(config.dso_color, config.dso_linewidth);
    let (c, r) = (shape.center, shape.rlong);
    match shape.kind {
        Galaxy => {
            let (s, co) = libm::sincos(shape.angle);
            let outline: Vec<Point> = (0..ELLIPSE_POINTS)
                .map(|i| {
                    let t = std::f64::consts::TAU * i as f64 / ELLIPSE_POINTS as f64;
                    let (u, v) = (shape.rlong * libm::cos(t), shape.rshort * libm::sin(t));
                    offset(c, u * co - v * s, u * s + v * co)
                })
                .collect();
            canvas.clipped_polyline(&outline, true, pen);
        }
        OpenCluster => {
            let (on, off) = OPEN_CLUSTER_DASH;
            canvas.clipped_circle(c, r, Pen::dashed(config.dso_color, config.open_cluster_linewidth, on, off));
        }
        Asterism => {
            let (on, off) = OPEN_CLUSTER_DASH;
            let diamond = [offset(c, r, 0.0), offset(c, 0.0, r), offset(c, -r, 0.0), offset(c, 0.0, -r)];
            canvas.clipped_polyline(
                &diamond,
                true,
                Pen::dashed(config.dso_color, config.open_cluster_linewidth, on, off),
            );
        }
        GlobularCluster => {
            canvas.clipped_circle(c, r, pen);
            canvas.clipped_polyline(&[offset(c, -r, 0.0), offset(c, r, 0.0)], false, pen);
            canvas.clipped_polyline(&[offset(c, 0.0, -r), offset(c, 0.0, r)], false, pen);
        }
        PlanetaryNebula => {
            let (inner, outer) = (0.75 * r, 1.5 * r);
            canvas.clipped_circle(c, inner, pen);
            for (dx, dy) in [(1.0, 0.0), (0.0, 1.0), (-1.0, 0.0), (0.0, -1.0)] {
                canvas.clipped_polyline(
                    &[offset(c, dx * inner, dy * inner), offset(c, dx * outer, dy * outer)],
                    false,
                    pen,
                );
            }
        }
        Nebula => {
            let square = [offset(c, -r, -r), offset(c, r, -r), offset(c, r, r), offset(c, -r, r)];
            canvas.clipped_polyline(&square, true, pen);
        }
        SupernovaRemnant => {
            canvas.clipped_circle(c, (r - config.dso_linewidth / 2.0).max(config.dso_linewidth), pen);
        }
        GalaxyCluster | PartOfGalaxy | Unknown => {
            let d = r * FRAC_1_SQRT_2;
            canvas.clipped_polyline(&[offset(c, -d, -d), offset(c, d, d)], false, pen);
            canvas.clipped_polyline(&[offset(c, -d, d), offset(c, d, -d)], false, pen);
        }
    }
}

/// Star disc radius in mm: brighter by one magnitude is 1.33 times larger,
/// a star at the integer part of the limit is 0.15 mm.
pub fn star_radius(mag: f64, mag_limit: f64, config: &ChartConfig) -> f64 {
    0.15 * libm::pow(1.33, mag_limit.trunc() - mag) + config.star_border_linewidth / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use skychart_core::constants::ARCMIN_TO_RAD;
    use skychart_core::{Field, SkyPoint};

    fn galaxy(major_arcmin: Option<f64>, minor_arcmin: Option<f64>, pa_deg: f64) -> DeepSkyObject {
        DeepSkyObject {
            catalog: "NGC".to_string(),
            name: "224".to_string(),
            kind: DeepSkyType::Galaxy,
            position: SkyPoint::new(0.5, 0.3),
            constellation: "AND".to_string(),
            mag: Some(3.4),
            major_axis: major_arcmin.map(|a| a * ARCMIN_TO_RAD),
            minor_axis: minor_arcmin.map(|a| a * ARCMIN_TO_RAD),
            position_angle: Some(pa_deg.to_radians()),
            master: None,
        }
    }

    fn projector() -> Projector {
        Projector::new(&Field::new(0.5, 0.3, 2f64.to_radians()).unwrap(), 180.0)
    }

    #[test]
    fn test_small_objects_get_minimum_radius() {
        let config = ChartConfig::default();
        let shape = DsoShape::for_object(&projector(), &galaxy(Some(0.1), Some(0.05), 0.0), (0.0, 0.0), &config);
        assert_eq!(shape.rlong, config.min_dso_radius_mm);
        assert!((shape.rshort - 0.5).abs() < 1e-9);

        let shape = DsoShape::for_object(&projector(), &galaxy(None, None, 0.0), (0.0, 0.0), &config);
        assert_eq!((shape.rlong, shape.rshort), (1.0, 0.5));
    }

    #[test]
    fn test_galaxy_size_and_angle() {
        let config = ChartConfig::default();
        let p = projector();
        let shape = DsoShape::for_object(&p, &galaxy(Some(60.0), Some(20.0), 0.0), (0.0, 0.0), &config);
        // half of 60' at 90 mm per tan(2°)
        assert!((shape.rlong - 90.0 * (0.5f64.to_radians()).tan() / (2f64.to_radians()).tan()).abs() < 1e-9);
        assert!((shape.angle - FRAC_PI_2).abs() < 1e-4);

        // position angle 90° points east, which is left on an unmirrored chart
        let shape = DsoShape::for_object(&p, &galaxy(Some(60.0), Some(20.0), 90.0), (0.0, 0.0), &config);
        assert!((shape.angle.abs() - std::f64::consts::PI).abs() < 1e-4);
        let (hx, hy) = shape.ellipse_extents();
        assert!(hx > hy);
    }

    #[test]
    fn test_star_radius_grows_with_brightness() {
        let config = ChartConfig::default();
        let faint = star_radius(9.0, 9.5, &config);
        assert!((faint - (0.15 + 0.03)).abs() < 1e-12);
        assert!(star_radius(4.0, 9.5, &config) > faint);
    }

    #[test]
    fn test_symbols_emit_commands() {
        let config = ChartConfig::default();
        for kind in DeepSkyType::ALL {
            let mut canvas = Canvas::new(50.0);
            draw(&mut canvas, &DsoShape::plain(kind, (10.0, 10.0), 2.0), &config);
            assert!(!canvas.commands.is_empty(), "{kind:?}");
        }
    }

    #[test]
    fn test_symbol_on_edge_is_trimmed() {
        let config = ChartConfig::default();
        let mut canvas = Canvas::new(50.0);
        draw(&mut canvas, &DsoShape::plain(DeepSkyType::Nebula, (49.0, 0.0), 3.0), &config);
        assert!(canvas.commands.len() >= 1);
        for command in &canvas.commands {
            if let crate::draw::DrawCommand::Polyline { points, closed, .. } = &command.command {
                assert!(!closed);
                assert!(points.iter().all(|p| libm::hypot(p.0, p.1) <= 50.0 + 1e-9));
            }
        }
    }
}
