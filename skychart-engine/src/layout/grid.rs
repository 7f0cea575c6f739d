//! Equatorial coordinate grid.
//!
//! The declination step is the smallest round value that leaves at most
//! [`MAX_LINES`] lines across the field; the right ascension step is the
//! smallest round time interval at least as wide on the sky at the field
//! centre.

use skychart_core::constants::{ARCMIN_TO_RAD, HALF_PI, TWOPI};
use skychart_core::{Projector, SkyPoint};

use super::Canvas;
use crate::config::ChartConfig;
use crate::draw::Pen;

const MAX_LINES: f64 = 6.0;

const SAMPLES: usize = 96;

/// Declination steps, arcminutes.
const DEC_STEPS: [f64; 15] = [
    1.0, 2.0, 5.0, 10.0, 15.0, 20.0, 30.0, 60.0, 120.0, 300.0, 600.0, 900.0, 1200.0, 1800.0, 2700.0,
];

/// Right ascension steps, minutes of time.
const RA_STEPS: [f64; 12] = [1.0, 2.0, 4.0, 5.0, 10.0, 15.0, 20.0, 30.0, 60.0, 120.0, 180.0, 240.0];

/// Radians per minute of time.
const TIME_MINUTE: f64 = 15.0 * ARCMIN_TO_RAD;

/// `(dec_step, ra_step)` in radians for a field of `radius` centred at `dec0`.
pub fn grid_steps(radius: f64, dec0: f64) -> (f64, f64) {
    let wanted = 2.0 * radius / MAX_LINES;
    let dec_step = DEC_STEPS
        .iter()
        .map(|s| s * ARCMIN_TO_RAD)
        .find(|&s| s >= wanted)
        .unwrap_or(DEC_STEPS[DEC_STEPS.len() - 1] * ARCMIN_TO_RAD);
    let cos_dec = libm::cos(dec0);
    let ra_step = RA_STEPS
        .iter()
        .map(|m| m * TIME_MINUTE)
        .find(|&s| s * cos_dec >= dec_step)
        .unwrap_or(RA_STEPS[RA_STEPS.len() - 1] * TIME_MINUTE);
    (dec_step, ra_step)
}

fn samples(from: f64, to: f64) -> impl Iterator<Item = f64> {
    (0..=SAMPLES).map(move |i| from + (to - from) * i as f64 / SAMPLES as f64)
}

pub fn draw(canvas: &mut Canvas, projector: &Projector, config: &ChartConfig) {
    let pen = Pen::solid(config.grid_color, config.grid_linewidth);
    let field = projector.field();
    let (center, radius) = (field.center(), field.radius());
    let (dec_step, ra_step) = grid_steps(radius, center.dec);

    let dec_lo = (center.dec - radius).max(-HALF_PI);
    let dec_hi = (center.dec + radius).min(HALF_PI);
    let (ra_lo, ra_hi) = if center.dec.abs() + radius >= HALF_PI {
        (0.0, TWOPI)
    } else {
        let half = libm::asin((libm::sin(radius) / libm::cos(center.dec)).min(1.0));
        (center.ra - half, center.ra + half)
    };

    let project = |ra: f64, dec: f64| {
        let p = projector.project_unbounded(SkyPoint::new(ra, dec));
        p.valid.then(|| p.xy())
    };

    let mut k = libm::ceil(dec_lo / dec_step) as i64;
    while (k as f64) * dec_step <= dec_hi {
        let dec = k as f64 * dec_step;
        if dec.abs() < HALF_PI - 1e-9 {
            let line: Vec<_> = samples(ra_lo, ra_hi).map(|ra| project(ra, dec)).collect();
            canvas.clipped_runs(&line, pen);
        }
        k += 1;
    }

    let full_circle = ra_hi - ra_lo >= TWOPI;
    let mut k = libm::ceil(ra_lo / ra_step) as i64;
    while (k as f64) * ra_step < ra_hi || (!full_circle && (k as f64) * ra_step <= ra_hi) {
        let ra = k as f64 * ra_step;
        let line: Vec<_> = samples(dec_lo, dec_hi).map(|dec| project(ra, dec)).collect();
        canvas.clipped_runs(&line, pen);
        k += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::DrawCommand;
    use skychart_core::constants::DEG_TO_RAD;
    use skychart_core::Field;

    #[test]
    fn test_steps_scale_with_field() {
        let (dec_step, ra_step) = grid_steps(1.2 * DEG_TO_RAD, 0.0);
        assert!((dec_step - 30.0 * ARCMIN_TO_RAD).abs() < 1e-12);
        assert!((ra_step - 2.0 * TIME_MINUTE).abs() < 1e-12);

        let (dec_step, _) = grid_steps(10.0 * DEG_TO_RAD, 0.0);
        assert!((dec_step - 300.0 * ARCMIN_TO_RAD).abs() < 1e-12);

        // RA lines spread out towards the pole
        let (_, ra_near_pole) = grid_steps(1.2 * DEG_TO_RAD, 80.0 * DEG_TO_RAD);
        assert!(ra_near_pole > ra_step_at_equator());
    }

    fn ra_step_at_equator() -> f64 {
        grid_steps(1.2 * DEG_TO_RAD, 0.0).1
    }

    fn grid_lines(ra_deg: f64, dec_deg: f64, radius_deg: f64) -> Vec<Vec<(f64, f64)>> {
        let field = Field::new(ra_deg * DEG_TO_RAD, dec_deg * DEG_TO_RAD, radius_deg * DEG_TO_RAD).unwrap();
        let projector = Projector::new(&field, 180.0);
        let mut canvas = Canvas::new(projector.field_radius_mm());
        draw(&mut canvas, &projector, &ChartConfig::default());
        canvas
            .commands
            .into_iter()
            .filter_map(|c| match c.command {
                DrawCommand::Polyline { points, .. } => Some(points),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_lines_stay_inside_field() {
        let lines = grid_lines(83.8, -5.4, 2.0);
        assert!(lines.len() >= 4);
        for line in &lines {
            assert!(line.iter().all(|p| libm::hypot(p.0, p.1) <= 90.0 + 1e-6));
        }
    }

    #[test]
    fn test_grid_around_pole() {
        let lines = grid_lines(0.0, 89.0, 5.0);
        assert!(!lines.is_empty());
    }
}
