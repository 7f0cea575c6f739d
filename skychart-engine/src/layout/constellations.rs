//! Constellation figures and boundaries.
//!
//! Segments are great-circle arcs, which the gnomonic projection maps to
//! straight lines, so each one is drawn as a single clipped line. An end
//! beyond the tangent plane's horizon is first pulled back along the arc.

use skychart_catalog::Segment;
use skychart_core::math::unit_vector;
use skychart_core::{Projector, SkyPoint};

use super::clip::clip_segment;
use super::Canvas;
use crate::draw::{Pen, Point};

/// Halvings used to find where an arc crosses the usable hemisphere.
const BISECTIONS: usize = 48;

/// Splits allowed when both ends of an arc are beyond the horizon.
const MAX_SPLITS: usize = 3;

type Vec3 = [f64; 3];

fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Normalised point at `t` between `a` and `b`, on the shorter arc.
fn along(a: Vec3, b: Vec3, t: f64) -> Vec3 {
    let v = [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ];
    let len = libm::sqrt(dot(v, v));
    if len == 0.0 {
        return a;
    }
    [v[0] / len, v[1] / len, v[2] / len]
}

fn to_sky(v: Vec3) -> SkyPoint {
    SkyPoint::new(libm::atan2(v[1], v[0]), libm::asin(v[2].clamp(-1.0, 1.0)))
}

struct ArcProjector<'a> {
    projector: &'a Projector,
    center: Vec3,
    threshold: f64,
}

impl ArcProjector<'_> {
    fn point(&self, v: Vec3) -> Option<Point> {
        let p = self.projector.project_unbounded(to_sky(v));
        p.valid.then(|| p.xy())
    }

    /// The last point on the arc from `front` towards `back` still above the threshold.
    fn horizon(&self, front: Vec3, back: Vec3) -> Vec3 {
        let (mut lo, mut hi) = (0.0, 1.0);
        for _ in 0..BISECTIONS {
            let mid = (lo + hi) / 2.0;
            if dot(along(front, back, mid), self.center) >= self.threshold {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        along(front, back, lo)
    }

    fn arc(&self, a: Vec3, b: Vec3, splits: usize) -> Option<(Point, Point)> {
        let front_a = dot(a, self.center) >= self.threshold;
        let front_b = dot(b, self.center) >= self.threshold;
        match (front_a, front_b) {
            (true, true) => Some((self.point(a)?, self.point(b)?)),
            (true, false) => Some((self.point(a)?, self.point(self.horizon(a, b))?)),
            (false, true) => Some((self.point(self.horizon(b, a))?, self.point(b)?)),
            (false, false) if splits > 0 => {
                let m = along(a, b, 0.5);
                if dot(m, self.center) >= self.threshold {
                    let (start, _) = self.arc(a, m, splits - 1)?;
                    let (_, end) = self.arc(m, b, splits - 1)?;
                    Some((start, end))
                } else {
                    None
                }
            }
            (false, false) => None,
        }
    }
}

/// Projects the arc `start`-`end`, trimmed to where it can be drawn.
pub fn project_segment(projector: &Projector, segment: &Segment) -> Option<(Point, Point)> {
    let field = projector.field();
    let arcs = ArcProjector {
        projector,
        center: unit_vector(field.center()),
        threshold: libm::cos(field.radius()) / 2.0,
    };
    arcs.arc(unit_vector(segment.start), unit_vector(segment.end), MAX_SPLITS)
}

pub fn draw(canvas: &mut Canvas, projector: &Projector, segments: &[Segment], pen: Pen) {
    for segment in segments {
        let Some((a, b)) = project_segment(projector, segment) else {
            continue;
        };
        if let Some((a, b, _, _)) = clip_segment(a, b, canvas.radius()) {
            canvas.line(a, b, pen);
        }
    }
}
