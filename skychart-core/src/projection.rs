//! Gnomonic (tangent-plane) projection onto the chart plane.
//!
//! The sphere is projected onto the plane tangent at the field centre, then
//! the planar coordinates go through the field's [`Orientation`]:
//!
//! 1. tangent-plane standard coordinates `(ξ, η)`, ξ towards east
//! 2. `x = -ξ`, `y = η` (east on the left, as seen on the sky)
//! 3. mirror: negate `x` and/or `y`
//! 4. rotate counter-clockwise by `orientation.rotation`
//! 5. scale by `width / (2 · tan(radius))` to millimetres
//!
//! With that scale the field radius lands exactly on `width / 2`.
//!
//! Projection never fails for finite input. Points outside the field, or
//! behind the tangent plane, come back with `valid == false` and callers
//! must check the flag before drawing.

use crate::constants::HALF_PI;
use crate::field::{Field, SkyPoint};
use crate::math::angular_separation;

/// Points with `cos(c)` at or below this are treated as behind the viewer.
const BEHIND_EPSILON: f64 = 1e-9;

/// Slack on the field-radius test so the boundary itself is inside.
const FIELD_EPSILON: f64 = 1e-12;

/// Offset used to find the local north direction.
const NORTH_STEP: f64 = 1e-5;

/// A chart-plane position in millimetres relative to the drawing centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    pub x: f64,
    pub y: f64,
    pub valid: bool,
}

impl ProjectedPoint {
    pub const INVALID: Self = Self {
        x: 0.0,
        y: 0.0,
        valid: false,
    };

    #[inline]
    fn at(x: f64, y: f64) -> Self {
        Self { x, y, valid: true }
    }

    #[inline]
    pub fn xy(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// Precomputed projection for one field and drawing width.
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    field: Field,
    scale: f64,
    sin_dec0: f64,
    cos_dec0: f64,
    sin_rot: f64,
    cos_rot: f64,
}

struct Tangent {
    xi_num: f64,
    eta_num: f64,
    cos_c: f64,
}

impl Projector {
    pub fn new(field: &Field, width_mm: f64) -> Self {
        let (sin_dec0, cos_dec0) = libm::sincos(field.center().dec);
        let (sin_rot, cos_rot) = libm::sincos(field.orientation().rotation);
        Self {
            field: *field,
            scale: width_mm / (2.0 * libm::tan(field.radius())),
            sin_dec0,
            cos_dec0,
            sin_rot,
            cos_rot,
        }
    }

    #[inline]
    pub fn field(&self) -> &Field {
        &self.field
    }

    /// Millimetres per unit of tangent-plane coordinate.
    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Radius of the field boundary circle in millimetres (half the drawing width).
    #[inline]
    pub fn field_radius_mm(&self) -> f64 {
        self.scale * libm::tan(self.field.radius())
    }

    /// Length on the chart of an angle measured from the field centre.
    #[inline]
    pub fn angle_to_mm(&self, angle: f64) -> f64 {
        self.scale * libm::tan(angle)
    }

    fn tangent(&self, p: SkyPoint) -> Tangent {
        let d_ra = p.ra - self.field.center().ra;
        let (sin_d_ra, cos_d_ra) = libm::sincos(d_ra);
        let (sin_dec, cos_dec) = libm::sincos(p.dec);
        Tangent {
            xi_num: cos_dec * sin_d_ra,
            eta_num: self.cos_dec0 * sin_dec - self.sin_dec0 * cos_dec * cos_d_ra,
            cos_c: self.sin_dec0 * sin_dec + self.cos_dec0 * cos_dec * cos_d_ra,
        }
    }

    fn to_chart(&self, xi: f64, eta: f64) -> (f64, f64) {
        let orientation = self.field.orientation();
        let mut x = -xi;
        let mut y = eta;
        if orientation.mirror_x {
            x = -x;
        }
        if orientation.mirror_y {
            y = -y;
        }
        let xr = x * self.cos_rot - y * self.sin_rot;
        let yr = x * self.sin_rot + y * self.cos_rot;
        (xr * self.scale, yr * self.scale)
    }

    /// Projects `p`, marking it invalid when it lies outside the field radius.
    pub fn project(&self, p: SkyPoint) -> ProjectedPoint {
        if !p.is_valid() {
            return ProjectedPoint::INVALID;
        }
        if angular_separation(self.field.center(), p) > self.field.radius() + FIELD_EPSILON {
            return ProjectedPoint::INVALID;
        }
        self.project_unbounded(p)
    }

    /// Projects `p` without the field-radius test.
    ///
    /// Only points at or behind 90° from the centre are invalid. Line work that
    /// is clipped to the field circle afterwards uses this.
    pub fn project_unbounded(&self, p: SkyPoint) -> ProjectedPoint {
        if !p.is_valid() {
            return ProjectedPoint::INVALID;
        }
        let t = self.tangent(p);
        if t.cos_c <= BEHIND_EPSILON {
            return ProjectedPoint::INVALID;
        }
        let (x, y) = self.to_chart(t.xi_num / t.cos_c, t.eta_num / t.cos_c);
        ProjectedPoint::at(x, y)
    }

    /// Projects `p` and pulls anything further than `far_mm` (including
    /// points behind the viewer) onto the circle of radius `far_mm`, keeping
    /// its direction from the centre.
    ///
    /// Used for polygons and polylines that are clipped to the field
    /// afterwards, so a vertex behind the viewer still points the right way.
    pub fn project_clamped(&self, p: SkyPoint, far_mm: f64) -> (f64, f64) {
        let t = self.tangent(p);
        if t.cos_c > BEHIND_EPSILON {
            let (x, y) = self.to_chart(t.xi_num / t.cos_c, t.eta_num / t.cos_c);
            if libm::hypot(x, y) <= far_mm {
                return (x, y);
            }
        }
        let (dx, dy) = self.to_chart(t.xi_num, t.eta_num);
        let len = libm::hypot(dx, dy);
        if len == 0.0 {
            return (far_mm, 0.0);
        }
        (dx / len * far_mm, dy / len * far_mm)
    }

    /// Unit vectors on the chart pointing to celestial north and east at `p`.
    ///
    /// Returns `None` when `p` or one of its neighbours cannot be projected.
    pub fn local_axes(&self, p: SkyPoint) -> Option<([f64; 2], [f64; 2])> {
        let here = self.project_unbounded(p);
        if !here.valid {
            return None;
        }
        let (step, sign) = if p.dec + NORTH_STEP <= HALF_PI {
            (NORTH_STEP, 1.0)
        } else {
            (-NORTH_STEP, -1.0)
        };
        let north = self.project_unbounded(SkyPoint::new(p.ra, p.dec + step));
        let east = self.project_unbounded(SkyPoint::new(
            p.ra + NORTH_STEP / libm::cos(p.dec).max(NORTH_STEP),
            p.dec,
        ));
        if !north.valid || !east.valid {
            return None;
        }
        let unit = |dx: f64, dy: f64| {
            let len = libm::hypot(dx, dy);
            (len > 0.0).then(|| [dx / len, dy / len])
        };
        Some((
            unit(sign * (north.x - here.x), sign * (north.y - here.y))?,
            unit(east.x - here.x, east.y - here.y)?,
        ))
    }

    /// Direction of celestial north at `p` on the chart, radians counter-clockwise from `+x`.
    pub fn north_angle(&self, p: SkyPoint) -> Option<f64> {
        let (north, _) = self.local_axes(p)?;
        Some(libm::atan2(north[1], north[0]))
    }
}

/// Projects a single point onto a drawing `width_mm` wide.
///
/// Convenience wrapper around [`Projector`] for one-off projections.
pub fn project(field: &Field, width_mm: f64, point: SkyPoint) -> ProjectedPoint {
    Projector::new(field, width_mm).project(point)
}
