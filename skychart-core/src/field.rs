//! Sky positions and the chart field.
//!
//! A [`Field`] is created once per chart request and never changes while the
//! chart is rendered. It fixes the projection origin (the centre), the
//! angular radius that maps to the drawing edge, and the [`Orientation`]
//! flags applied after projection.

use serde::{Deserialize, Serialize};

use crate::angle::wrap_0_2pi;
use crate::constants::{DEG_TO_RAD, HALF_PI};
use crate::errors::{FieldError, FieldResult};
use crate::math::angular_separation;

/// A position on the celestial sphere in radians.
///
/// [`SkyPoint::new`] wraps right ascension into `[0, 2π)`; declination is
/// stored as given and checked by the consumers that care (catalog loading,
/// [`Field::new`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyPoint {
    pub ra: f64,
    pub dec: f64,
}

impl SkyPoint {
    #[inline]
    pub fn new(ra: f64, dec: f64) -> Self {
        Self {
            ra: wrap_0_2pi(ra),
            dec,
        }
    }

    #[inline]
    pub fn from_degrees(ra_deg: f64, dec_deg: f64) -> Self {
        Self::new(ra_deg * DEG_TO_RAD, dec_deg * DEG_TO_RAD)
    }

    /// True when both coordinates are finite and the declination is within the poles.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.ra.is_finite() && self.dec.is_finite() && self.dec.abs() <= HALF_PI
    }
}

/// Post-projection transforms of the chart plane.
///
/// Mirroring negates the planar axis after projection; `rotation` (radians,
/// counter-clockwise) is applied after mirroring and before scaling to
/// millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Orientation {
    pub mirror_x: bool,
    pub mirror_y: bool,
    pub rotation: f64,
}

/// The sky region depicted by one chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    center: SkyPoint,
    radius: f64,
    orientation: Orientation,
}

impl Field {
    /// Creates a field centred on `(ra, dec)` with angular `radius`, all in radians.
    ///
    /// # Errors
    /// - [`FieldError::NotFinite`] if any argument is NaN or infinite.
    /// - [`FieldError::InvalidCenter`] if `|dec| > π/2`.
    /// - [`FieldError::InvalidRadius`] if `radius <= 0` or `radius >= π/2`
    ///   (the tangent-plane projection cannot reach 90° from its centre).
    pub fn new(ra: f64, dec: f64, radius: f64) -> FieldResult<Self> {
        if !ra.is_finite() {
            return Err(FieldError::not_finite("ra"));
        }
        if !dec.is_finite() {
            return Err(FieldError::not_finite("dec"));
        }
        if !radius.is_finite() {
            return Err(FieldError::not_finite("radius"));
        }
        if dec.abs() > HALF_PI {
            return Err(FieldError::invalid_center(
                "dec",
                dec,
                "declination outside [-pi/2, pi/2]",
            ));
        }
        if radius <= 0.0 {
            return Err(FieldError::invalid_radius(radius, "radius must be positive"));
        }
        if radius >= HALF_PI {
            return Err(FieldError::invalid_radius(
                radius,
                "radius must be below pi/2 for a gnomonic chart",
            ));
        }
        Ok(Self {
            center: SkyPoint::new(ra, dec),
            radius,
            orientation: Orientation::default(),
        })
    }

    /// Same field with the given mirror/rotation flags.
    pub fn with_orientation(mut self, orientation: Orientation) -> FieldResult<Self> {
        if !orientation.rotation.is_finite() {
            return Err(FieldError::not_finite("rotation"));
        }
        self.orientation = orientation;
        Ok(self)
    }

    #[inline]
    pub fn center(&self) -> SkyPoint {
        self.center
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// True when `p` is no further than the field radius from the centre.
    #[inline]
    pub fn contains(&self, p: SkyPoint) -> bool {
        angular_separation(self.center, p) <= self.radius
    }
}
