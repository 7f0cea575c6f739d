//! Spherical geometry for finder charts.
//!
//! `skychart-core` holds the pure math shared by the catalog store and the
//! chart engine: sexagesimal conversions, angular separation, the chart
//! [`Field`], and the gnomonic projection that maps sky positions onto the
//! drawing plane in millimetres.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`angle`] | HMS/DMS ↔ radians, sexagesimal string parsing, RA wrapping |
//! | [`math`] | Unit vectors and numerically stable angular separation |
//! | [`field`] | [`SkyPoint`], [`Field`] and its [`Orientation`] (mirror/rotation) |
//! | [`projection`] | [`Projector`], [`ProjectedPoint`], [`project`] |
//! | [`format`] | Caption text: coordinates, magnitudes, scale labels, file names |
//! | [`constants`] | Unit conversion constants |
//! | [`errors`] | [`FieldError`], [`AngleError`] |
//!
//! # Conventions
//!
//! - All angles are radians. Right ascension is stored in `[0, 2π)`,
//!   declination in `[-π/2, π/2]`.
//! - Chart-plane coordinates are millimetres relative to the drawing centre,
//!   `x` to the right and `y` up. East is on the left unless the field is
//!   mirrored.
//!
//! ```
//! use skychart_core::{project, Field, SkyPoint};
//!
//! let field = Field::new(0.0, 0.0, 0.1).unwrap();
//! let centre = project(&field, 180.0, SkyPoint::new(0.0, 0.0));
//! assert!(centre.valid);
//! assert!(centre.x.abs() < 1e-12 && centre.y.abs() < 1e-12);
//! ```

pub mod angle;
pub mod constants;
pub mod errors;
pub mod field;
pub mod format;
pub mod math;
pub mod projection;

pub use angle::Sign;
pub use errors::{AngleError, FieldError, FieldResult};
pub use field::{Field, Orientation, SkyPoint};
pub use math::angular_separation;
pub use projection::{project, ProjectedPoint, Projector};
