//! File-resident catalogs for finder charts.
//!
//! Everything a chart draws comes from a [`CatalogStore`] loaded once per
//! run: stars from a memory-mapped binary file, deep-sky objects with their
//! alias links resolved, constellation figures and boundaries, Milky Way
//! contours and Bayer names. Stars and deep-sky objects are bucketed in a
//! HEALPix index so a field query only touches nearby records.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`stars`] | `stars.bin` reader/writer, [`StarRecord`], proper motion |
//! | [`deepsky`] | `deepsky.txt` parser, [`DeepSkyObject`], master linking |
//! | [`constellations`] | Constellation line and boundary segments |
//! | [`milkyway`] | Milky Way contour polygons |
//! | [`names`] | Bayer star names and Greek labels |
//! | [`index`] | HEALPix field index, magnitude-sorted buckets |
//! | [`store`] | [`CatalogStore`], [`CatalogPaths`], override merging |
//!
//! # Quick Start
//!
//! ```ignore
//! use skychart_catalog::{CatalogPaths, CatalogStore};
//! use skychart_core::SkyPoint;
//!
//! let store = CatalogStore::load(&CatalogPaths::new("data"))?;
//! let m42 = store.lookup("M 42").expect("M 42 in catalog");
//! let centre = store.deepsky_object(m42).position;
//! let stars = store.stars_in_field(centre, 0.02, Some(12.0), None);
//! ```
//!
//! # Data directory
//!
//! | File | Required |
//! |------|----------|
//! | `stars.bin` | yes |
//! | `deepsky.txt` | yes |
//! | `constellation_lines.txt` | no |
//! | `constellation_boundaries.txt` | no |
//! | `milkyway.txt` | no |
//! | `star_names.txt` | no |
//!
//! Text files accept blank lines and `#` comments.

pub mod constellations;
pub mod deepsky;
pub mod error;
pub mod index;
pub mod milkyway;
pub mod names;
pub mod stars;
pub mod store;
mod text;

pub use constellations::{ConstellationSegments, Segment};
pub use deepsky::{normalize_designation, DeepSkyEntry, DeepSkyId, DeepSkyObject, DeepSkyType};
pub use error::{CatalogError, CatalogResult};
pub use milkyway::MilkyWayContour;
pub use names::StarName;
pub use stars::{read_star_catalog, write_star_catalog, StarCatalogHeader, StarRecord};
pub use store::{CatalogParts, CatalogPaths, CatalogStore, FieldStar};
