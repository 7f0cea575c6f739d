//! Finder-chart selection, layout and output.
//!
//! A chart is built in three steps against a [`CatalogStore`](skychart_catalog::CatalogStore)
//! loaded once per run:
//!
//! 1. [`select_in_field`] picks the stars, deep-sky objects and overlays of
//!    one field, resolving catalog aliases to one object each.
//! 2. [`render`] projects the selection and lays it out as an ordered list of
//!    layered draw commands, a [`Chart`].
//! 3. A [`DrawingSink`] consumes the commands; [`write_chart`] picks an
//!    SVG (or, with the `png` feature, PNG) backend from the file extension.
//!
//! [`ChartEngine`] wraps the three steps for a [`ChartRequest`], and
//! [`batch`] runs them in parallel for every Messier object.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | [`ChartConfig`], colours, Milky Way fade |
//! | [`selection`] | Magnitude limits, force flags, alias merging |
//! | [`layout`] | Projection, clipping, symbols, labels, legend |
//! | [`draw`] | Draw commands and the [`Chart`] they form |
//! | [`sink`] | [`DrawingSink`] trait, [`RecordingSink`] |
//! | [`backend`] | plotters SVG/PNG output |
//! | [`engine`] | [`ChartEngine`], [`ChartRequest`] |
//! | [`batch`] | All-Messier batch rendering |
//!
//! # Quick Start
//!
//! ```ignore
//! use skychart_catalog::{CatalogPaths, CatalogStore};
//! use skychart_engine::{write_chart, ChartConfig, ChartEngine, ChartRequest};
//!
//! let store = CatalogStore::load(&CatalogPaths::new("data"))?;
//! let engine = ChartEngine::new(&store, ChartConfig::default());
//! let chart = engine.chart_for(&ChartRequest::object("M 42", 1f64.to_radians()))?;
//! write_chart(&chart, "m42.svg".as_ref())?;
//! ```

pub mod backend;
pub mod batch;
pub mod config;
pub mod draw;
pub mod engine;
pub mod error;
pub mod language;
pub mod layout;
pub mod selection;
pub mod sink;

pub use backend::{render_svg, write_chart};
pub use batch::{render_messier_batch, render_messier_charts, BatchOptions, BatchReport};
pub use config::{ChartConfig, MilkyWayFade, Rgb};
pub use draw::{Chart, DrawCommand, Layer, RenderStats};
pub use engine::{ChartCenter, ChartEngine, ChartRequest};
pub use error::{ChartError, ChartResult, SinkError};
pub use language::Language;
pub use layout::render;
pub use selection::{select, select_in_field, ExtraMarker, Selection, SelectionParams};
pub use sink::{replay, DrawingSink, RecordingSink};
