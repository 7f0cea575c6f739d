//! Chart requests against a loaded catalog store.
//!
//! A [`ChartEngine`] borrows the store immutably, so any number of engines
//! (or one engine shared across threads) can render charts at once.

use serde::{Deserialize, Serialize};
use skychart_catalog::CatalogStore;
use skychart_core::{Field, SkyPoint};

use crate::config::ChartConfig;
use crate::draw::Chart;
use crate::error::{ChartError, ChartResult};
use crate::layout::render;
use crate::selection::{select_in_field, ExtraMarker, Selection, SelectionParams};

/// Where a chart is centred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChartCenter {
    Coordinates(SkyPoint),
    /// A deep-sky designation such as `M 31` or `ngc224`.
    Designation(String),
}

/// One chart to draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRequest {
    pub center: ChartCenter,
    /// Field radius, radians.
    pub radius: f64,
    pub selection: SelectionParams,
    /// Overrides the designation caption and the configured one.
    pub caption: Option<String>,
    pub extra_markers: Vec<ExtraMarker>,
}

impl ChartRequest {
    pub fn at(center: SkyPoint, radius: f64) -> Self {
        Self {
            center: ChartCenter::Coordinates(center),
            radius,
            selection: SelectionParams::default(),
            caption: None,
            extra_markers: Vec::new(),
        }
    }

    pub fn object(designation: impl Into<String>, radius: f64) -> Self {
        Self {
            center: ChartCenter::Designation(designation.into()),
            ..Self::at(SkyPoint::new(0.0, 0.0), radius)
        }
    }

    pub fn with_selection(mut self, selection: SelectionParams) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn with_marker(mut self, marker: ExtraMarker) -> Self {
        self.extra_markers.push(marker);
        self
    }
}

#[derive(Debug, Clone)]
pub struct ChartEngine<'a> {
    store: &'a CatalogStore,
    config: ChartConfig,
}

impl<'a> ChartEngine<'a> {
    pub fn new(store: &'a CatalogStore, config: ChartConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &'a CatalogStore {
        self.store
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Sky position of `center` and, for a designation, its caption.
    ///
    /// # Errors
    /// [`ChartError::ObjectNotFound`] when no catalog record answers to the designation.
    pub fn resolve(&self, center: &ChartCenter) -> ChartResult<(SkyPoint, Option<String>)> {
        match center {
            ChartCenter::Coordinates(p) => Ok((*p, None)),
            ChartCenter::Designation(designation) => {
                let id = self
                    .store
                    .lookup(designation)
                    .ok_or_else(|| ChartError::object_not_found(designation.as_str()))?;
                let object = self.store.deepsky_object(id);
                let position = self.store.deepsky_object(self.store.canonical(id)).position;
                Ok((position, Some(object.designation())))
            }
        }
    }

    /// Field for a resolved centre, oriented as configured.
    pub fn field_for(&self, center: SkyPoint, radius: f64) -> ChartResult<Field> {
        Ok(Field::new(center.ra, center.dec, radius)?.with_orientation(self.config.orientation())?)
    }

    /// Field, selection and caption for `request`, without laying anything out.
    pub fn selection_for(&self, request: &ChartRequest) -> ChartResult<(Field, Selection<'a>, Option<String>)> {
        let (center, designation) = self.resolve(&request.center)?;
        let field = self.field_for(center, request.radius)?;
        let mut selection = select_in_field(self.store, &request.selection, &field);
        selection.extra_markers = request.extra_markers.clone();
        let caption = request
            .caption
            .clone()
            .or(designation)
            .or_else(|| self.config.caption.clone());
        Ok((field, selection, caption))
    }

    /// Selects and lays out one chart.
    ///
    /// # Errors
    /// [`ChartError::ObjectNotFound`] for an unknown designation,
    /// [`ChartError::InvalidField`] for a degenerate radius or centre.
    pub fn chart_for(&self, request: &ChartRequest) -> ChartResult<Chart> {
        let (field, selection, caption) = self.selection_for(request)?;
        let config = ChartConfig {
            caption,
            ..self.config.clone()
        };
        let chart = render(&selection, &field, &config);
        log::debug!(
            "chart {}: {} stars, {} deep-sky objects, {} labels",
            config.caption.as_deref().unwrap_or("(uncaptioned)"),
            chart.stats.stars,
            chart.stats.deepsky,
            chart.stats.labels
        );
        Ok(chart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skychart_catalog::deepsky::parse_deepsky;
    use skychart_catalog::CatalogParts;
    use skychart_core::FieldError;
    use std::path::Path;

    const CATALOG: &str = "NGC;1976;N;05:35:17.3;-05:23:28;ORI;4.0;85;60;;\n\
                           M;42;N;05:35:17.3;-05:23:28;ORI;4.0;85;60;;NGC 1976\n";

    fn store() -> CatalogStore {
        CatalogStore::from_parts(CatalogParts {
            deepsky: parse_deepsky(Path::new("deepsky.txt"), CATALOG).unwrap(),
            ..CatalogParts::default()
        })
        .unwrap()
    }

    #[test]
    fn test_resolve_designation() {
        let store = store();
        let engine = ChartEngine::new(&store, ChartConfig::default());
        let (p, caption) = engine
            .resolve(&ChartCenter::Designation("m42".to_string()))
            .unwrap();
        assert!((p.ra.to_degrees() - 83.8221).abs() < 1e-3);
        assert_eq!(caption.as_deref(), Some("M 42"));

        let err = engine
            .resolve(&ChartCenter::Designation("M 43".to_string()))
            .unwrap_err();
        assert!(matches!(err, ChartError::ObjectNotFound { ref designation } if designation == "M 43"));
    }

    #[test]
    fn test_caption_precedence() {
        let store = store();
        let config = ChartConfig {
            caption: Some("configured".to_string()),
            ..ChartConfig::default()
        };
        let engine = ChartEngine::new(&store, config);
        let radius = 1f64.to_radians();

        let (_, _, caption) = engine.selection_for(&ChartRequest::object("NGC 1976", radius)).unwrap();
        assert_eq!(caption.as_deref(), Some("NGC 1976"));
        let request = ChartRequest::object("NGC 1976", radius).with_caption("Orion");
        assert_eq!(engine.chart_for(&request).unwrap().caption.as_deref(), Some("Orion"));
        let at = ChartRequest::at(SkyPoint::from_degrees(10.0, 10.0), radius);
        assert_eq!(engine.chart_for(&at).unwrap().caption.as_deref(), Some("configured"));
    }

    #[test]
    fn test_invalid_radius() {
        let store = store();
        let engine = ChartEngine::new(&store, ChartConfig::default());
        let err = engine
            .chart_for(&ChartRequest::at(SkyPoint::new(0.0, 0.0), 0.0))
            .unwrap_err();
        assert!(matches!(err, ChartError::InvalidField(FieldError::InvalidRadius { .. })));
        assert!(!err.is_fatal());
    }
}
