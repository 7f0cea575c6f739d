//! One chart per Messier object.
//!
//! Charts are independent, so they are rendered with rayon against the shared
//! store. A failing chart is logged and reported; it never stops the others.
//! The optional stop flag is checked before each chart starts, so a stopped
//! batch finishes the charts already in flight and skips the rest.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use skychart_catalog::CatalogStore;
use skychart_core::format;

use crate::backend::{supports_extension, write_chart};
use crate::draw::Chart;
use crate::engine::{ChartEngine, ChartRequest};
use crate::error::{ChartError, ChartResult, SinkError};
use crate::selection::SelectionParams;

/// Pseudo-designation that asks for the whole Messier batch.
pub const ALL_MESSIER: &str = "allmessier";

#[derive(Debug, Clone, PartialEq)]
pub struct BatchOptions {
    pub output_dir: PathBuf,
    /// Output format, e.g. `svg`.
    pub extension: String,
    /// Field radius of every chart, radians.
    pub radius: f64,
    pub selection: SelectionParams,
    /// Worker threads; `0` uses the global rayon pool.
    pub threads: usize,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    /// Written files, in Messier order.
    pub rendered: Vec<PathBuf>,
    /// Designation and error of every chart that failed.
    pub failed: Vec<(String, ChartError)>,
    /// Charts not started because the batch was stopped.
    pub skipped: usize,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.skipped == 0
    }
}

enum Outcome {
    Rendered(PathBuf),
    Failed(String, ChartError),
    Skipped,
}

pub fn is_batch_designation(source: &str) -> bool {
    source.trim().eq_ignore_ascii_case(ALL_MESSIER)
}

/// `m{number}.{extension}`.
pub fn batch_file_name(number: u32, extension: &str) -> String {
    format::batch_file_name("M", &number.to_string(), extension)
}

/// One request per Messier number, sorted by number.
pub fn messier_requests(store: &CatalogStore, radius: f64, selection: &SelectionParams) -> Vec<(u32, ChartRequest)> {
    store
        .messier_objects()
        .into_iter()
        .filter_map(|id| {
            let object = store.deepsky_object(id);
            let number = object.messier_number()?;
            let request = ChartRequest::object(object.designation(), radius).with_selection(selection.clone());
            Some((number, request))
        })
        .collect()
}

fn with_pool<T: Send>(threads: usize, work: impl FnOnce() -> T + Send) -> T {
    if threads == 0 {
        return work();
    }
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(work),
        Err(e) => {
            log::warn!("could not build a {threads}-thread pool ({e}), using the global pool");
            work()
        }
    }
}

/// Lays out every Messier chart in memory, in Messier order.
pub fn render_messier_charts(
    engine: &ChartEngine<'_>,
    radius: f64,
    selection: &SelectionParams,
) -> Vec<(u32, ChartResult<Chart>)> {
    messier_requests(engine.store(), radius, selection)
        .par_iter()
        .map(|(number, request)| (*number, engine.chart_for(request)))
        .collect()
}

/// Renders every Messier object into `options.output_dir`.
///
/// # Errors
/// Only for problems that would fail every chart: an output format no
/// backend supports, or an output directory that cannot be created.
pub fn render_messier_batch(
    engine: &ChartEngine<'_>,
    options: &BatchOptions,
    stop: Option<&AtomicBool>,
) -> ChartResult<BatchReport> {
    if !supports_extension(&options.extension) {
        let example = options.output_dir.join(batch_file_name(1, &options.extension));
        return Err(SinkError::unsupported(&example).into());
    }
    std::fs::create_dir_all(&options.output_dir).map_err(|e| SinkError::io(&options.output_dir, e))?;

    let requests = messier_requests(engine.store(), options.radius, &options.selection);
    log::info!(
        "rendering {} Messier charts into {}",
        requests.len(),
        options.output_dir.display()
    );

    let outcomes: Vec<Outcome> = with_pool(options.threads, || {
        requests
            .par_iter()
            .map(|(number, request)| {
                if stop.is_some_and(|s| s.load(Ordering::Relaxed)) {
                    return Outcome::Skipped;
                }
                let designation = format!("M {number}");
                let path = options.output_dir.join(batch_file_name(*number, &options.extension));
                let result = engine
                    .chart_for(request)
                    .and_then(|chart| Ok(write_chart(&chart, &path)?));
                match result {
                    Ok(()) => Outcome::Rendered(path),
                    Err(e) => {
                        log::warn!("{designation}: {e}");
                        Outcome::Failed(designation, e)
                    }
                }
            })
            .collect()
    });

    let mut report = BatchReport::default();
    for outcome in outcomes {
        match outcome {
            Outcome::Rendered(path) => report.rendered.push(path),
            Outcome::Failed(designation, e) => report.failed.push((designation, e)),
            Outcome::Skipped => report.skipped += 1,
        }
    }
    log::info!(
        "batch done: {} rendered, {} failed, {} skipped",
        report.rendered.len(),
        report.failed.len(),
        report.skipped
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartConfig;
    use skychart_catalog::deepsky::parse_deepsky;
    use skychart_catalog::CatalogParts;
    use std::path::Path;

    const MESSIER: &str = "NGC;1976;N;05:35:17.3;-05:23:28;ORI;4.0;85;60;;\n\
                           M;42;N;05:35:17.3;-05:23:28;ORI;4.0;85;60;;NGC 1976\n\
                           M;31;G;00:42:44.3;+41:16:09;AND;3.4;190;60;35;\n\
                           M;1;SNR;05:34:31.9;+22:00:52;TAU;8.4;6;4;;\n";

    fn store() -> CatalogStore {
        CatalogStore::from_parts(CatalogParts {
            deepsky: parse_deepsky(Path::new("deepsky.txt"), MESSIER).unwrap(),
            ..CatalogParts::default()
        })
        .unwrap()
    }

    #[test]
    fn test_file_names() {
        assert_eq!(batch_file_name(31, "svg"), "m31.svg");
        assert_eq!(batch_file_name(1, ".png"), "m1.png");
        assert!(is_batch_designation(" AllMessier "));
        assert!(!is_batch_designation("M 31"));
    }

    #[test]
    fn test_requests_sorted_by_number() {
        let store = store();
        let numbers: Vec<u32> = messier_requests(&store, 0.02, &SelectionParams::default())
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(numbers, vec![1, 31, 42]);
    }

    #[test]
    fn test_charts_carry_their_captions() {
        let store = store();
        let engine = ChartEngine::new(&store, ChartConfig::default());
        let charts = render_messier_charts(&engine, 0.02, &SelectionParams::default());
        let captions: Vec<String> = charts
            .into_iter()
            .map(|(_, chart)| chart.unwrap().caption.unwrap())
            .collect();
        assert_eq!(captions, vec!["M 1", "M 31", "M 42"]);
    }

    #[test]
    fn test_stop_flag_skips_everything() {
        let store = store();
        let engine = ChartEngine::new(&store, ChartConfig::default());
        let dir = tempfile::tempdir().unwrap();
        let options = BatchOptions {
            output_dir: dir.path().join("charts"),
            extension: "svg".to_string(),
            radius: 0.02,
            selection: SelectionParams::default(),
            threads: 1,
        };
        let stop = AtomicBool::new(true);
        let report = render_messier_batch(&engine, &options, Some(&stop)).unwrap();
        assert_eq!(report.skipped, 3);
        assert!(report.rendered.is_empty());
        assert!(!report.is_complete());
    }

    #[test]
    fn test_unsupported_format_fails_up_front() {
        let store = store();
        let engine = ChartEngine::new(&store, ChartConfig::default());
        let dir = tempfile::tempdir().unwrap();
        let options = BatchOptions {
            output_dir: dir.path().to_path_buf(),
            extension: "pdf".to_string(),
            radius: 0.02,
            selection: SelectionParams::default(),
            threads: 0,
        };
        let err = render_messier_batch(&engine, &options, None).unwrap_err();
        assert!(matches!(err, ChartError::Sink(SinkError::UnsupportedFormat { .. })));
        assert!(err.to_string().contains("m1.pdf"));
    }
}
