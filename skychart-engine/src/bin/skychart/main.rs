//! skychart: finder charts from file-resident catalogs
//!
//! Loads the catalogs once, then renders one chart per source. A source that
//! cannot be charted is reported and skipped; the exit status is non-zero if
//! any chart failed.

mod cli;

use std::path::PathBuf;

use anyhow::{bail, ensure, Context};
use clap::Parser;
use cli::Cli;
use skychart_catalog::{CatalogPaths, CatalogStore};
use skychart_core::{format, SkyPoint};
use skychart_engine::batch::{self, BatchOptions};
use skychart_engine::{
    render_messier_batch, write_chart, ChartConfig, ChartEngine, ChartRequest, ExtraMarker, SelectionParams,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    configure_thread_pool(cli.threads)?;
    let config = load_config(&cli)?;

    let mut paths = CatalogPaths::new(&cli.data_dir);
    if let Some(dir) = &cli.override_dir {
        paths = paths.with_override(dir);
    }
    let store = CatalogStore::load(&paths)
        .with_context(|| format!("Failed to load catalogs from {}", cli.data_dir.display()))?;

    let engine = ChartEngine::new(&store, config);
    let selection = selection_params(&cli);
    let markers = cli
        .markers
        .iter()
        .map(String::as_str)
        .map(parse_marker)
        .collect::<anyhow::Result<Vec<_>>>()?;
    let radius = cli.fieldsize.to_radians() / 2.0;

    let mut failures = 0;
    for (index, source) in cli.sources.iter().enumerate() {
        if batch::is_batch_designation(source) {
            let options = BatchOptions {
                output_dir: cli.output_dir.clone(),
                extension: cli.format.clone(),
                radius,
                selection: selection.clone(),
                threads: 0,
            };
            let report = render_messier_batch(&engine, &options, None)?;
            for (designation, e) in &report.failed {
                log::error!("{designation}: {e}");
            }
            failures += report.failed.len();
            continue;
        }

        let request = match source_request(source, radius) {
            Ok(request) => request,
            Err(e) => {
                log::error!("{e:#}");
                failures += 1;
                continue;
            }
        };
        let request = ChartRequest {
            selection: selection.clone(),
            caption: cli.caption.clone(),
            extra_markers: markers.clone(),
            ..request
        };
        match render_one(&engine, &request, &output_path(&cli, source, index)) {
            Ok(path) => log::info!("wrote {}", path.display()),
            Err(e) => {
                log::error!("{source}: {e:#}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{failures} chart(s) failed");
    }
    Ok(())
}

fn resolve_threads(threads: usize) -> usize {
    if threads == 0 {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    } else {
        threads
    }
}

fn configure_thread_pool(threads: usize) -> anyhow::Result<()> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(resolve_threads(threads))
        .build_global()
        .ok();
    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<ChartConfig> {
    let mut config = match &cli.config {
        Some(path) => ChartConfig::from_json_file(path)?,
        None => ChartConfig::default(),
    };
    if let Some(width) = cli.width {
        ensure!(width.is_finite() && width > 0.0, "--width must be positive, got {width}");
        config.width_mm = width;
    }
    if let Some(rotation) = cli.rotation {
        ensure!(rotation.is_finite(), "--rotation must be finite");
        config.rotation_deg = rotation;
    }
    if let Some(language) = cli.language {
        config.language = language;
    }
    config.mirror_x |= cli.mirror_x;
    config.mirror_y |= cli.mirror_y;
    config.invert_colors |= cli.invert_colors;
    Ok(config)
}

fn selection_params(cli: &Cli) -> SelectionParams {
    SelectionParams {
        deepsky_mag_limit: cli.deepsky_limit,
        star_mag_limit: cli.star_limit,
        force_messier: cli.force_messier,
        force_asterisms: cli.force_asterisms,
        force_unknown_mag: cli.force_unknown,
        extra_catalogs: cli.extra_catalogs.clone(),
        epoch: cli.epoch,
    }
}

/// `ra_deg,dec_deg`, if `source` is a coordinate pair.
fn parse_coordinates(source: &str) -> Option<SkyPoint> {
    let (ra, dec) = source.split_once(',')?;
    let ra: f64 = ra.trim().parse().ok()?;
    let dec: f64 = dec.trim().parse().ok()?;
    Some(SkyPoint::from_degrees(ra, dec))
}

fn source_request(source: &str, radius: f64) -> anyhow::Result<ChartRequest> {
    if let Some(center) = parse_coordinates(source) {
        ensure!(center.is_valid(), "Invalid coordinates: {source}");
        return Ok(ChartRequest::at(center, radius));
    }
    ensure!(!source.contains(','), "Malformed coordinates: {source}");
    Ok(ChartRequest::object(source, radius))
}

fn parse_marker(text: &str) -> anyhow::Result<ExtraMarker> {
    let mut parts = text.splitn(3, ',');
    let (Some(ra), Some(dec), Some(label)) = (parts.next(), parts.next(), parts.next()) else {
        bail!("Marker must be ra_deg,dec_deg,label: {text}");
    };
    let ra: f64 = ra.trim().parse().with_context(|| format!("Bad marker RA in {text}"))?;
    let dec: f64 = dec.trim().parse().with_context(|| format!("Bad marker Dec in {text}"))?;
    Ok(ExtraMarker {
        position: SkyPoint::from_degrees(ra, dec),
        label: label.trim().to_string(),
    })
}

/// `m31.svg` for designations, `chart{n}.svg` for coordinate sources.
fn output_path(cli: &Cli, source: &str, index: usize) -> PathBuf {
    let name = if parse_coordinates(source).is_some() {
        format!("chart{}.{}", index + 1, cli.format)
    } else {
        format::batch_file_name("", source, &cli.format)
    };
    cli.output_dir.join(name)
}

fn render_one(engine: &ChartEngine<'_>, request: &ChartRequest, path: &std::path::Path) -> anyhow::Result<PathBuf> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let chart = engine.chart_for(request)?;
    write_chart(&chart, path)?;
    Ok(path.to_path_buf())
}
