//! CLI argument definitions for skychart

use clap::Parser;
use skychart_engine::Language;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "skychart")]
#[command(about = "Render astronomical finder charts")]
#[command(version)]
pub struct Cli {
    /// Designations (`M31`, `"NGC 224"`), `ra_deg,dec_deg` pairs, or `allmessier`
    #[arg(required = true)]
    pub sources: Vec<String>,

    /// Catalog data directory
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Directory whose catalog files override entries in the data directory
    #[arg(long)]
    pub override_dir: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Output format: svg, or png when built with the `png` feature
    #[arg(short, long, default_value = "svg")]
    pub format: String,

    /// Field diameter in degrees
    #[arg(long, default_value = "7.0")]
    pub fieldsize: f64,

    /// Faintest star magnitude drawn
    #[arg(long, default_value = "13.8")]
    pub star_limit: f64,

    /// Faintest deep-sky magnitude drawn
    #[arg(long, default_value = "12.5")]
    pub deepsky_limit: f64,

    /// Draw Messier objects regardless of magnitude
    #[arg(long)]
    pub force_messier: bool,

    /// Draw asterisms regardless of magnitude
    #[arg(long)]
    pub force_asterisms: bool,

    /// Draw deep-sky objects without a known magnitude
    #[arg(long)]
    pub force_unknown: bool,

    /// Catalogs to draw besides NGC, IC and M (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub extra_catalogs: Vec<String>,

    /// Julian year to move stars with proper motion to
    #[arg(long)]
    pub epoch: Option<f64>,

    /// Extra marker `ra_deg,dec_deg,label`; may be repeated
    #[arg(long = "marker")]
    pub markers: Vec<String>,

    /// Chart style as JSON
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Caption above every chart, instead of the object designation
    #[arg(long)]
    pub caption: Option<String>,

    /// Drawing width in millimetres
    #[arg(long)]
    pub width: Option<f64>,

    /// Mirror east-west
    #[arg(long)]
    pub mirror_x: bool,

    /// Mirror north-south
    #[arg(long)]
    pub mirror_y: bool,

    /// Chart rotation in degrees, counter-clockwise
    #[arg(long)]
    pub rotation: Option<f64>,

    /// White on black instead of black on white
    #[arg(long)]
    pub invert_colors: bool,

    /// Chart language: en or nl
    #[arg(long)]
    pub language: Option<Language>,

    /// Number of threads for batch rendering (0 = all cores)
    #[arg(long, default_value = "0")]
    pub threads: usize,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
