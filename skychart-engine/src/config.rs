//! Chart style configuration.
//!
//! [`ChartConfig`] is one immutable value per chart request. Every field has
//! a default, so a JSON file only needs the keys it changes:
//!
//! ```
//! use skychart_engine::ChartConfig;
//!
//! let config = ChartConfig::from_json_str(r#"{ "width_mm": 120, "language": "nl" }"#).unwrap();
//! assert_eq!(config.width_mm, 120.0);
//! assert!(config.show_grid);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use skychart_core::constants::DEG_TO_RAD;
use skychart_core::Orientation;

use crate::error::{ChartError, ChartResult};
use crate::language::Language;

/// An RGB colour with channels in `[0, 1]`, serialised as `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(level: f64) -> Self {
        Self::new(level, level, level)
    }

    /// The photographic negative, `1 - c` per channel.
    pub fn inverted(self) -> Self {
        Self::new(1.0 - self.r, 1.0 - self.g, 1.0 - self.b)
    }

    /// Channels as bytes, clamped to `[0, 255]`.
    pub fn to_bytes(self) -> [u8; 3] {
        let byte = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [byte(self.r), byte(self.g), byte(self.b)]
    }
}

impl From<[f64; 3]> for Rgb {
    fn from([r, g, b]: [f64; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Rgb> for [f64; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

/// Colour ramp for the enhanced Milky Way.
///
/// The tuple is `(bg_r, mw_r - bg_r, bg_g, mw_g - bg_g, bg_b, mw_b - bg_b)`,
/// so the same two colours always give the same fade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MilkyWayFade(pub [f64; 6]);

impl MilkyWayFade {
    pub fn derive(background: Rgb, milky_way: Rgb) -> Self {
        Self([
            background.r,
            milky_way.r - background.r,
            background.g,
            milky_way.g - background.g,
            background.b,
            milky_way.b - background.b,
        ])
    }

    /// Fill for a contour of `level` out of `max_level`.
    pub fn color(&self, level: u32, max_level: u32) -> Rgb {
        let [r, dr, g, dg, b, db] = self.0;
        let t = if max_level == 0 {
            1.0
        } else {
            f64::from(level.min(max_level)) / f64::from(max_level)
        };
        Rgb::new(r + t * dr, g + t * dg, b + t * db)
    }
}

/// Style and legend settings for one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartConfig {
    /// Drawing width in millimetres; the field circle spans it exactly.
    pub width_mm: f64,
    pub font_family: String,
    pub font_size_mm: f64,
    /// Legend text is `font_size_mm * legend_font_scale`.
    pub legend_font_scale: f64,
    pub language: Language,

    pub background: Rgb,
    pub draw_color: Rgb,
    pub label_color: Rgb,
    pub star_color: Rgb,
    pub dso_color: Rgb,
    pub constellation_line_color: Rgb,
    pub constellation_border_color: Rgb,
    pub grid_color: Rgb,
    pub milky_way_color: Rgb,
    /// Replace every colour by its negative on output, for a dark chart.
    pub invert_colors: bool,

    pub star_border_linewidth: f64,
    pub open_cluster_linewidth: f64,
    pub dso_linewidth: f64,
    pub legend_linewidth: f64,
    pub constellation_linewidth: f64,
    pub constellation_border_linewidth: f64,
    pub grid_linewidth: f64,
    pub milky_way_linewidth: f64,

    pub show_star_labels: bool,
    pub show_deepsky_labels: bool,
    pub show_constellation_lines: bool,
    pub show_constellation_borders: bool,
    pub show_milky_way: bool,
    pub enhanced_milky_way: bool,
    pub show_grid: bool,
    pub show_mag_scale: bool,
    pub show_map_scale: bool,
    pub show_orientation: bool,
    pub show_field_border: bool,
    pub show_coordinates: bool,
    pub show_dso_legend: bool,

    /// Deep-sky objects fainter than this are drawn without a label.
    pub deepsky_label_limit: f64,
    pub min_dso_radius_mm: f64,

    pub mirror_x: bool,
    pub mirror_y: bool,
    pub rotation_deg: f64,

    pub pixels_per_mm: f64,
    pub caption: Option<String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width_mm: 180.0,
            font_family: "sans-serif".to_string(),
            font_size_mm: 2.6,
            legend_font_scale: 1.8,
            language: Language::En,

            background: Rgb::WHITE,
            draw_color: Rgb::BLACK,
            label_color: Rgb::BLACK,
            star_color: Rgb::BLACK,
            dso_color: Rgb::BLACK,
            constellation_line_color: Rgb::new(0.2, 0.7, 1.0),
            constellation_border_color: Rgb::new(0.8, 0.6, 0.2),
            grid_color: Rgb::gray(0.6),
            milky_way_color: Rgb::new(0.85, 0.85, 0.95),
            invert_colors: false,

            star_border_linewidth: 0.06,
            open_cluster_linewidth: 0.3,
            dso_linewidth: 0.2,
            legend_linewidth: 0.2,
            constellation_linewidth: 0.5,
            constellation_border_linewidth: 0.3,
            grid_linewidth: 0.1,
            milky_way_linewidth: 0.2,

            show_star_labels: true,
            show_deepsky_labels: true,
            show_constellation_lines: true,
            show_constellation_borders: true,
            show_milky_way: true,
            enhanced_milky_way: false,
            show_grid: true,
            show_mag_scale: true,
            show_map_scale: true,
            show_orientation: true,
            show_field_border: true,
            show_coordinates: true,
            show_dso_legend: false,

            deepsky_label_limit: 15.0,
            min_dso_radius_mm: 1.0,

            mirror_x: false,
            mirror_y: false,
            rotation_deg: 0.0,

            pixels_per_mm: 5.0,
            caption: None,
        }
    }
}

impl ChartConfig {
    pub fn from_json_str(json: &str) -> ChartResult<Self> {
        Self::parse(json, Path::new("<inline>"))
    }

    pub fn from_json_file(path: &Path) -> ChartResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| ChartError::config(path, e.to_string()))?;
        Self::parse(&json, path)
    }

    fn parse(json: &str, path: &Path) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| ChartError::config(path, e.to_string()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> ChartResult<()> {
        let positive = [
            ("width_mm", self.width_mm),
            ("font_size_mm", self.font_size_mm),
            ("legend_font_scale", self.legend_font_scale),
            ("pixels_per_mm", self.pixels_per_mm),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ChartError::config(path, format!("{name} must be positive, got {value}")));
            }
        }
        if !self.rotation_deg.is_finite() {
            return Err(ChartError::config(path, "rotation_deg must be finite"));
        }
        Ok(())
    }

    pub fn orientation(&self) -> Orientation {
        Orientation {
            mirror_x: self.mirror_x,
            mirror_y: self.mirror_y,
            rotation: self.rotation_deg * DEG_TO_RAD,
        }
    }

    pub fn legend_font_size(&self) -> f64 {
        self.font_size_mm * self.legend_font_scale
    }

    pub fn milky_way_fade(&self) -> MilkyWayFade {
        MilkyWayFade::derive(self.background, self.milky_way_color)
    }
}
