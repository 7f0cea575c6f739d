//! Legend blocks around the field.
//!
//! Each block is drawn only when its `show_*` toggle is set. Blocks that sit
//! inside the field square (magnitude scale bottom left, map scale bottom
//! right) first paint a background box so the chart does not show through.

use skychart_catalog::DeepSkyType;
use skychart_core::constants::ARCMIN_TO_RAD;
use skychart_core::format::{format_arcmin_label, format_coordinates, format_magnitude_label};
use skychart_core::Projector;

use super::symbols::{self, star_radius, DsoShape};
use super::Canvas;
use crate::config::ChartConfig;
use crate::draw::{Pen, TextAlign};

/// Ruler lengths the map scale chooses from, arcminutes.
pub const RULER_ARCMIN: [u32; 9] = [1, 5, 10, 30, 60, 120, 300, 600, 1200];

const MAG_SCALE_STARS: i32 = 7;

/// Widget text relative to the legend font.
const WIDGET_FONT_SCALE: f64 = 0.66;

const DSO_LEGEND_TOP: [DeepSkyType; 4] = [
    DeepSkyType::OpenCluster,
    DeepSkyType::Asterism,
    DeepSkyType::Galaxy,
    DeepSkyType::GlobularCluster,
];

const DSO_LEGEND_BOTTOM: [DeepSkyType; 4] = [
    DeepSkyType::SupernovaRemnant,
    DeepSkyType::Nebula,
    DeepSkyType::PlanetaryNebula,
    DeepSkyType::Unknown,
];

pub fn draw(canvas: &mut Canvas, projector: &Projector, star_mag_limit: f64, config: &ChartConfig) {
    let pen = Pen::solid(config.draw_color, config.legend_linewidth);
    let r = projector.field_radius_mm();
    let lf = config.legend_font_size();

    if config.show_field_border {
        canvas.circle((0.0, 0.0), r, Some(pen), None);
    }
    if config.show_mag_scale {
        magnitude_scale(canvas, star_mag_limit, r, config);
    }
    if config.show_map_scale {
        map_scale(canvas, projector, r, config);
    }
    if config.show_orientation {
        orientation(canvas, projector, r, config);
    }
    if config.show_coordinates {
        let text = format_coordinates(projector.field().center(), &config.language.ra_units());
        canvas.text((r - lf / 2.0, r - lf), text, TextAlign::Right, lf, config.draw_color);
    }
    if config.show_dso_legend {
        dso_legend(canvas, r, config);
    }
    if let Some(caption) = &config.caption {
        canvas.text(
            (0.0, r + caption_height(config) * 0.3),
            caption.as_str(),
            TextAlign::Center,
            lf * 1.5,
            config.draw_color,
        );
    }
}

/// Extra height above the field when a caption is shown.
pub fn caption_height(config: &ChartConfig) -> f64 {
    2.0 * config.legend_font_size()
}

/// Integer magnitudes shown by the magnitude scale, faintest first.
pub fn magnitude_scale_values(star_mag_limit: f64) -> Vec<i32> {
    let top = star_mag_limit.trunc() as i32;
    (0..MAG_SCALE_STARS).map(|i| top - i).collect()
}

/// The longest round ruler no longer than a third of the drawing width,
/// as `(arcminutes, length_mm)`.
pub fn map_scale_ruler(projector: &Projector, width_mm: f64) -> Option<(u32, f64)> {
    RULER_ARCMIN
        .iter()
        .rev()
        .map(|&arcmin| (arcmin, projector.angle_to_mm(f64::from(arcmin) * ARCMIN_TO_RAD)))
        .find(|&(_, length)| length <= width_mm / 3.0)
}

fn boxed(canvas: &mut Canvas, min: (f64, f64), max: (f64, f64), config: &ChartConfig) {
    let pen = Pen::solid(config.draw_color, config.legend_linewidth);
    canvas.rectangle(min, max, config.background);
    // only the sides facing the field; the others lie on the page edge
    if min.0 > -canvas.radius() {
        canvas.line((min.0, min.1), (min.0, max.1), pen);
    } else {
        canvas.line((max.0, min.1), (max.0, max.1), pen);
    }
    canvas.line((min.0, max.1), (max.0, max.1), pen);
}

fn magnitude_scale(canvas: &mut Canvas, star_mag_limit: f64, r: f64, config: &ChartConfig) {
    let fh = config.legend_font_size() * WIDGET_FONT_SCALE;
    let mags = magnitude_scale_values(star_mag_limit);
    let radii: Vec<f64> = mags
        .iter()
        .map(|&m| star_radius(f64::from(m), star_mag_limit, config))
        .collect();
    let max_r = radii.iter().copied().fold(0.0, f64::max);
    let cell = (2.0 * max_r).max(1.6 * fh) + 0.4 * fh;
    let (x0, y0) = (-r, -r);
    let height = 2.0 * max_r + 2.2 * fh;

    boxed(canvas, (x0, y0), (x0 + cell * mags.len() as f64, y0 + height), config);
    let border = Pen::solid(config.background, config.star_border_linewidth);
    for (i, (&mag, &radius)) in mags.iter().zip(&radii).enumerate() {
        let cx = x0 + cell * (i as f64 + 0.5);
        canvas.circle((cx, y0 + 1.6 * fh + max_r), radius, Some(border), Some(config.star_color));
        canvas.text(
            (cx, y0 + 0.4 * fh),
            format_magnitude_label(mag),
            TextAlign::Center,
            fh,
            config.draw_color,
        );
    }
}

fn map_scale(canvas: &mut Canvas, projector: &Projector, r: f64, config: &ChartConfig) {
    let Some((arcmin, length)) = map_scale_ruler(projector, config.width_mm) else {
        return;
    };
    let pen = Pen::solid(config.draw_color, config.legend_linewidth);
    let fh = config.legend_font_size() * WIDGET_FONT_SCALE;
    let x1 = r - fh;
    let x0 = x1 - length;
    let y = -r + 1.2 * fh;

    boxed(canvas, (x0 - fh, -r), (r, -r + 3.0 * fh), config);
    canvas.line((x0, y), (x1, y), pen);
    canvas.line((x0, y - fh / 2.0), (x0, y + fh / 2.0), pen);
    canvas.line((x1, y - fh / 2.0), (x1, y + fh / 2.0), pen);
    canvas.text(
        ((x0 + x1) / 2.0, y + 0.5 * fh),
        format_arcmin_label(arcmin),
        TextAlign::Center,
        fh,
        config.draw_color,
    );
}

/// Arrows towards celestial north and east at the field centre.
fn orientation(canvas: &mut Canvas, projector: &Projector, r: f64, config: &ChartConfig) {
    let Some((north, east)) = projector.local_axes(projector.field().center()) else {
        return;
    };
    let pen = Pen::solid(config.draw_color, config.legend_linewidth);
    let lf = config.legend_font_size();
    let dl = 0.03 * config.width_mm;
    let origin = (-r + dl + lf, r - dl - 1.3 * lf);
    for (axis, label) in [(north, "N"), (east, "E")] {
        let tip = (origin.0 + dl * axis[0], origin.1 + dl * axis[1]);
        canvas.line(origin, tip, pen);
        let at = (
            origin.0 + (dl + 0.6 * lf) * axis[0],
            origin.1 + (dl + 0.6 * lf) * axis[1] - lf / 3.0,
        );
        canvas.text(at, label, TextAlign::Center, lf, config.draw_color);
    }
}

fn dso_legend(canvas: &mut Canvas, r: f64, config: &ChartConfig) {
    let lf = config.legend_font_size();
    let symbol_r = 0.35 * lf;
    let x = r - 0.8 * lf;
    let language = config.language;

    let sorted = |kinds: [DeepSkyType; 4]| {
        let mut kinds = kinds.to_vec();
        kinds.sort_by_key(|&k| (language.type_name(k).chars().count(), language.type_name(k)));
        kinds
    };
    let rows = sorted(DSO_LEGEND_TOP)
        .into_iter()
        .enumerate()
        .map(|(i, k)| (k, r - 2.6 * lf - 1.5 * lf * i as f64))
        .chain(
            sorted(DSO_LEGEND_BOTTOM)
                .into_iter()
                .enumerate()
                .map(|(i, k)| (k, -r + 4.5 * lf + 1.5 * lf * i as f64)),
        );
    for (kind, y) in rows {
        symbols::draw(canvas, &DsoShape::plain(kind, (x, y), symbol_r), config);
        canvas.text(
            (x - symbol_r - 0.4 * lf, y - lf / 3.0),
            language.type_name(kind),
            TextAlign::Right,
            lf,
            config.label_color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::DrawCommand;
    use skychart_core::Field;

    fn texts(canvas: &Canvas) -> Vec<String> {
        canvas
            .commands
            .iter()
            .filter_map(|c| match &c.command {
                DrawCommand::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn projector(radius_deg: f64) -> Projector {
        Projector::new(&Field::new(0.0, 0.0, radius_deg.to_radians()).unwrap(), 180.0)
    }

    #[test]
    fn test_ruler_choice() {
        // 90 mm per tan(1°): 20' is about 30 mm, 30' about 45 mm
        let (arcmin, length) = map_scale_ruler(&projector(1.0), 180.0).unwrap();
        assert_eq!(arcmin, 30);
        assert!(length <= 60.0);
        let (arcmin, _) = map_scale_ruler(&projector(30.0), 180.0).unwrap();
        assert_eq!(arcmin, 1200);
    }

    #[test]
    fn test_magnitude_scale_values() {
        assert_eq!(magnitude_scale_values(13.8), vec![13, 12, 11, 10, 9, 8, 7]);
        assert_eq!(magnitude_scale_values(6.0), vec![6, 5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_full_legend_texts() {
        let config = ChartConfig {
            caption: Some("M 42".to_string()),
            show_dso_legend: true,
            ..ChartConfig::default()
        };
        let p = projector(1.0);
        let mut canvas = Canvas::new(p.field_radius_mm());
        draw(&mut canvas, &p, 8.5, &config);
        let texts = texts(&canvas);
        for expected in ["8", "2", "30'", "N", "E", "0h0m0s +0°0'0\"", "M 42", "Open cluster", "Unknown object"] {
            assert!(texts.iter().any(|t| t == expected), "missing {expected}: {texts:?}");
        }
    }

    #[test]
    fn test_toggles_disable_blocks() {
        let config = ChartConfig {
            show_field_border: false,
            show_mag_scale: false,
            show_map_scale: false,
            show_orientation: false,
            show_coordinates: false,
            ..ChartConfig::default()
        };
        let p = projector(1.0);
        let mut canvas = Canvas::new(p.field_radius_mm());
        draw(&mut canvas, &p, 8.5, &config);
        assert!(canvas.commands.is_empty());
    }
}
