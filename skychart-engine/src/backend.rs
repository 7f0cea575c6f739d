//! plotters-backed sinks.
//!
//! Output format follows the file extension: `.svg` always, `.png` with the
//! `png` feature. Anything else, PDF included, is
//! [`SinkError::UnsupportedFormat`].

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::config::Rgb;
use crate::draw::{dash_polyline, Bounds, Chart, Pen, Point, TextAlign};
use crate::error::SinkError;
use crate::sink::{replay, DrawingSink};

/// Draws into a plotters [`DrawingArea`], converting millimetres to pixels
/// and flipping `y` so north-up charts stay north-up.
pub struct PlottersSink<'a, DB: DrawingBackend> {
    area: &'a DrawingArea<DB, Shift>,
    bounds: Bounds,
    px_per_mm: f64,
    font_family: String,
}

impl<'a, DB: DrawingBackend> PlottersSink<'a, DB>
where
    DB::ErrorType: 'static,
{
    pub fn new(area: &'a DrawingArea<DB, Shift>, px_per_mm: f64, font_family: &str) -> Self {
        Self {
            area,
            bounds: Bounds {
                min_x: 0.0,
                min_y: 0.0,
                max_x: 0.0,
                max_y: 0.0,
            },
            px_per_mm,
            font_family: font_family.to_string(),
        }
    }

    fn px(&self, p: Point) -> (i32, i32) {
        (
            ((p.0 - self.bounds.min_x) * self.px_per_mm).round() as i32,
            ((self.bounds.max_y - p.1) * self.px_per_mm).round() as i32,
        )
    }

    fn length_px(&self, mm: f64) -> u32 {
        (mm * self.px_per_mm).round().max(1.0) as u32
    }

    fn stroke(&self, pen: &Pen) -> ShapeStyle {
        color(pen.color).stroke_width(self.length_px(pen.width))
    }
}

fn color(c: Rgb) -> RGBColor {
    let [r, g, b] = c.to_bytes();
    RGBColor(r, g, b)
}

impl<DB: DrawingBackend> DrawingSink for PlottersSink<'_, DB>
where
    DB::ErrorType: 'static,
{
    fn begin(&mut self, bounds: Bounds, background: Rgb) -> Result<(), SinkError> {
        self.bounds = bounds;
        self.area.fill(&color(background)).map_err(SinkError::backend)
    }

    fn polyline(&mut self, points: &[Point], closed: bool, pen: &Pen) -> Result<(), SinkError> {
        let mut path = points.to_vec();
        if closed && points.len() > 2 {
            path.push(points[0]);
        }
        let pieces = match pen.dash {
            Some((on, off)) => dash_polyline(&path, on, off),
            None => vec![path],
        };
        let style = self.stroke(pen);
        for piece in pieces.into_iter().filter(|p| p.len() > 1) {
            let px: Vec<(i32, i32)> = piece.into_iter().map(|p| self.px(p)).collect();
            self.area
                .draw(&PathElement::new(px, style))
                .map_err(SinkError::backend)?;
        }
        Ok(())
    }

    fn circle(&mut self, center: Point, radius: f64, stroke: Option<&Pen>, fill: Option<Rgb>) -> Result<(), SinkError> {
        let c = self.px(center);
        let r = self.length_px(radius) as i32;
        if let Some(fill) = fill {
            self.area
                .draw(&Circle::new(c, r, color(fill).filled()))
                .map_err(SinkError::backend)?;
        }
        if let Some(pen) = stroke {
            if pen.dash.is_some() {
                // plotters has no dashed circles; go through the polyline path
                let outline = crate::layout::clip::circle_points(center, radius, 48);
                return self.polyline(&outline, true, pen);
            }
            self.area
                .draw(&Circle::new(c, r, self.stroke(pen)))
                .map_err(SinkError::backend)?;
        }
        Ok(())
    }

    fn filled_polygon(&mut self, points: &[Point], fill: Rgb) -> Result<(), SinkError> {
        if points.len() < 3 {
            return Ok(());
        }
        let px: Vec<(i32, i32)> = points.iter().map(|&p| self.px(p)).collect();
        self.area
            .draw(&Polygon::new(px, color(fill).filled()))
            .map_err(SinkError::backend)
    }

    fn text(&mut self, position: Point, text: &str, align: TextAlign, size: f64, fill: Rgb) -> Result<(), SinkError> {
        let hpos = match align {
            TextAlign::Left => HPos::Left,
            TextAlign::Center => HPos::Center,
            TextAlign::Right => HPos::Right,
        };
        let style = (self.font_family.as_str(), size * self.px_per_mm)
            .into_font()
            .color(&color(fill))
            .pos(Pos::new(hpos, VPos::Bottom));
        self.area
            .draw(&Text::new(text.to_string(), self.px(position), style))
            .map_err(SinkError::backend)
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.area.present().map_err(SinkError::backend)
    }
}

/// Canvas size in pixels for `chart`.
pub fn pixel_size(chart: &Chart) -> (u32, u32) {
    let px = |mm: f64| (mm * chart.pixels_per_mm).round().max(1.0) as u32;
    (px(chart.bounds.width()), px(chart.bounds.height()))
}

fn draw_into<DB: DrawingBackend>(chart: &Chart, area: &DrawingArea<DB, Shift>) -> Result<(), SinkError>
where
    DB::ErrorType: 'static,
{
    let mut sink = PlottersSink::new(area, chart.pixels_per_mm, &chart.font_family);
    replay(chart, &mut sink)
}

/// Whether [`write_chart`] can produce files with `extension`.
pub fn supports_extension(extension: &str) -> bool {
    match extension.trim_start_matches('.').to_ascii_lowercase().as_str() {
        "svg" => true,
        "png" => cfg!(feature = "png"),
        _ => false,
    }
}

/// Writes `chart` to `path` in the format named by its extension.
pub fn write_chart(chart: &Chart, path: &Path) -> Result<(), SinkError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let size = pixel_size(chart);
    match extension.as_deref() {
        Some("svg") => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            draw_into(chart, &root)
        }
        #[cfg(feature = "png")]
        Some("png") => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            draw_into(chart, &root)
        }
        _ => Err(SinkError::unsupported(path)),
    }?;
    log::debug!("wrote {} ({}x{} px)", path.display(), size.0, size.1);
    Ok(())
}

/// Renders `chart` as an SVG document in memory.
pub fn render_svg(chart: &Chart) -> Result<String, SinkError> {
    let mut buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut buffer, pixel_size(chart)).into_drawing_area();
        draw_into(chart, &root)?;
    }
    Ok(buffer)
}
