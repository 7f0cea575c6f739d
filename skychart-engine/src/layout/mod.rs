//! Turns a [`Selection`] into a [`Chart`].
//!
//! [`render`] is stateless: it projects every selected item through the
//! field's [`Projector`], drops what falls outside, and emits draw commands
//! layer by layer:
//!
//! | Layer | Content |
//! |-------|---------|
//! | [`Layer::MilkyWay`] | contour outlines, or level-coloured fills when enhanced |
//! | [`Layer::Grid`] | RA/Dec lines |
//! | [`Layer::Constellations`] | boundaries, then stick figures |
//! | [`Layer::DeepSky`] | deep-sky symbols and extra markers |
//! | [`Layer::Stars`] | star discs |
//! | [`Layer::Labels`] | deep-sky, marker and Bayer labels |
//! | [`Layer::Legend`] | field border, scales, orientation, coordinates, caption |
//!
//! Line work is clipped to the field circle; symbols that cross the edge are
//! trimmed, not dropped.

pub mod clip;
pub mod constellations;
pub mod grid;
pub mod labels;
pub mod legend;
pub mod milkyway;
pub mod symbols;

use skychart_catalog::DeepSkyType;
use skychart_core::{Field, Projector};

use crate::config::{ChartConfig, Rgb};
use crate::draw::{Bounds, Chart, DrawCommand, Layer, LayeredCommand, Pen, Point, RenderStats, TextAlign};
use crate::selection::Selection;
use clip::{circle_points, clip_broken_polyline, clip_polyline, inside};
use labels::LabelPotential;
use symbols::DsoShape;

/// Points used when a circle crossing the field edge is turned into a polyline.
const CIRCLE_POINTS: usize = 64;

/// Collects draw commands for one layer at a time.
#[derive(Debug)]
pub struct Canvas {
    radius: f64,
    layer: Layer,
    commands: Vec<LayeredCommand>,
}

impl Canvas {
    /// A canvas whose clipping circle has `radius` millimetres.
    pub fn new(radius: f64) -> Self {
        Self {
            radius,
            layer: Layer::MilkyWay,
            commands: Vec::new(),
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn set_layer(&mut self, layer: Layer) {
        self.layer = layer;
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(LayeredCommand {
            layer: self.layer,
            command,
        });
    }

    pub fn polyline(&mut self, points: Vec<Point>, closed: bool, pen: Pen) {
        if points.len() > 1 {
            self.push(DrawCommand::Polyline { points, closed, pen });
        }
    }

    pub fn line(&mut self, a: Point, b: Point, pen: Pen) {
        self.polyline(vec![a, b], false, pen);
    }

    /// Draws the parts of a polyline inside the field. A closed outline that
    /// crosses the edge comes out as open pieces.
    pub fn clipped_polyline(&mut self, points: &[Point], closed: bool, pen: Pen) {
        if points.iter().all(|&p| inside(p, self.radius)) {
            self.polyline(points.to_vec(), closed, pen);
            return;
        }
        let mut path = points.to_vec();
        if closed {
            if let Some(&first) = points.first() {
                path.push(first);
            }
        }
        for run in clip_polyline(&path, self.radius) {
            self.polyline(run, false, pen);
        }
    }

    /// Like [`Canvas::clipped_polyline`] for open lines with unprojectable vertices.
    pub fn clipped_runs(&mut self, points: &[Option<Point>], pen: Pen) {
        for run in clip_broken_polyline(points, self.radius) {
            self.polyline(run, false, pen);
        }
    }

    pub fn circle(&mut self, center: Point, radius: f64, stroke: Option<Pen>, fill: Option<Rgb>) {
        self.push(DrawCommand::Circle {
            center,
            radius,
            stroke,
            fill,
        });
    }

    /// Stroked circle; turned into trimmed arcs when it crosses the field edge.
    pub fn clipped_circle(&mut self, center: Point, radius: f64, pen: Pen) {
        if libm::hypot(center.0, center.1) + radius <= self.radius {
            self.circle(center, radius, Some(pen), None);
        } else {
            let outline = circle_points(center, radius, CIRCLE_POINTS);
            self.clipped_polyline(&outline, true, pen);
        }
    }

    pub fn filled_polygon(&mut self, points: Vec<Point>, color: Rgb) {
        if points.len() > 2 {
            self.push(DrawCommand::FilledPolygon { points, color });
        }
    }

    pub fn rectangle(&mut self, min: Point, max: Point, color: Rgb) {
        self.filled_polygon(vec![min, (max.0, min.1), max, (min.0, max.1)], color);
    }

    pub fn text(&mut self, position: Point, text: impl Into<String>, align: TextAlign, size: f64, color: Rgb) {
        self.push(DrawCommand::Text {
            position,
            text: text.into(),
            align,
            size,
            color,
        });
    }
}

/// Lays out one chart. The field's orientation is used as given.
pub fn render(selection: &Selection<'_>, field: &Field, config: &ChartConfig) -> Chart {
    let projector = Projector::new(field, config.width_mm);
    let radius = projector.field_radius_mm();
    let mut canvas = Canvas::new(radius);
    let mut stats = RenderStats::default();

    if config.show_milky_way {
        canvas.set_layer(Layer::MilkyWay);
        milkyway::draw(&mut canvas, &projector, &selection.milky_way, config);
    }
    if config.show_grid {
        canvas.set_layer(Layer::Grid);
        grid::draw(&mut canvas, &projector, config);
    }
    canvas.set_layer(Layer::Constellations);
    if config.show_constellation_borders {
        let pen = Pen::dashed(
            config.constellation_border_color,
            config.constellation_border_linewidth,
            1.0,
            0.6,
        );
        constellations::draw(&mut canvas, &projector, &selection.constellation_boundaries, pen);
    }
    if config.show_constellation_lines {
        let pen = Pen::solid(config.constellation_line_color, config.constellation_linewidth);
        constellations::draw(&mut canvas, &projector, &selection.constellation_lines, pen);
    }

    canvas.set_layer(Layer::DeepSky);
    let mut shapes: Vec<(DsoShape, Option<String>)> = Vec::new();
    for dso in &selection.deepsky {
        let p = projector.project(dso.object.position);
        if !p.valid {
            stats.culled += 1;
            continue;
        }
        let shape = DsoShape::for_object(&projector, dso.object, p.xy(), config);
        symbols::draw(&mut canvas, &shape, config);
        stats.deepsky += 1;
        let labelled = config.show_deepsky_labels && dso.mag.map_or(true, |m| m <= config.deepsky_label_limit);
        shapes.push((shape, labelled.then(|| dso.label())));
    }
    for marker in &selection.extra_markers {
        let p = projector.project(marker.position);
        if !p.valid {
            stats.culled += 1;
            continue;
        }
        let shape = DsoShape::plain(DeepSkyType::Unknown, p.xy(), config.min_dso_radius_mm);
        symbols::draw(&mut canvas, &shape, config);
        shapes.push((shape, Some(marker.label.clone())));
    }

    canvas.set_layer(Layer::Stars);
    let mut star_labels: Vec<(Point, f64, &str)> = Vec::new();
    let mut star_discs: Vec<(Point, f64)> = Vec::new();
    let border = Pen::solid(config.background, config.star_border_linewidth);
    for star in &selection.stars {
        let p = projector.project(star.position);
        if !p.valid {
            stats.culled += 1;
            continue;
        }
        let r = symbols::star_radius(star.star.mag, selection.star_mag_limit, config);
        canvas.circle(p.xy(), r, Some(border), Some(config.star_color));
        stats.stars += 1;
        star_discs.push((p.xy(), r));
        if let (true, Some(label)) = (config.show_star_labels, star.label.as_deref()) {
            star_labels.push((p.xy(), r, label));
        }
    }

    canvas.set_layer(Layer::Labels);
    let size = config.font_size_mm;
    let mut potential = LabelPotential::new(radius);
    for (shape, _) in &shapes {
        potential.add(shape.center, shape.rlong);
    }
    for &(center, r) in &star_discs {
        potential.add(center, r);
    }
    for (shape, label) in &shapes {
        let Some(text) = label else { continue };
        if let Some(c) = labels::place(&mut potential, &shape.label_candidates(size), text, size) {
            canvas.text(c.anchor, text.as_str(), c.align, size, config.label_color);
            stats.labels += 1;
        }
    }
    for &(center, r, text) in &star_labels {
        let candidates = labels::circular_candidates(center, r, size);
        if let Some(c) = labels::place(&mut potential, &candidates, text, size) {
            canvas.text(c.anchor, text, c.align, size, config.label_color);
            stats.labels += 1;
        }
    }

    canvas.set_layer(Layer::Legend);
    legend::draw(&mut canvas, &projector, selection.star_mag_limit, config);

    if stats.culled > 0 {
        log::debug!("{} selected items outside the field", stats.culled);
    }

    let half = config.width_mm / 2.0;
    let caption_height = if config.caption.is_some() {
        legend::caption_height(config)
    } else {
        0.0
    };
    let mut chart = Chart {
        bounds: Bounds {
            min_x: -half,
            min_y: -half,
            max_x: half,
            max_y: half + caption_height,
        },
        background: config.background,
        font_family: config.font_family.clone(),
        pixels_per_mm: config.pixels_per_mm,
        caption: config.caption.clone(),
        commands: canvas.commands,
        stats,
    };
    if config.invert_colors {
        chart.invert_colors();
    }
    chart
}
