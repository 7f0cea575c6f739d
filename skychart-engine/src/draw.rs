//! Backend-independent draw commands.
//!
//! A [`Chart`] is the complete output of the layout: an ordered list of
//! primitives in chart-plane millimetres (`y` up, origin at the field
//! centre), each tagged with the [`Layer`] it belongs to. Commands are stored
//! back to front, so replaying them in order gives the right overlap.

use crate::config::Rgb;

pub type Point = (f64, f64);

/// Stroke style. `dash` is `(on, off)` in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pen {
    pub color: Rgb,
    pub width: f64,
    pub dash: Option<(f64, f64)>,
}

impl Pen {
    pub fn solid(color: Rgb, width: f64) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(color: Rgb, width: f64, on: f64, off: f64) -> Self {
        Self {
            color,
            width,
            dash: Some((on, off)),
        }
    }
}

/// Horizontal anchoring of a text run at its position. The position is on
/// the text baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Drawing groups, back to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    MilkyWay,
    Grid,
    Constellations,
    DeepSky,
    Stars,
    Labels,
    Legend,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Polyline {
        points: Vec<Point>,
        closed: bool,
        pen: Pen,
    },
    Circle {
        center: Point,
        radius: f64,
        stroke: Option<Pen>,
        fill: Option<Rgb>,
    },
    FilledPolygon {
        points: Vec<Point>,
        color: Rgb,
    },
    Text {
        position: Point,
        text: String,
        align: TextAlign,
        size: f64,
        color: Rgb,
    },
}

impl DrawCommand {
    fn invert_colors(&mut self) {
        match self {
            DrawCommand::Polyline { pen, .. } => pen.color = pen.color.inverted(),
            DrawCommand::Circle { stroke, fill, .. } => {
                if let Some(pen) = stroke {
                    pen.color = pen.color.inverted();
                }
                if let Some(color) = fill {
                    *color = color.inverted();
                }
            }
            DrawCommand::FilledPolygon { color, .. } | DrawCommand::Text { color, .. } => {
                *color = color.inverted();
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayeredCommand {
    pub layer: Layer,
    pub command: DrawCommand,
}

/// Counters reported with each chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub stars: usize,
    pub deepsky: usize,
    pub labels: usize,
    /// Selected items dropped because they project outside the field.
    pub culled: usize,
}

/// The drawing area in chart-plane millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// A finished chart, ready to be replayed into a sink.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub bounds: Bounds,
    pub background: Rgb,
    pub font_family: String,
    pub pixels_per_mm: f64,
    pub caption: Option<String>,
    pub commands: Vec<LayeredCommand>,
    pub stats: RenderStats,
}

impl Chart {
    pub fn commands_in(&self, layer: Layer) -> impl Iterator<Item = &DrawCommand> + '_ {
        self.commands
            .iter()
            .filter(move |c| c.layer == layer)
            .map(|c| &c.command)
    }

    /// Replaces the background and every pen and fill colour by its negative.
    pub fn invert_colors(&mut self) {
        self.background = self.background.inverted();
        for c in &mut self.commands {
            c.command.invert_colors();
        }
    }

    /// Every text run on the chart, in drawing order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match &c.command {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Splits a polyline into the "on" pieces of a dash pattern.
///
/// The pattern runs continuously across vertices. A non-positive `on` or
/// `off` length leaves the line solid.
pub fn dash_polyline(points: &[Point], on: f64, off: f64) -> Vec<Vec<Point>> {
    if on <= 0.0 || off <= 0.0 || points.len() < 2 {
        return vec![points.to_vec()];
    }
    let mut dashes = Vec::new();
    let mut current: Vec<Point> = vec![points[0]];
    let mut drawing = true;
    let mut left = on;

    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let length = libm::hypot(b.0 - a.0, b.1 - a.1);
        let mut travelled = 0.0;
        while length - travelled > left {
            travelled += left;
            let t = travelled / length;
            let p = (a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t);
            if drawing {
                current.push(p);
                dashes.push(std::mem::take(&mut current));
                left = off;
            } else {
                current = vec![p];
                left = on;
            }
            drawing = !drawing;
        }
        left -= length - travelled;
        if drawing {
            current.push(b);
        }
    }
    if drawing && current.len() > 1 {
        dashes.push(current);
    }
    dashes
}
