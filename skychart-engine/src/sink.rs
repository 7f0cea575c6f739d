//! The drawing-surface seam.
//!
//! A [`DrawingSink`] receives primitives in chart-plane millimetres; turning
//! them into pixels or file bytes is the sink's business. [`replay`] feeds a
//! finished [`Chart`] into any sink in layer order.

use crate::config::Rgb;
use crate::draw::{Bounds, Chart, DrawCommand, Pen, Point, TextAlign};
use crate::error::SinkError;

pub trait DrawingSink {
    /// Called once before any primitive with the chart extent and background.
    fn begin(&mut self, bounds: Bounds, background: Rgb) -> Result<(), SinkError>;

    fn polyline(&mut self, points: &[Point], closed: bool, pen: &Pen) -> Result<(), SinkError>;

    fn circle(&mut self, center: Point, radius: f64, stroke: Option<&Pen>, fill: Option<Rgb>) -> Result<(), SinkError>;

    fn filled_polygon(&mut self, points: &[Point], color: Rgb) -> Result<(), SinkError>;

    fn text(&mut self, position: Point, text: &str, align: TextAlign, size: f64, color: Rgb) -> Result<(), SinkError>;

    /// Flushes output. No primitive follows.
    fn finish(&mut self) -> Result<(), SinkError>;
}

/// Sends every command of `chart` to `sink`, back to front.
pub fn replay<S: DrawingSink + ?Sized>(chart: &Chart, sink: &mut S) -> Result<(), SinkError> {
    sink.begin(chart.bounds, chart.background)?;
    for layered in &chart.commands {
        match &layered.command {
            DrawCommand::Polyline { points, closed, pen } => sink.polyline(points, *closed, pen)?,
            DrawCommand::Circle {
                center,
                radius,
                stroke,
                fill,
            } => sink.circle(*center, *radius, stroke.as_ref(), *fill)?,
            DrawCommand::FilledPolygon { points, color } => sink.filled_polygon(points, *color)?,
            DrawCommand::Text {
                position,
                text,
                align,
                size,
                color,
            } => sink.text(*position, text, *align, *size, *color)?,
        }
    }
    sink.finish()
}

/// One call received by a [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    Begin(Bounds),
    Polyline { points: usize, closed: bool },
    Circle { center: Point, radius: f64 },
    FilledPolygon { points: usize },
    Text { text: String, align: TextAlign },
    Finish,
}

/// A sink that only remembers what it was asked to draw.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub calls: Vec<SinkCall>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SinkCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl DrawingSink for RecordingSink {
    fn begin(&mut self, bounds: Bounds, _background: Rgb) -> Result<(), SinkError> {
        self.calls.push(SinkCall::Begin(bounds));
        Ok(())
    }

    fn polyline(&mut self, points: &[Point], closed: bool, _pen: &Pen) -> Result<(), SinkError> {
        self.calls.push(SinkCall::Polyline {
            points: points.len(),
            closed,
        });
        Ok(())
    }

    fn circle(&mut self, center: Point, radius: f64, _stroke: Option<&Pen>, _fill: Option<Rgb>) -> Result<(), SinkError> {
        self.calls.push(SinkCall::Circle { center, radius });
        Ok(())
    }

    fn filled_polygon(&mut self, points: &[Point], _color: Rgb) -> Result<(), SinkError> {
        self.calls.push(SinkCall::FilledPolygon { points: points.len() });
        Ok(())
    }

    fn text(&mut self, _position: Point, text: &str, align: TextAlign, _size: f64, _color: Rgb) -> Result<(), SinkError> {
        self.calls.push(SinkCall::Text {
            text: text.to_string(),
            align,
        });
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.calls.push(SinkCall::Finish);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{Layer, LayeredCommand, RenderStats};

    #[test]
    fn test_replay_preserves_order() {
        let pen = Pen::solid(Rgb::BLACK, 0.2);
        let chart = Chart {
            bounds: Bounds {
                min_x: -10.0,
                min_y: -10.0,
                max_x: 10.0,
                max_y: 10.0,
            },
            background: Rgb::WHITE,
            font_family: "sans-serif".to_string(),
            pixels_per_mm: 4.0,
            caption: None,
            commands: vec![
                LayeredCommand {
                    layer: Layer::Grid,
                    command: DrawCommand::Polyline {
                        points: vec![(0.0, 0.0), (1.0, 1.0)],
                        closed: false,
                        pen,
                    },
                },
                LayeredCommand {
                    layer: Layer::Stars,
                    command: DrawCommand::Circle {
                        center: (1.0, 2.0),
                        radius: 0.5,
                        stroke: Some(pen),
                        fill: Some(Rgb::BLACK),
                    },
                },
                LayeredCommand {
                    layer: Layer::Labels,
                    command: DrawCommand::Text {
                        position: (1.0, 2.0),
                        text: "M 42".to_string(),
                        align: TextAlign::Left,
                        size: 2.6,
                        color: Rgb::BLACK,
                    },
                },
            ],
            stats: RenderStats::default(),
        };

        let mut sink = RecordingSink::new();
        replay(&chart, &mut sink).unwrap();
        assert_eq!(sink.calls.len(), 5);
        assert!(matches!(sink.calls[0], SinkCall::Begin(_)));
        assert_eq!(sink.calls[1], SinkCall::Polyline { points: 2, closed: false });
        assert_eq!(
            sink.calls[2],
            SinkCall::Circle {
                center: (1.0, 2.0),
                radius: 0.5
            }
        );
        assert_eq!(sink.texts(), vec!["M 42"]);
        assert_eq!(sink.calls[4], SinkCall::Finish);
    }
}
