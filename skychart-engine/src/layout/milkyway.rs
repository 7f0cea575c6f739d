//! Milky Way contours.
//!
//! Plain mode strokes each contour outline. Enhanced mode fills the
//! contours in level order, faintest first, each coloured by
//! [`MilkyWayFade`](crate::config::MilkyWayFade) so brighter levels paint over
//! fainter ones.

use skychart_catalog::MilkyWayContour;
use skychart_core::Projector;

use super::clip::clip_polygon;
use super::Canvas;
use crate::config::ChartConfig;
use crate::draw::{Pen, Point};

/// Vertices further out than this many field radii are pulled in before
/// polygon clipping.
const FAR_FACTOR: f64 = 4.0;

pub fn draw(canvas: &mut Canvas, projector: &Projector, contours: &[&MilkyWayContour], config: &ChartConfig) {
    if config.enhanced_milky_way {
        fill(canvas, projector, contours, config);
    } else {
        let pen = Pen::solid(config.milky_way_color, config.milky_way_linewidth);
        for contour in contours {
            let mut outline: Vec<Option<Point>> = contour
                .vertices
                .iter()
                .map(|&v| {
                    let p = projector.project_unbounded(v);
                    p.valid.then(|| p.xy())
                })
                .collect();
            if let Some(&first) = outline.first() {
                outline.push(first);
            }
            canvas.clipped_runs(&outline, pen);
        }
    }
}

fn fill(canvas: &mut Canvas, projector: &Projector, contours: &[&MilkyWayContour], config: &ChartConfig) {
    let fade = config.milky_way_fade();
    let max_level = contours.iter().map(|c| c.level).max().unwrap_or(0);
    let far = canvas.radius() * FAR_FACTOR;

    let mut ordered: Vec<&MilkyWayContour> = contours.to_vec();
    ordered.sort_by_key(|c| (c.level, c.id));
    for contour in ordered {
        let projected: Vec<Point> = contour
            .vertices
            .iter()
            .map(|&v| projector.project_clamped(v, far))
            .collect();
        let clipped = clip_polygon(&projected, canvas.radius());
        canvas.filled_polygon(clipped, fade.color(contour.level, max_level));
    }
}
