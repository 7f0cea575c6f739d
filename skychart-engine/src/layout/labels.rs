//! Greedy label placement.
//!
//! Every symbol, and every label once placed, is a source in a repulsive
//! potential. Each label has four candidate anchors around its symbol; the
//! one whose text centre sits at the lowest potential wins (first candidate
//! on ties), and the placed label becomes a new source. Labels are placed in
//! brightness order, so bright objects get their preferred spot first.
//!
//! This is a heuristic: it is deterministic, not overlap-free.

use crate::draw::{Point, TextAlign};

/// Softening of the `1/d²` term, mm².
const SOFTENING: f64 = 0.25;

/// Width of one character relative to the font size.
const CHAR_WIDTH: f64 = 0.6;

/// Penalty per millimetre a label centre lies beyond the usable field.
const EDGE_PENALTY: f64 = 1000.0;

#[derive(Debug, Clone)]
pub struct LabelPotential {
    field_radius: f64,
    sources: Vec<(Point, f64)>,
}

impl LabelPotential {
    pub fn new(field_radius: f64) -> Self {
        Self {
            field_radius,
            sources: Vec::new(),
        }
    }

    pub fn add(&mut self, at: Point, weight: f64) {
        self.sources.push((at, weight));
    }

    pub fn potential(&self, at: Point, margin: f64) -> f64 {
        let field: f64 = self
            .sources
            .iter()
            .map(|&(p, w)| {
                let (dx, dy) = (at.0 - p.0, at.1 - p.1);
                w / (dx * dx + dy * dy + SOFTENING)
            })
            .sum();
        let overshoot = libm::hypot(at.0, at.1) - (self.field_radius - margin);
        field + overshoot.max(0.0) * EDGE_PENALTY
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub anchor: Point,
    pub align: TextAlign,
}

pub fn text_width(text: &str, size: f64) -> f64 {
    text.chars().count() as f64 * size * CHAR_WIDTH
}

/// Visual centre of `text` drawn at `candidate`.
pub fn text_center(candidate: &Candidate, width: f64, size: f64) -> Point {
    let dx = match candidate.align {
        TextAlign::Left => width / 2.0,
        TextAlign::Center => 0.0,
        TextAlign::Right => -width / 2.0,
    };
    (candidate.anchor.0 + dx, candidate.anchor.1 + size / 3.0)
}

/// Picks the candidate at the lowest potential, records the placed label
/// and returns it. `None` only for an empty candidate list.
pub fn place(potential: &mut LabelPotential, candidates: &[Candidate], text: &str, size: f64) -> Option<Candidate> {
    let width = text_width(text, size);
    let mut best: Option<(Candidate, Point, f64)> = None;
    for candidate in candidates {
        let center = text_center(candidate, width, size);
        let value = potential.potential(center, width / 2.0);
        if best.map_or(true, |(_, _, v)| value < v) {
            best = Some((*candidate, center, value));
        }
    }
    let (chosen, center, _) = best?;
    potential.add(center, width);
    Some(chosen)
}

/// Anchors around a round symbol of radius `r`: lower right, lower left,
/// upper right, upper left. The label hugs the circle where the text line
/// crosses it.
pub fn circular_candidates(center: Point, r: f64, size: f64) -> [Candidate; 4] {
    let cos_a = 1.0 - 2.0 * size / (3.0 * r);
    let a = if (-1.0..=1.0).contains(&cos_a) {
        libm::acos(cos_a)
    } else {
        std::f64::consts::FRAC_PI_2
    };
    let dx = libm::sin(a) * r + size / 6.0;
    let (x, y) = center;
    let low = y - r;
    let high = y + r - 2.0 * size / 3.0;
    [
        Candidate {
            anchor: (x + dx, low),
            align: TextAlign::Left,
        },
        Candidate {
            anchor: (x - dx, low),
            align: TextAlign::Right,
        },
        Candidate {
            anchor: (x + dx, high),
            align: TextAlign::Left,
        },
        Candidate {
            anchor: (x - dx, high),
            align: TextAlign::Right,
        },
    ]
}

/// Anchors around a symbol with half extents `hx`, `hy`: below, above,
/// right, left.
pub fn box_candidates(center: Point, hx: f64, hy: f64, size: f64) -> [Candidate; 4] {
    let (x, y) = center;
    [
        Candidate {
            anchor: (x, y - hy - size),
            align: TextAlign::Center,
        },
        Candidate {
            anchor: (x, y + hy + size / 3.0),
            align: TextAlign::Center,
        },
        Candidate {
            anchor: (x + hx + size / 6.0, y - size / 3.0),
            align: TextAlign::Left,
        },
        Candidate {
            anchor: (x - hx - size / 6.0, y - size / 3.0),
            align: TextAlign::Right,
        },
    ]
}

/// Anchors around an X mark: right, left, above, below.
pub fn cross_candidates(center: Point, half: f64, size: f64) -> [Candidate; 4] {
    let [below, above, right, left] = box_candidates(center, half, half, size);
    [right, left, above, below]
}
