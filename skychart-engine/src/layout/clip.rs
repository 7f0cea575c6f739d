//! Clipping against the field circle, centred on the origin.

use crate::draw::Point;

/// Vertices of the polygon used to clip filled regions.
const CLIP_POLYGON_SIDES: usize = 96;

#[inline]
fn norm(p: Point) -> f64 {
    libm::hypot(p.0, p.1)
}

pub fn inside(p: Point, radius: f64) -> bool {
    norm(p) <= radius
}

/// `n` points on a circle, counter-clockwise from `+x`. Not closed.
pub fn circle_points(center: Point, radius: f64, n: usize) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let a = std::f64::consts::TAU * i as f64 / n as f64;
            let (s, c) = libm::sincos(a);
            (center.0 + radius * c, center.1 + radius * s)
        })
        .collect()
}

/// The part of segment `a`-`b` inside the circle, with flags telling whether
/// each end was moved onto the circle.
pub fn clip_segment(a: Point, b: Point, radius: f64) -> Option<(Point, Point, bool, bool)> {
    let d = (b.0 - a.0, b.1 - a.1);
    let qa = d.0 * d.0 + d.1 * d.1;
    let qb = 2.0 * (a.0 * d.0 + a.1 * d.1);
    let qc = a.0 * a.0 + a.1 * a.1 - radius * radius;
    if qa == 0.0 {
        return (qc <= 0.0).then_some((a, b, false, false));
    }
    let disc = qb * qb - 4.0 * qa * qc;
    if disc < 0.0 {
        return None;
    }
    let root = libm::sqrt(disc);
    let t0 = ((-qb - root) / (2.0 * qa)).max(0.0);
    let t1 = ((-qb + root) / (2.0 * qa)).min(1.0);
    if t0 > t1 {
        return None;
    }
    let at = |t: f64| (a.0 + d.0 * t, a.1 + d.1 * t);
    Some((at(t0), at(t1), t0 > 0.0, t1 < 1.0))
}

/// Splits an open polyline into the runs that lie inside the circle.
/// Segments crossing the boundary are trimmed to it.
pub fn clip_polyline(points: &[Point], radius: f64) -> Vec<Vec<Point>> {
    let mut runs = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    for pair in points.windows(2) {
        let Some((a, b, entered, left)) = clip_segment(pair[0], pair[1], radius) else {
            if current.len() > 1 {
                runs.push(std::mem::take(&mut current));
            }
            current.clear();
            continue;
        };
        if entered || current.is_empty() {
            if current.len() > 1 {
                runs.push(std::mem::take(&mut current));
            }
            current = vec![a];
        }
        current.push(b);
        if left {
            runs.push(std::mem::take(&mut current));
        }
    }
    if current.len() > 1 {
        runs.push(current);
    }
    runs
}

/// Clips a polyline whose vertices may be missing (unprojectable); a missing
/// vertex breaks the line.
pub fn clip_broken_polyline(points: &[Option<Point>], radius: f64) -> Vec<Vec<Point>> {
    points
        .split(Option::is_none)
        .flat_map(|run| {
            let run: Vec<Point> = run.iter().flatten().copied().collect();
            clip_polyline(&run, radius)
        })
        .collect()
}

/// Sutherland-Hodgman clip of a polygon against a regular polygon
/// circumscribing the circle. Returns an empty list when nothing is left.
pub fn clip_polygon(points: &[Point], radius: f64) -> Vec<Point> {
    let n = CLIP_POLYGON_SIDES;
    let outer = radius / libm::cos(std::f64::consts::PI / n as f64);
    let edges = circle_points((0.0, 0.0), outer, n);

    let mut output = points.to_vec();
    for i in 0..n {
        if output.is_empty() {
            break;
        }
        let (e0, e1) = (edges[i], edges[(i + 1) % n]);
        let side = |p: Point| (e1.0 - e0.0) * (p.1 - e0.1) - (e1.1 - e0.1) * (p.0 - e0.0);
        let input = std::mem::take(&mut output);
        for j in 0..input.len() {
            let current = input[j];
            let previous = input[(j + input.len() - 1) % input.len()];
            let (sc, sp) = (side(current), side(previous));
            if sc >= 0.0 {
                if sp < 0.0 {
                    output.push(intersect(previous, current, sp, sc));
                }
                output.push(current);
            } else if sp >= 0.0 {
                output.push(intersect(previous, current, sp, sc));
            }
        }
    }
    if output.len() < 3 {
        output.clear();
    }
    output
}

fn intersect(p: Point, q: Point, sp: f64, sq: f64) -> Point {
    let t = sp / (sp - sq);
    (p.0 + (q.0 - p.0) * t, p.1 + (q.1 - p.1) * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    #[test]
    fn test_segment_inside_untouched() {
        let (a, b, entered, left) = clip_segment((-1.0, 0.0), (1.0, 0.0), 5.0).unwrap();
        assert!(close(a, (-1.0, 0.0)) && close(b, (1.0, 0.0)));
        assert!(!entered && !left);
    }

    #[test]
    fn test_segment_trimmed_not_dropped() {
        let (a, b, entered, left) = clip_segment((0.0, 0.0), (10.0, 0.0), 5.0).unwrap();
        assert!(close(a, (0.0, 0.0)) && close(b, (5.0, 0.0)));
        assert!(!entered && left);

        let (a, b, entered, left) = clip_segment((-10.0, 3.0), (10.0, 3.0), 5.0).unwrap();
        assert!(close(a, (-4.0, 3.0)) && close(b, (4.0, 3.0)));
        assert!(entered && left);
    }

    #[test]
    fn test_segment_outside() {
        assert!(clip_segment((-10.0, 6.0), (10.0, 6.0), 5.0).is_none());
        assert!(clip_segment((6.0, 0.0), (9.0, 0.0), 5.0).is_none());
    }

    #[test]
    fn test_polyline_leaving_and_returning() {
        let line = [(0.0, 0.0), (10.0, 0.0), (10.0, 1.0), (0.0, 1.0)];
        let runs = clip_polyline(&line, 5.0);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].len(), 2);
        assert!(close(runs[0][1], (5.0, 0.0)));
        assert!(close(runs[1][1], (0.0, 1.0)));
    }

    #[test]
    fn test_broken_polyline() {
        let line = [Some((0.0, 0.0)), Some((1.0, 0.0)), None, Some((2.0, 0.0)), Some((3.0, 0.0))];
        assert_eq!(clip_broken_polyline(&line, 5.0).len(), 2);
    }

    #[test]
    fn test_polygon_clip() {
        let square = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
        assert_eq!(clip_polygon(&square, 5.0).len(), 4);

        let big = [(-10.0, -10.0), (10.0, -10.0), (10.0, 10.0), (-10.0, 10.0)];
        let clipped = clip_polygon(&big, 5.0);
        assert!(clipped.len() >= CLIP_POLYGON_SIDES);
        assert!(clipped.iter().all(|&p| norm(p) <= 5.0 * 1.001));

        let away = [(20.0, 20.0), (30.0, 20.0), (30.0, 30.0)];
        assert!(clip_polygon(&away, 5.0).is_empty());
    }
}
