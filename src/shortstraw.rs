//! ShortStraw stroke simplification
//!
//! Reduces a raw pen trace to its corner points (Wolin, Eoff & Hammond,
//! "ShortStraw: A Simple and Effective Corner Finder for Polylines").
//! The trace is resampled at a fixed spacing, each point gets a "straw"
//! (chord length across a small window), and local straw minima below a
//! fraction of the median straw become corners. A refinement pass then adds
//! corners inside segments that are not straight and drops corners that sit
//! on a straight line between their neighbours.

use crate::types::{path_length, Point};

/// Reduces a raw trace to the points the recognizer compares.
pub trait StrokeSimplifier {
    fn simplify(&self, raw: &[Point]) -> Vec<Point>;
}

/// Leaves strokes untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl StrokeSimplifier for Passthrough {
    fn simplify(&self, raw: &[Point]) -> Vec<Point> {
        raw.to_vec()
    }
}

#[derive(Debug, Clone)]
pub struct Shortstraw {
    /// Resample spacing is the bounding-box diagonal divided by this
    pub diagonal_interval: f64,
    /// Straw half-window, in resampled points
    pub window: usize,
    /// Corner threshold as a fraction of the median straw
    pub median_threshold: f64,
    /// Chord/path ratio above which a segment counts as straight
    pub line_threshold: f64,
}

impl Default for Shortstraw {
    fn default() -> Self {
        Self {
            diagonal_interval: 40.0,
            window: 3,
            median_threshold: 0.95,
            line_threshold: 0.95,
        }
    }
}

impl StrokeSimplifier for Shortstraw {
    fn simplify(&self, raw: &[Point]) -> Vec<Point> {
        self.run(raw)
    }
}

impl Shortstraw {
    pub fn run(&self, raw: &[Point]) -> Vec<Point> {
        if raw.len() < 2 {
            return raw.to_vec();
        }

        let spacing = bounding_diagonal(raw) / self.diagonal_interval;
        if spacing <= f64::EPSILON {
            return vec![raw[0], raw[raw.len() - 1]];
        }

        let points = resample(raw, spacing);
        self.corners(&points)
            .into_iter()
            .map(|i| points[i])
            .collect()
    }

    fn corners(&self, points: &[Point]) -> Vec<usize> {
        let n = points.len();
        let w = self.window;
        if n < 2 * w + 1 {
            return vec![0, n - 1];
        }

        let mut straws = vec![f64::INFINITY; n];
        for i in w..n - w {
            straws[i] = points[i - w].distance(&points[i + w]);
        }
        let threshold = median(&straws[w..n - w]) * self.median_threshold;

        let mut corners = vec![0];
        let mut i = w;
        while i < n - w {
            if straws[i] < threshold {
                let mut best = i;
                while i < n - w && straws[i] < threshold {
                    if straws[i] < straws[best] {
                        best = i;
                    }
                    i += 1;
                }
                corners.push(best);
            }
            i += 1;
        }
        corners.push(n - 1);

        self.refine(points, &straws, corners)
    }

    fn refine(&self, points: &[Point], straws: &[f64], mut corners: Vec<usize>) -> Vec<usize> {
        // Split curved segments until every segment is a line.
        let mut j = 1;
        while j < corners.len() {
            let (a, b) = (corners[j - 1], corners[j]);
            if !self.is_line(points, a, b) {
                if let Some(mid) = halfway_corner(straws, a, b) {
                    corners.insert(j, mid);
                    continue;
                }
            }
            j += 1;
        }

        // Merge corners lying on a straight run.
        let mut j = 1;
        while j + 1 < corners.len() {
            if self.is_line(points, corners[j - 1], corners[j + 1]) {
                corners.remove(j);
            } else {
                j += 1;
            }
        }

        corners
    }

    fn is_line(&self, points: &[Point], a: usize, b: usize) -> bool {
        let path = path_length(&points[a..=b]);
        if path <= f64::EPSILON {
            return true;
        }
        points[a].distance(&points[b]) / path > self.line_threshold
    }
}

fn bounding_diagonal(points: &[Point]) -> f64 {
    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Point::new(min_x, min_y).distance(&Point::new(max_x, max_y))
}

/// Points spaced `spacing` apart along the trace, ending on its last point.
fn resample(points: &[Point], spacing: f64) -> Vec<Point> {
    let mut out = vec![points[0]];
    let mut acc = 0.0;
    let mut prev = points[0];
    let mut i = 1;

    while i < points.len() {
        let cur = points[i];
        let d = prev.distance(&cur);
        if d > 0.0 && acc + d >= spacing {
            let t = (spacing - acc) / d;
            let q = Point::new(prev.x + t * (cur.x - prev.x), prev.y + t * (cur.y - prev.y));
            out.push(q);
            prev = q;
            acc = 0.0;
        } else {
            acc += d;
            prev = cur;
            i += 1;
        }
    }

    let last = points[points.len() - 1];
    if out.last().map_or(true, |p| p.distance(&last) > f64::EPSILON) {
        out.push(last);
    }
    out
}

/// Lowest straw in the middle half of `(a, b)`.
fn halfway_corner(straws: &[f64], a: usize, b: usize) -> Option<usize> {
    let quarter = (b - a) / 4;
    if quarter == 0 {
        return None;
    }
    (a + quarter..b - quarter)
        .filter(|&i| straws[i].is_finite())
        .min_by(|&x, &y| straws[x].total_cmp(&straws[y]))
        .filter(|&i| i > a && i < b)
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.is_empty() {
        0.0
    } else if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
