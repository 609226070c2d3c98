//! Default stroke recognizer
//!
//! Compares a candidate with a reference median after resampling both to the
//! same number of evenly spaced points. The mean point distance is taken in
//! both drawing directions; a stroke that only fits when reversed is accepted
//! with a warning. Candidates further than `max_distance` from a median are
//! rejected outright, and every step of distance from the expected stroke
//! costs `offset_penalty`, which keeps near-ties in stroke order.

use crate::matcher::{Score, Scorer};
use crate::types::{path_length, Point, Transform};

pub const BACKWARDS_WARNING: &str = "Stroke backwards";

#[derive(Debug, Clone)]
pub struct MedianRecognizer {
    pub samples: usize,
    /// Mean point distance beyond which a pair never matches
    pub max_distance: f64,
    pub offset_penalty: f64,
}

impl Default for MedianRecognizer {
    fn default() -> Self {
        Self {
            samples: 32,
            max_distance: 160.0,
            offset_penalty: 8.0,
        }
    }
}

impl Scorer for MedianRecognizer {
    fn score(&self, candidate: &[Point], median: &[Point], offset: isize) -> Score {
        if candidate.len() < 2 || median.len() < 2 || self.samples < 2 {
            return Score::rejected();
        }

        let drawn = resample(candidate, self.samples);
        let reference = resample(median, self.samples);
        let forward = mean_distance(drawn.iter(), &reference);
        let backward = mean_distance(drawn.iter().rev(), &reference);

        let backwards = backward < forward;
        let distance = forward.min(backward);
        if distance > self.max_distance {
            return Score::rejected();
        }

        let mut source = Transform::of(candidate);
        if backwards {
            std::mem::swap(&mut source.start, &mut source.end);
        }

        Score {
            score: -distance - self.offset_penalty * offset.unsigned_abs() as f64,
            warning: backwards.then(|| BACKWARDS_WARNING.to_string()),
            source,
            target: Transform::of(median),
        }
    }
}

fn mean_distance<'a>(drawn: impl Iterator<Item = &'a Point>, reference: &[Point]) -> f64 {
    let total: f64 = drawn.zip(reference).map(|(a, b)| a.distance(b)).sum();
    total / reference.len() as f64
}

/// `n` points evenly spaced by arc length from the first to the last point.
pub fn resample(path: &[Point], n: usize) -> Vec<Point> {
    if path.len() < 2 || n < 2 {
        return path.to_vec();
    }

    let total = path_length(path);
    if total <= f64::EPSILON {
        return vec![path[0]; n];
    }

    let mut out = Vec::with_capacity(n);
    let mut segment = 0;
    let mut walked = 0.0;
    for i in 0..n {
        let target = total * i as f64 / (n - 1) as f64;
        while segment + 2 < path.len()
            && walked + path[segment].distance(&path[segment + 1]) < target
        {
            walked += path[segment].distance(&path[segment + 1]);
            segment += 1;
        }
        let (a, b) = (path[segment], path[segment + 1]);
        let len = a.distance(&b);
        let t = if len > 0.0 {
            ((target - walked) / len).clamp(0.0, 1.0)
        } else {
            0.0
        };
        out.push(Point::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y)));
    }
    out
}
