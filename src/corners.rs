use crate::types::Point;

/// Reduces a reference median to its corner points at load time.
pub trait CornerExtractor {
    fn extract(&self, median: &[Point]) -> Vec<Point>;
}

/// Keeps endpoints plus every point where the stroke has turned more than
/// `max_turn_degrees` away from the chord drawn from the previous corner.
#[derive(Debug, Clone)]
pub struct AngleCornerExtractor {
    pub max_turn_degrees: f64,
    /// Points closer than this to the previous corner are never corners
    pub min_spacing: f64,
}

impl Default for AngleCornerExtractor {
    fn default() -> Self {
        Self {
            max_turn_degrees: 30.0,
            min_spacing: 16.0,
        }
    }
}

impl CornerExtractor for AngleCornerExtractor {
    fn extract(&self, median: &[Point]) -> Vec<Point> {
        if median.len() <= 2 {
            return median.to_vec();
        }

        let threshold = self.max_turn_degrees.to_radians();
        let last = median[median.len() - 1];
        let mut corners = vec![median[0]];

        for window in median[1..].windows(2) {
            let (cur, next) = (window[0], window[1]);
            let anchor = corners[corners.len() - 1];
            if anchor.distance(&cur) < self.min_spacing || cur.distance(&last) < self.min_spacing {
                continue;
            }
            if let Some(turn) = turn_angle(anchor, cur, next) {
                if turn > threshold {
                    corners.push(cur);
                }
            }
        }

        corners.push(last);
        corners
    }
}

/// Unsigned angle between `a -> b` and `b -> c`; `None` for zero-length legs.
fn turn_angle(a: Point, b: Point, c: Point) -> Option<f64> {
    let (ux, uy) = (b.x - a.x, b.y - a.y);
    let (vx, vy) = (c.x - b.x, c.y - b.y);
    if (ux == 0.0 && uy == 0.0) || (vx == 0.0 && vy == 0.0) {
        return None;
    }
    let cross = ux * vy - uy * vx;
    let dot = ux * vx + uy * vy;
    Some(cross.atan2(dot).abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(f64, f64)]) -> Vec<Point> {
        raw.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn test_short_medians_unchanged() {
        let e = AngleCornerExtractor::default();
        let two = pts(&[(0.0, 0.0), (100.0, 0.0)]);
        assert_eq!(e.extract(&two), two);
        assert!(e.extract(&[]).is_empty());
    }

    #[test]
    fn test_straight_median_reduces_to_endpoints() {
        let e = AngleCornerExtractor::default();
        let median = pts(&[(0.0, 0.0), (50.0, 2.0), (100.0, -1.0), (150.0, 1.0), (200.0, 0.0)]);
        assert_eq!(e.extract(&median), pts(&[(0.0, 0.0), (200.0, 0.0)]));
    }

    #[test]
    fn test_hook_keeps_corner() {
        let e = AngleCornerExtractor::default();
        let median = pts(&[(0.0, 0.0), (100.0, 0.0), (200.0, 0.0), (200.0, 100.0), (200.0, 200.0)]);
        assert_eq!(
            e.extract(&median),
            pts(&[(0.0, 0.0), (200.0, 0.0), (200.0, 200.0)])
        );
    }

    #[test]
    fn test_turn_angle() {
        let right = turn_angle(Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(1.0, 1.0));
        assert!((right.unwrap() - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert_eq!(turn_angle(Point::new(0.0, 0.0), Point::new(0.0, 0.0), Point::new(1.0, 1.0)), None);
    }
}
