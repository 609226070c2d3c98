//! Stroke matching
//!
//! Picks the reference step a candidate stroke most resembles. The scorer is
//! consulted once per eligible step with the step's signed distance from the
//! expected step as an offset hint, so scorers can prefer strokes drawn in
//! order without ruling out the rest.

use serde::{Deserialize, Serialize};

use crate::types::{MatchResult, Point, StepProgress, Transform};

/// Scorer verdict for one candidate/median pair.
#[derive(Clone, Debug, PartialEq)]
pub struct Score {
    /// Higher is better; `f64::NEG_INFINITY` means no match
    pub score: f64,
    pub warning: Option<String>,
    pub source: Transform,
    pub target: Transform,
}

impl Score {
    pub fn rejected() -> Self {
        Self {
            score: f64::NEG_INFINITY,
            warning: None,
            source: Transform::default(),
            target: Transform::default(),
        }
    }
}

/// Shape recognizer comparing a simplified candidate with a reference median.
pub trait Scorer {
    fn score(&self, candidate: &[Point], median: &[Point], offset: isize) -> Score;
}

impl<S: Scorer + ?Sized> Scorer for Box<S> {
    fn score(&self, candidate: &[Point], median: &[Point], offset: isize) -> Score {
        (**self).score(candidate, median, offset)
    }
}

impl<S: Scorer + ?Sized> Scorer for &S {
    fn score(&self, candidate: &[Point], median: &[Point], offset: isize) -> Score {
        (**self).score(candidate, median, offset)
    }
}

/// Which steps a candidate is scored against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchScope {
    /// Every step, so redrawn strokes are recognised as duplicates
    #[default]
    All,
    /// Only steps not yet drawn
    Pending,
}

impl MatchScope {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Some(Self::All),
            "pending" => Some(Self::Pending),
            _ => None,
        }
    }
}

/// Best match for `candidate` among `steps`.
///
/// Replacement needs a strictly higher score, so ties keep the lowest index.
/// Returns an empty result when no step is pending or nothing scores above
/// negative infinity.
pub fn match_stroke<S: Scorer + ?Sized>(
    candidate: &[Point],
    steps: &[StepProgress],
    expected: usize,
    scorer: &S,
    scope: MatchScope,
) -> MatchResult {
    let mut best = MatchResult::empty();
    if steps.iter().all(|step| step.done) {
        return best;
    }

    for (i, step) in steps.iter().enumerate() {
        if step.done && scope == MatchScope::Pending {
            continue;
        }
        let offset = i as isize - expected as isize;
        let verdict = scorer.score(candidate, &step.reference.median, offset);
        if verdict.score > best.score {
            best = MatchResult {
                best_index: Some(i),
                score: verdict.score,
                source: verdict.source,
                target: verdict.target,
                warning: verdict.warning,
            };
        }
    }

    best
}
