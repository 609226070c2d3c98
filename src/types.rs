//! Common Types and Constants
//!
//! Shared data structures used by the matcher, the progress tracker and the
//! session lifecycle.

use serde::{Deserialize, Serialize};

use crate::grade::Grade;

// ==================== Constants ====================

/// Consecutive unmatched strokes before the expected stroke is revealed
pub const MAX_MISTAKES: u32 = 3;

/// Penalty for a forced or requested reveal; also the grade scale divisor
pub const MAX_PENALTIES: u32 = 4;

/// Penalty for redrawing a stroke that is already complete
pub const DUPLICATE_PENALTY: u32 = 1;

/// Penalty per reference stroke skipped by an out-of-order match
pub const SKIP_PENALTY: u32 = 2;

// ==================== Geometry ====================

/// A 2D point in character space.
///
/// Serialized as a `[x, y]` pair, which is how the lookup data stores medians.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

impl From<[f64; 2]> for Point {
    fn from(value: [f64; 2]) -> Self {
        Point::new(value[0], value[1])
    }
}

impl From<Point> for [f64; 2] {
    fn from(value: Point) -> Self {
        [value.x, value.y]
    }
}

/// Total length of a polyline.
pub fn path_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance(&w[1])).sum()
}

/// Endpoints of a stroke as used by the commit animation: the drawn stroke's
/// start and end are moved onto the reference stroke's start and end.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub start: Point,
    pub end: Point,
}

impl Transform {
    pub fn of(points: &[Point]) -> Self {
        match (points.first(), points.last()) {
            (Some(&start), Some(&end)) => Self { start, end },
            _ => Self::default(),
        }
    }
}

// ==================== Characters ====================

/// Scheduler identity of one review card.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterRef {
    pub id: String,
    pub word: String,
}

impl CharacterRef {
    pub fn new(id: impl Into<String>, word: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            word: word.into(),
        }
    }
}

/// One stroke of the canonical decomposition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReferenceStroke {
    /// Corner-reduced centerline
    pub median: Vec<Point>,
    /// Opaque display form (SVG path data in the lookup payload)
    pub stroke: String,
}

/// A character as an ordered list of strokes in canonical stroke order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub strokes: Vec<ReferenceStroke>,
}

/// Per-character row of the lookup payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CharacterRow {
    pub strokes: Vec<String>,
    pub medians: Vec<Vec<Point>>,
}

/// Lookup payload for one word.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CharacterData {
    pub word: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub pinyin: String,
    pub characters: Vec<CharacterRow>,
}

/// Display metadata published when a character is loaded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterMetadata {
    pub word: String,
    pub definition: String,
    pub pinyin: String,
}

impl From<&CharacterData> for CharacterMetadata {
    fn from(data: &CharacterData) -> Self {
        Self {
            word: data.word.clone(),
            definition: data.definition.clone(),
            pinyin: data.pinyin.clone(),
        }
    }
}

// ==================== Session ====================

/// Progress entry for one reference stroke.
#[derive(Clone, Debug, PartialEq)]
pub struct StepProgress {
    pub reference: ReferenceStroke,
    pub done: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingInput,
    Completed,
}

/// The single live practice attempt for one character.
///
/// Counters and `done` flags are only reachable through the progress
/// tracker, which keeps them monotonic.
#[derive(Clone, Debug)]
pub struct Session {
    card: CharacterRef,
    steps: Vec<StepProgress>,
    mistakes: u32,
    penalties: u32,
    grade: Option<Grade>,
}

impl Session {
    pub fn new(card: CharacterRef, character: Character) -> Self {
        let steps = character
            .strokes
            .into_iter()
            .map(|reference| StepProgress {
                reference,
                done: false,
            })
            .collect();

        Self {
            card,
            steps,
            mistakes: 0,
            penalties: 0,
            grade: None,
        }
    }

    pub fn card(&self) -> &CharacterRef {
        &self.card
    }

    pub fn steps(&self) -> &[StepProgress] {
        &self.steps
    }

    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    pub fn penalties(&self) -> u32 {
        self.penalties
    }

    pub fn grade(&self) -> Option<Grade> {
        self.grade
    }

    /// Ordered indices of steps not yet drawn.
    pub fn missing(&self) -> Vec<usize> {
        self.steps
            .iter()
            .enumerate()
            .filter(|(_, step)| !step.done)
            .map(|(i, _)| i)
            .collect()
    }

    /// Lowest index not yet drawn.
    pub fn expected(&self) -> Option<usize> {
        self.steps.iter().position(|step| !step.done)
    }

    pub fn is_complete(&self) -> bool {
        self.steps.iter().all(|step| step.done)
    }

    pub fn state(&self) -> SessionState {
        if self.is_complete() {
            SessionState::Completed
        } else {
            SessionState::AwaitingInput
        }
    }

    pub(crate) fn mark_done(&mut self, index: usize) {
        debug_assert!(!self.steps[index].done, "step {index} already done");
        self.steps[index].done = true;
    }

    pub(crate) fn record_mistake(&mut self) -> u32 {
        self.mistakes = self.mistakes.saturating_add(1);
        self.mistakes
    }

    pub(crate) fn reset_mistakes(&mut self) {
        self.mistakes = 0;
    }

    pub(crate) fn add_penalty(&mut self, amount: u32) {
        self.penalties = self.penalties.saturating_add(amount);
    }

    pub(crate) fn set_grade(&mut self, grade: Grade) {
        debug_assert!(self.grade.is_none(), "grade already set");
        debug_assert!(self.is_complete(), "grade set before completion");
        self.grade = Some(grade);
    }
}

// ==================== Matching ====================

/// Outcome of matching one candidate stroke against a session's steps.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchResult {
    /// Best-scoring step, `None` when no step matched
    pub best_index: Option<usize>,
    pub score: f64,
    pub source: Transform,
    pub target: Transform,
    pub warning: Option<String>,
}

impl MatchResult {
    pub fn empty() -> Self {
        Self {
            best_index: None,
            score: f64::NEG_INFINITY,
            source: Transform::default(),
            target: Transform::default(),
            warning: None,
        }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke(median: &[(f64, f64)]) -> ReferenceStroke {
        ReferenceStroke {
            median: median.iter().map(|&(x, y)| Point::new(x, y)).collect(),
            stroke: String::new(),
        }
    }

    fn session(n: usize) -> Session {
        let character = Character {
            strokes: (0..n).map(|i| stroke(&[(i as f64, 0.0), (i as f64, 10.0)])).collect(),
        };
        Session::new(CharacterRef::new("c1", "十"), character)
    }

    #[test]
    fn test_point_serializes_as_pair() {
        let json = serde_json::to_string(&Point::new(1.5, -2.0)).unwrap();
        assert_eq!(json, "[1.5,-2.0]");
        let back: Point = serde_json::from_str("[3, 4]").unwrap();
        assert_eq!(back, Point::new(3.0, 4.0));
    }

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
        assert_eq!(a.midpoint(&b), Point::new(1.5, 2.0));
    }

    #[test]
    fn test_path_length() {
        let path = [Point::new(0.0, 0.0), Point::new(3.0, 4.0), Point::new(3.0, 10.0)];
        assert!((path_length(&path) - 11.0).abs() < 1e-12);
        assert_eq!(path_length(&[]), 0.0);
    }

    #[test]
    fn test_transform_of_empty_is_default() {
        assert_eq!(Transform::of(&[]), Transform::default());
        let t = Transform::of(&[Point::new(1.0, 2.0), Point::new(5.0, 6.0), Point::new(7.0, 8.0)]);
        assert_eq!(t.start, Point::new(1.0, 2.0));
        assert_eq!(t.end, Point::new(7.0, 8.0));
    }

    #[test]
    fn test_new_session_is_fresh() {
        let s = session(3);
        assert_eq!(s.steps().len(), 3);
        assert!(s.steps().iter().all(|step| !step.done));
        assert_eq!(s.mistakes(), 0);
        assert_eq!(s.penalties(), 0);
        assert_eq!(s.grade(), None);
        assert_eq!(s.expected(), Some(0));
        assert_eq!(s.missing(), vec![0, 1, 2]);
        assert_eq!(s.state(), SessionState::AwaitingInput);
    }

    #[test]
    fn test_expected_is_min_missing() {
        let mut s = session(3);
        s.mark_done(1);
        assert_eq!(s.missing(), vec![0, 2]);
        assert_eq!(s.expected(), Some(0));
        s.mark_done(0);
        assert_eq!(s.expected(), Some(2));
        s.mark_done(2);
        assert_eq!(s.expected(), None);
        assert!(s.is_complete());
        assert_eq!(s.state(), SessionState::Completed);
    }

    #[test]
    fn test_empty_character_is_complete() {
        let s = Session::new(CharacterRef::new("c0", ""), Character::default());
        assert!(s.is_complete());
        assert_eq!(s.expected(), None);
    }

    #[test]
    fn test_counters_saturate() {
        let mut s = session(1);
        s.add_penalty(u32::MAX);
        s.add_penalty(5);
        assert_eq!(s.penalties(), u32::MAX);
        assert_eq!(s.record_mistake(), 1);
        assert_eq!(s.record_mistake(), 2);
        s.reset_mistakes();
        assert_eq!(s.mistakes(), 0);
    }

    #[test]
    fn test_character_data_deserializes() {
        let json = r#"{
            "word": "人",
            "definition": "person",
            "pinyin": "rén",
            "characters": [{
                "strokes": ["M 1 1 L 2 2", "M 3 3 L 4 4"],
                "medians": [[[10, 20], [30, 40]], [[50, 60], [70, 80], [90, 100]]]
            }]
        }"#;
        let data: CharacterData = serde_json::from_str(json).unwrap();
        assert_eq!(data.word, "人");
        assert_eq!(data.characters[0].medians[1].len(), 3);
        assert_eq!(data.characters[0].medians[0][1], Point::new(30.0, 40.0));

        let meta = CharacterMetadata::from(&data);
        assert_eq!(meta.pinyin, "rén");
    }

    #[test]
    fn test_character_data_optional_fields_default() {
        let data: CharacterData =
            serde_json::from_str(r#"{"word": "一", "characters": []}"#).unwrap();
        assert!(data.definition.is_empty());
        assert!(data.pinyin.is_empty());
    }

    #[test]
    fn test_empty_match_result() {
        let r = MatchResult::empty();
        assert_eq!(r.best_index, None);
        assert_eq!(r.score, f64::NEG_INFINITY);
        assert!(r.warning.is_none());
    }

    #[test]
    fn test_constants() {
        assert_eq!(MAX_MISTAKES, 3);
        assert_eq!(MAX_PENALTIES, 4);
        assert_eq!(DUPLICATE_PENALTY, 1);
        assert_eq!(SKIP_PENALTY, 2);
    }
}
