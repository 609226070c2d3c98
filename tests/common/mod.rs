#![allow(dead_code)]

use danci_handwriting::{
    CharacterData, CharacterRef, CharacterRow, Lookup, LookupError, Passthrough, Point,
    QueueScheduler, RecordingDisplay, Score, Scorer, StaticLookup, TeachConfig, TeachController,
    Transform,
};

/// Horizontal spacing between the stub medians of consecutive strokes.
pub const STROKE_SPACING: f64 = 100.0;

/// Matches a candidate to the step whose median starts at the same x.
pub struct StubScorer;

impl Scorer for StubScorer {
    fn score(&self, candidate: &[Point], median: &[Point], _offset: isize) -> Score {
        match (candidate.first(), median.first()) {
            (Some(c), Some(m)) if c.x == m.x => Score {
                score: 1.0,
                warning: None,
                source: Transform::of(candidate),
                target: Transform::of(median),
            },
            _ => Score::rejected(),
        }
    }
}

/// Lookup that is always down.
pub struct FailingLookup;

impl Lookup for FailingLookup {
    async fn by_word(&self, word: &str) -> Result<CharacterData, LookupError> {
        Err(LookupError::Unavailable(format!("offline while fetching {word}")))
    }
}

/// Lookup that never answers.
pub struct HangingLookup;

impl Lookup for HangingLookup {
    async fn by_word(&self, _word: &str) -> Result<CharacterData, LookupError> {
        std::future::pending().await
    }
}

pub fn card(word: &str) -> CharacterRef {
    CharacterRef::new(format!("card-{word}"), word)
}

/// Character data with `strokes` straight vertical medians.
pub fn character_data(word: &str, strokes: usize) -> CharacterData {
    CharacterData {
        word: word.to_string(),
        definition: format!("definition of {word}"),
        pinyin: format!("pinyin of {word}"),
        characters: vec![CharacterRow {
            strokes: (0..strokes).map(|i| format!("{word}-stroke-{i}")).collect(),
            medians: (0..strokes)
                .map(|i| {
                    let x = i as f64 * STROKE_SPACING;
                    vec![Point::new(x, 0.0), Point::new(x, 50.0)]
                })
                .collect(),
        }],
    }
}

/// Pen stroke the stub scorer matches to step `index`.
pub fn stroke_for(index: usize) -> Vec<Point> {
    let x = index as f64 * STROKE_SPACING;
    vec![Point::new(x, 5.0), Point::new(x, 45.0)]
}

/// Pen stroke the stub scorer matches to nothing.
pub fn scribble() -> Vec<Point> {
    vec![Point::new(-7.0, -7.0), Point::new(-3.0, -9.0)]
}

pub type StubController = TeachController<QueueScheduler, RecordingDisplay>;

pub fn controller(cards: &[&str]) -> StubController {
    controller_with(cards, &TeachConfig::default())
}

pub fn controller_with(cards: &[&str], config: &TeachConfig) -> StubController {
    TeachController::new(
        QueueScheduler::new(cards.iter().map(|w| card(w))),
        RecordingDisplay::new(),
        config,
    )
    .with_scorer(StubScorer)
    .with_simplifier(Passthrough)
}

pub fn lookup(entries: &[(&str, usize)]) -> StaticLookup {
    StaticLookup::new(entries.iter().map(|&(w, n)| character_data(w, n)))
}
