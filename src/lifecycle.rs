//! Session lifecycle
//!
//! [`TeachController`] owns the one live [`Session`]. It loads characters
//! from the scheduler's queue through an asynchronous [`Lookup`], routes pen
//! input and commands to the [`ProgressTracker`], and reports finished
//! sessions back to the scheduler.
//!
//! Loading is split into a ticket and a response so the lookup future can be
//! held across scheduler changes. A response is only applied if the card it
//! was requested for is still the scheduler's next card when it arrives.
//!
//! The ticket (and the response built from it) holds the controller's single
//! load slot. Dropping either one, including a cancelled `load_character`
//! future, frees the slot.

use std::future::Future;
use std::sync::{Arc, Weak};
use std::time::Duration;

use thiserror::Error;

use crate::config::TeachConfig;
use crate::corners::{AngleCornerExtractor, CornerExtractor};
use crate::display::DisplaySink;
use crate::grade::Grade;
use crate::matcher::Scorer;
use crate::recognizer::MedianRecognizer;
use crate::shortstraw::{Shortstraw, StrokeSimplifier};
use crate::tracker::{ProgressTracker, Transition};
use crate::types::{
    Character, CharacterData, CharacterMetadata, CharacterRef, Point, ReferenceStroke, Session,
};

// ==================== Collaborators ====================

/// Review scheduler deciding which character comes next.
pub trait Scheduler {
    fn next_scheduled(&self) -> Option<CharacterRef>;
    fn complete_card(&mut self, card: &CharacterRef, grade: Grade);
    fn request_retry(&mut self);
}

/// Character data source.
pub trait Lookup {
    fn by_word(
        &self,
        word: &str,
    ) -> impl Future<Output = Result<CharacterData, LookupError>> + Send;
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("lookup unavailable: {0}")]
    Unavailable(String),
    #[error("no entry for word: {0}")]
    NotFound(String),
    #[error("entry for {word} has no strokes")]
    Empty { word: String },
    #[error("entry for {word} has {strokes} strokes but {medians} medians")]
    Malformed {
        word: String,
        strokes: usize,
        medians: usize,
    },
    #[error("JSON decode failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
}

// ==================== Loading ====================

/// An issued load for one scheduled card.
#[derive(Debug)]
pub struct LoadTicket {
    slot: Arc<CharacterRef>,
}

impl LoadTicket {
    pub fn requested(&self) -> &CharacterRef {
        &self.slot
    }

    pub async fn resolve<L: Lookup>(self, lookup: &L) -> LoadResponse {
        let result = lookup.by_word(&self.slot.word).await;
        self.respond(result)
    }

    /// Attach a result obtained some other way.
    pub fn respond(self, result: Result<CharacterData, LookupError>) -> LoadResponse {
        LoadResponse {
            slot: self.slot,
            result,
        }
    }
}

/// Lookup result tagged with the card it was requested for.
#[derive(Debug)]
pub struct LoadResponse {
    slot: Arc<CharacterRef>,
    result: Result<CharacterData, LookupError>,
}

impl LoadResponse {
    pub fn requested(&self) -> &CharacterRef {
        &self.slot
    }

    pub fn result(&self) -> &Result<CharacterData, LookupError> {
        &self.result
    }
}

#[derive(Debug)]
pub enum LoadOutcome {
    /// Scheduler had nothing to review
    Idle,
    /// Another lookup is still in flight
    Busy,
    Loaded(CharacterRef),
    /// Scheduler moved on while the lookup ran; result dropped
    Stale { requested: CharacterRef },
    /// Lookup failed; the session was left untouched
    Failed(LookupError),
}

// ==================== Controller ====================

pub struct TeachController<S, D> {
    scheduler: S,
    display: D,
    scorer: Box<dyn Scorer>,
    simplifier: Box<dyn StrokeSimplifier>,
    corners: Box<dyn CornerExtractor>,
    tracker: ProgressTracker,
    retry_delay: Duration,
    session: Option<Session>,
    metadata: Option<CharacterMetadata>,
    in_flight: Weak<CharacterRef>,
}

impl<S, D> TeachController<S, D>
where
    S: Scheduler,
    D: DisplaySink,
{
    pub fn new(scheduler: S, display: D, config: &TeachConfig) -> Self {
        Self {
            scheduler,
            display,
            scorer: Box::new(MedianRecognizer::default()),
            simplifier: Box::new(Shortstraw::default()),
            corners: Box::new(AngleCornerExtractor::default()),
            tracker: ProgressTracker::from_config(config),
            retry_delay: config.retry_delay,
            session: None,
            metadata: None,
            in_flight: Weak::new(),
        }
    }

    pub fn with_scorer(mut self, scorer: impl Scorer + 'static) -> Self {
        self.scorer = Box::new(scorer);
        self
    }

    pub fn with_simplifier(mut self, simplifier: impl StrokeSimplifier + 'static) -> Self {
        self.simplifier = Box::new(simplifier);
        self
    }

    pub fn with_corner_extractor(mut self, corners: impl CornerExtractor + 'static) -> Self {
        self.corners = Box::new(corners);
        self
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn metadata(&self) -> Option<&CharacterMetadata> {
        self.metadata.as_ref()
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.strong_count() > 0
    }

    /// Issue a load for the scheduler's next card.
    ///
    /// Returns `None` when a load is already in flight or nothing is
    /// scheduled. The slot stays taken until the ticket, or the response
    /// resolved from it, is handed to [`complete_load`](Self::complete_load)
    /// or dropped.
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        if let Some(pending) = self.in_flight.upgrade() {
            tracing::debug!(word = %pending.word, "lookup already in flight");
            return None;
        }
        let slot = Arc::new(self.scheduler.next_scheduled()?);
        self.in_flight = Arc::downgrade(&slot);
        Some(LoadTicket { slot })
    }

    /// Apply a lookup response.
    pub fn complete_load(&mut self, response: LoadResponse) -> LoadOutcome {
        let LoadResponse { slot, result } = response;
        debug_assert!(
            self.in_flight
                .upgrade()
                .map_or(true, |pending| Arc::ptr_eq(&pending, &slot)),
            "response from a ticket this controller did not issue"
        );
        self.in_flight = Weak::new();
        let requested = CharacterRef::clone(&slot);

        let data = match result {
            Ok(data) => data,
            Err(err) => {
                tracing::error!(word = %requested.word, error = %err, "character lookup failed");
                return LoadOutcome::Failed(err);
            }
        };

        let current = self.scheduler.next_scheduled();
        if current.as_ref() != Some(&requested) || data.word != requested.word {
            tracing::debug!(
                requested = %requested.word,
                current = current.as_ref().map(|c| c.word.as_str()).unwrap_or("-"),
                "dropping stale character lookup"
            );
            return LoadOutcome::Stale { requested };
        }

        let character = match self.build_character(&data) {
            Ok(character) => character,
            Err(err) => {
                tracing::error!(word = %requested.word, error = %err, "character data rejected");
                return LoadOutcome::Failed(err);
            }
        };

        let strokes = character.strokes.len();
        self.display.clear();
        self.session = Some(Session::new(requested.clone(), character));
        self.metadata = Some(CharacterMetadata::from(&data));
        tracing::info!(word = %requested.word, strokes, "character loaded");

        LoadOutcome::Loaded(requested)
    }

    /// Load the scheduler's next card, asking for a retry after a failure.
    pub async fn load_character<L: Lookup>(&mut self, lookup: &L) -> LoadOutcome {
        if self.is_loading() {
            return LoadOutcome::Busy;
        }
        let Some(ticket) = self.begin_load() else {
            return LoadOutcome::Idle;
        };

        let response = ticket.resolve(lookup).await;
        let outcome = self.complete_load(response);
        if matches!(outcome, LoadOutcome::Failed(_)) {
            self.retry_later().await;
        }
        outcome
    }

    /// Wait out the retry delay, then ask the scheduler to try again.
    pub async fn retry_later(&mut self) {
        tokio::time::sleep(self.retry_delay).await;
        self.scheduler.request_retry();
    }

    // ==================== Input ====================

    /// Handle one raw pen stroke. Returns `None` when no character is loaded.
    pub fn on_stroke(&mut self, raw: &[Point]) -> Option<Transition> {
        let Some(session) = self.session.as_mut() else {
            tracing::debug!("stroke ignored: no character loaded");
            return None;
        };

        let candidate = self.simplifier.simplify(raw);
        let transition =
            self.tracker
                .on_stroke(session, &candidate, self.scorer.as_ref(), &mut self.display);
        Some(self.settle(transition))
    }

    /// Reveal the expected stroke for a penalty, or finalize a finished session.
    pub fn reveal_one(&mut self) -> Option<Transition> {
        let session = self.session.as_mut()?;
        let transition = self.tracker.reveal_one(session, &mut self.display);
        Some(self.settle(transition))
    }

    /// Show all strokes without penalty, or finalize a finished session.
    pub fn reveal_all(&mut self) -> Option<Transition> {
        let session = self.session.as_ref()?;
        let transition = self.tracker.reveal_all(session, &mut self.display);
        Some(self.settle(transition))
    }

    /// Finalize the session if every stroke is drawn; otherwise do nothing.
    pub fn advance(&mut self) -> Option<Transition> {
        if !self.session.as_ref()?.is_complete() {
            return None;
        }
        Some(self.settle(Transition::Finalize))
    }

    fn settle(&mut self, transition: Transition) -> Transition {
        if transition == Transition::Finalize {
            self.finalize();
        }
        transition
    }

    fn finalize(&mut self) {
        let graded = match self.session.as_ref().map(Session::grade) {
            None => return,
            Some(Some(graded)) => graded,
            Some(None) => {
                debug_assert!(false, "finalizing an ungraded session");
                tracing::warn!("finalize requested before the last stroke was drawn");
                return;
            }
        };
        let Some(session) = self.session.take() else {
            return;
        };

        self.display.clear();
        self.scheduler.complete_card(session.card(), graded);
        tracing::info!(
            word = %session.card().word,
            grade = graded.value(),
            penalties = session.penalties(),
            "character finalized"
        );
    }

    fn build_character(&self, data: &CharacterData) -> Result<Character, LookupError> {
        let row = data
            .characters
            .first()
            .filter(|row| !row.strokes.is_empty() || !row.medians.is_empty())
            .ok_or_else(|| LookupError::Empty {
                word: data.word.clone(),
            })?;
        if row.strokes.len() != row.medians.len() {
            return Err(LookupError::Malformed {
                word: data.word.clone(),
                strokes: row.strokes.len(),
                medians: row.medians.len(),
            });
        }

        let strokes = row
            .strokes
            .iter()
            .zip(&row.medians)
            .map(|(stroke, median)| ReferenceStroke {
                median: self.corners.extract(median),
                stroke: stroke.clone(),
            })
            .collect();
        Ok(Character { strokes })
    }
}
