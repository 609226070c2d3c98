//! Session progress state machine
//!
//! Applies the outcome of each submitted stroke, and of the explicit reveal
//! commands, to a [`Session`]. Every mutation of session counters and `done`
//! flags goes through here, one transition at a time.
//!
//! Policy for a freshly matched stroke, with `expected` the lowest pending
//! step:
//!
//! - no match: one more mistake; at the mistake limit the expected stroke is
//!   revealed for a reveal penalty and the mistake count is kept
//! - match on a finished step: duplicate penalty, drawn stroke undone
//! - match on `expected`: step done, mistakes reset, next step highlighted
//! - match past `expected`: step done, skip penalty per skipped step, the
//!   expected stroke flashed as a re-prompt
//!
//! Finishing the last step grades the session. Any further event asks the
//! lifecycle to finalize it.

use crate::config::{PenaltyPolicy, TeachConfig};
use crate::display::DisplaySink;
use crate::grade::{grade, Grade};
use crate::matcher::{match_stroke, MatchScope, Scorer};
use crate::types::{MatchResult, Point, Session};

/// What a single event did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Stroke matched nothing; `revealed` is set when the mistake limit forced
    /// a reveal of the expected step
    Mistake {
        mistakes: u32,
        revealed: Option<usize>,
    },
    /// Stroke matched a step that was already drawn
    Duplicate { index: usize },
    /// Expected step drawn; `next` is highlighted
    Accepted { index: usize, next: usize },
    /// A later step drawn before the expected one
    OutOfOrder {
        index: usize,
        expected: usize,
        penalty: u32,
    },
    /// Last pending step drawn and the session graded
    Completed { index: usize, grade: Grade },
    /// Expected step revealed on request
    Hinted { index: usize },
    /// All strokes shown without penalty
    Peeked { expected: usize },
    /// Event received after completion; the session should be finalized
    Finalize,
}

#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    policy: PenaltyPolicy,
    scope: MatchScope,
}

impl ProgressTracker {
    pub fn new(policy: PenaltyPolicy, scope: MatchScope) -> Self {
        Self { policy, scope }
    }

    pub fn from_config(config: &TeachConfig) -> Self {
        Self::new(config.penalties.clone(), config.match_scope)
    }

    pub fn policy(&self) -> &PenaltyPolicy {
        &self.policy
    }

    /// Match a simplified candidate stroke and apply the outcome.
    pub fn on_stroke<S, D>(
        &self,
        session: &mut Session,
        candidate: &[Point],
        scorer: &S,
        display: &mut D,
    ) -> Transition
    where
        S: Scorer + ?Sized,
        D: DisplaySink + ?Sized,
    {
        let Some(expected) = session.expected() else {
            return Transition::Finalize;
        };
        let result = match_stroke(candidate, session.steps(), expected, scorer, self.scope);
        self.apply_match(session, &result, display)
    }

    /// Apply an already computed match result.
    pub fn apply_match<D>(
        &self,
        session: &mut Session,
        result: &MatchResult,
        display: &mut D,
    ) -> Transition
    where
        D: DisplaySink + ?Sized,
    {
        let missing = session.missing();
        let Some(&expected) = missing.first() else {
            return Transition::Finalize;
        };

        let index = match result.best_index {
            Some(i) if i < session.steps().len() => i,
            Some(i) => {
                debug_assert!(false, "match index {i} out of range");
                return self.on_no_match(session, expected, display);
            }
            None => return self.on_no_match(session, expected, display),
        };

        if session.steps()[index].done {
            session.add_penalty(self.policy.duplicate_penalty);
            display.undo();
            display.flash(&session.steps()[index].reference.stroke);
            tracing::debug!(index, penalties = session.penalties(), "duplicate stroke");
            return Transition::Duplicate { index };
        }

        debug_assert!(
            index >= expected,
            "pending step {index} below expected step {expected}"
        );

        session.mark_done(index);
        let reference = &session.steps()[index].reference;
        let rotate = reference.median.len() == 2;
        display.commit(&reference.stroke, rotate, result.source, result.target);
        if let Some(warning) = &result.warning {
            display.warn(warning);
            session.add_penalty(self.policy.warning.penalty());
        }

        if missing.len() == 1 {
            let graded = grade(session.penalties());
            session.set_grade(graded);
            display.glow(graded);
            display.highlight(None);
            tracing::debug!(
                index,
                penalties = session.penalties(),
                grade = graded.value(),
                "character complete"
            );
            return Transition::Completed {
                index,
                grade: graded,
            };
        }

        if index > expected {
            let skipped = u32::try_from(index - expected).unwrap_or(u32::MAX);
            let penalty = self.policy.skip_penalty.saturating_mul(skipped);
            session.add_penalty(penalty);
            display.flash(&session.steps()[expected].reference.stroke);
            tracing::debug!(index, expected, penalty, "stroke out of order");
            return Transition::OutOfOrder {
                index,
                expected,
                penalty,
            };
        }

        let next = missing[1];
        session.reset_mistakes();
        display.highlight(Some(session.steps()[next].reference.stroke.as_str()));
        Transition::Accepted { index, next }
    }

    /// Reveal the expected stroke for the reveal penalty.
    pub fn reveal_one<D>(&self, session: &mut Session, display: &mut D) -> Transition
    where
        D: DisplaySink + ?Sized,
    {
        let Some(expected) = session.expected() else {
            return Transition::Finalize;
        };
        session.add_penalty(self.policy.reveal_penalty);
        display.flash(&session.steps()[expected].reference.stroke);
        tracing::debug!(index = expected, penalties = session.penalties(), "hint requested");
        Transition::Hinted { index: expected }
    }

    /// Show every stroke without touching counters or progress.
    pub fn reveal_all<D>(&self, session: &Session, display: &mut D) -> Transition
    where
        D: DisplaySink + ?Sized,
    {
        let Some(expected) = session.expected() else {
            return Transition::Finalize;
        };
        let strokes: Vec<String> = session
            .steps()
            .iter()
            .map(|step| step.reference.stroke.clone())
            .collect();
        display.reveal(&strokes);
        display.highlight(Some(session.steps()[expected].reference.stroke.as_str()));
        Transition::Peeked { expected }
    }

    fn on_no_match<D>(&self, session: &mut Session, expected: usize, display: &mut D) -> Transition
    where
        D: DisplaySink + ?Sized,
    {
        let mistakes = session.record_mistake();
        display.fade();

        let mut revealed = None;
        if mistakes >= self.policy.max_mistakes {
            session.add_penalty(self.policy.reveal_penalty);
            display.flash(&session.steps()[expected].reference.stroke);
            revealed = Some(expected);
        }
        tracing::debug!(mistakes, forced_reveal = revealed.is_some(), "stroke not recognised");

        Transition::Mistake { mistakes, revealed }
    }
}
