//! # danci-handwriting - stroke-order handwriting grading
//!
//! Grades a learner's freehand reproduction of a character against its
//! canonical stroke decomposition, one stroke at a time. Strokes may be drawn
//! out of order; skipping ahead, redrawing finished strokes, unrecognised
//! strokes and hints all accrue penalties that map to a 1-3 review grade.
//!
//! ## Modules
//!
//! - [`matcher`] - picks the reference stroke a drawn stroke best matches
//! - [`tracker`] - per-character session state machine
//! - [`grade`] - penalty to grade mapping
//! - [`lifecycle`] - loads characters, routes input, reports grades
//! - [`display`] - display intent capability and stock sinks
//! - [`recognizer`], [`shortstraw`], [`corners`] - default geometry collaborators
//! - [`memory`] - in-memory scheduler and lookup
//! - [`config`], [`logging`] - environment configuration and tracing setup
//! - [`types`] - shared types and constants
//!
//! ## Example
//!
//! ```rust
//! use danci_handwriting::{grade, Grade};
//!
//! assert_eq!(grade(0), Grade::Clean);
//! assert_eq!(grade(4), Grade::Failed);
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod config;
pub mod corners;
pub mod display;
pub mod grade;
pub mod lifecycle;
pub mod logging;
pub mod matcher;
pub mod memory;
pub mod recognizer;
pub mod shortstraw;
pub mod tracker;
pub mod types;

// ============================================================================
// Re-exports
// ============================================================================

pub use types::*;

pub use config::{ConfigError, LogSettings, PenaltyPolicy, TeachConfig, WarningPolicy};
pub use corners::{AngleCornerExtractor, CornerExtractor};
pub use display::{DisplayIntent, DisplaySink, RecordingDisplay, TracingDisplay};
pub use grade::{grade, Grade};
pub use lifecycle::{
    LoadOutcome, LoadResponse, LoadTicket, Lookup, LookupError, Scheduler, TeachController,
};
pub use matcher::{match_stroke, MatchScope, Score, Scorer};
pub use memory::{QueueScheduler, StaticLookup};
pub use recognizer::MedianRecognizer;
pub use shortstraw::{Passthrough, Shortstraw, StrokeSimplifier};
pub use tracker::{ProgressTracker, Transition};
