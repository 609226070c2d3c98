//! Display capability
//!
//! The tracker never renders anything itself; it emits intents to a
//! [`DisplaySink`]. Any renderer implementing the capability set can be
//! plugged in. Intents are fire-and-forget and always reflect the session
//! state after the transition that produced them.

use serde::Serialize;

use crate::grade::Grade;
use crate::types::Transform;

pub trait DisplaySink {
    /// Briefly show a reference stroke as a hint.
    fn flash(&mut self, stroke: &str);
    /// Fade out the stroke the user just drew.
    fn fade(&mut self);
    /// Remove the stroke the user just drew.
    fn undo(&mut self);
    /// Show every reference stroke.
    fn reveal(&mut self, strokes: &[String]);
    /// Mark the stroke to draw next, or nothing.
    fn highlight(&mut self, stroke: Option<&str>);
    fn warn(&mut self, message: &str);
    fn glow(&mut self, grade: Grade);
    /// Replace the drawn stroke with the reference stroke.
    fn commit(&mut self, stroke: &str, rotate: bool, source: Transform, target: Transform);
    fn clear(&mut self);
}

/// Owned form of one display call.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "intent", rename_all = "camelCase")]
pub enum DisplayIntent {
    Flash { stroke: String },
    Fade,
    Undo,
    Reveal { strokes: Vec<String> },
    Highlight { stroke: Option<String> },
    Warn { message: String },
    Glow { grade: Grade },
    Commit {
        stroke: String,
        rotate: bool,
        source: Transform,
        target: Transform,
    },
    Clear,
}

/// Sink that keeps every intent in order; used headless and in tests.
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    intents: Vec<DisplayIntent>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intents(&self) -> &[DisplayIntent] {
        &self.intents
    }

    /// Drain recorded intents.
    pub fn take(&mut self) -> Vec<DisplayIntent> {
        std::mem::take(&mut self.intents)
    }

    fn push(&mut self, intent: DisplayIntent) {
        self.intents.push(intent);
    }
}

impl DisplaySink for RecordingDisplay {
    fn flash(&mut self, stroke: &str) {
        self.push(DisplayIntent::Flash {
            stroke: stroke.to_string(),
        });
    }

    fn fade(&mut self) {
        self.push(DisplayIntent::Fade);
    }

    fn undo(&mut self) {
        self.push(DisplayIntent::Undo);
    }

    fn reveal(&mut self, strokes: &[String]) {
        self.push(DisplayIntent::Reveal {
            strokes: strokes.to_vec(),
        });
    }

    fn highlight(&mut self, stroke: Option<&str>) {
        self.push(DisplayIntent::Highlight {
            stroke: stroke.map(str::to_string),
        });
    }

    fn warn(&mut self, message: &str) {
        self.push(DisplayIntent::Warn {
            message: message.to_string(),
        });
    }

    fn glow(&mut self, grade: Grade) {
        self.push(DisplayIntent::Glow { grade });
    }

    fn commit(&mut self, stroke: &str, rotate: bool, source: Transform, target: Transform) {
        self.push(DisplayIntent::Commit {
            stroke: stroke.to_string(),
            rotate,
            source,
            target,
        });
    }

    fn clear(&mut self) {
        self.push(DisplayIntent::Clear);
    }
}

/// Sink that logs intents through `tracing`, for the replay binary.
#[derive(Debug, Default)]
pub struct TracingDisplay;

impl DisplaySink for TracingDisplay {
    fn flash(&mut self, stroke: &str) {
        tracing::info!(%stroke, "flash");
    }

    fn fade(&mut self) {
        tracing::info!("fade");
    }

    fn undo(&mut self) {
        tracing::info!("undo");
    }

    fn reveal(&mut self, strokes: &[String]) {
        tracing::info!(count = strokes.len(), "reveal");
    }

    fn highlight(&mut self, stroke: Option<&str>) {
        tracing::debug!(stroke = stroke.unwrap_or("-"), "highlight");
    }

    fn warn(&mut self, message: &str) {
        tracing::warn!(%message, "stroke warning");
    }

    fn glow(&mut self, grade: Grade) {
        tracing::info!(grade = grade.value(), "glow");
    }

    fn commit(&mut self, stroke: &str, rotate: bool, _source: Transform, _target: Transform) {
        tracing::info!(%stroke, rotate, "commit");
    }

    fn clear(&mut self) {
        tracing::debug!("clear");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_display_keeps_order() {
        let mut display = RecordingDisplay::new();
        display.fade();
        display.flash("a");
        display.highlight(None);
        display.glow(Grade::Shaky);

        assert_eq!(
            display.intents(),
            &[
                DisplayIntent::Fade,
                DisplayIntent::Flash {
                    stroke: "a".to_string()
                },
                DisplayIntent::Highlight { stroke: None },
                DisplayIntent::Glow {
                    grade: Grade::Shaky
                },
            ]
        );
    }

    #[test]
    fn test_take_drains() {
        let mut display = RecordingDisplay::new();
        display.undo();
        display.clear();
        assert_eq!(display.take().len(), 2);
        assert!(display.intents().is_empty());
    }

    #[test]
    fn test_intent_serializes_with_tag() {
        let json = serde_json::to_value(DisplayIntent::Warn {
            message: "Stroke backwards".to_string(),
        })
        .unwrap();
        assert_eq!(json["intent"], "warn");
        assert_eq!(json["message"], "Stroke backwards");
    }
}
