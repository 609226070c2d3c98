use std::collections::HashMap;
use std::process::ExitCode;

use serde::{Deserialize, Serialize};

use danci_handwriting::config::TeachConfig;
use danci_handwriting::logging::init_tracing;
use danci_handwriting::{
    CharacterData, CharacterRef, LoadOutcome, Point, QueueScheduler, StaticLookup,
    TeachController, TracingDisplay,
};

/// Characters to review plus the recorded pen strokes for each word.
#[derive(Debug, Deserialize)]
struct ReplayFixture {
    characters: Vec<CharacterData>,
    #[serde(default)]
    attempts: HashMap<String, Vec<Vec<Point>>>,
}

#[derive(Debug, Serialize)]
struct ReplaySummary {
    word: String,
    grade: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let config = TeachConfig::from_env();
    let _log_guard = init_tracing(&config.logging);

    if let Err(err) = config.validate() {
        tracing::error!(error = %err, "invalid configuration");
        return ExitCode::from(2);
    }

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: danci-handwriting <fixture.json>");
        return ExitCode::from(2);
    };

    let fixture: ReplayFixture = match tokio::fs::read_to_string(&path).await {
        Ok(json) => match serde_json::from_str(&json) {
            Ok(fixture) => fixture,
            Err(err) => {
                tracing::error!(%path, error = %err, "fixture parse failed");
                return ExitCode::FAILURE;
            }
        },
        Err(err) => {
            tracing::error!(%path, error = %err, "fixture read failed");
            return ExitCode::FAILURE;
        }
    };

    let cards = fixture
        .characters
        .iter()
        .enumerate()
        .map(|(i, data)| CharacterRef::new(format!("card-{i}"), data.word.clone()));
    let scheduler = QueueScheduler::new(cards);
    let lookup = StaticLookup::new(fixture.characters);
    let mut controller = TeachController::new(scheduler, TracingDisplay, &config);

    let mut failures = 0usize;
    loop {
        match controller.load_character(&lookup).await {
            LoadOutcome::Idle => break,
            LoadOutcome::Loaded(card) => {
                failures = 0;
                replay_card(&mut controller, &card, &fixture.attempts);
            }
            LoadOutcome::Failed(_) => {
                failures += 1;
                if failures > controller.scheduler().pending() {
                    tracing::error!("no remaining character could be loaded");
                    break;
                }
            }
            LoadOutcome::Stale { .. } | LoadOutcome::Busy => {}
        }
    }

    let summary: Vec<ReplaySummary> = controller
        .scheduler()
        .completed()
        .iter()
        .map(|(card, grade)| ReplaySummary {
            word: card.word.clone(),
            grade: grade.value(),
        })
        .collect();
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            tracing::error!(error = %err, "summary encode failed");
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}

fn replay_card(
    controller: &mut TeachController<QueueScheduler, TracingDisplay>,
    card: &CharacterRef,
    attempts: &HashMap<String, Vec<Vec<Point>>>,
) {
    let strokes = attempts.get(&card.word).map(Vec::as_slice).unwrap_or_default();
    for stroke in strokes {
        if let Some(transition) = controller.on_stroke(stroke) {
            tracing::info!(word = %card.word, ?transition, "stroke replayed");
        }
    }

    if controller.session().is_none() {
        return;
    }
    if controller.advance().is_none() {
        tracing::warn!(word = %card.word, "recorded strokes do not finish the character; skipping");
        controller.scheduler_mut().skip();
    }
}
