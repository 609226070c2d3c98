//! In-memory scheduler and lookup, for replays and tests.

use std::collections::{HashMap, VecDeque};
use std::path::Path;

use crate::grade::Grade;
use crate::lifecycle::{Lookup, LookupError, Scheduler};
use crate::types::{CharacterData, CharacterRef};

/// FIFO review queue. A retry request rotates the head card to the back.
#[derive(Debug, Default)]
pub struct QueueScheduler {
    queue: VecDeque<CharacterRef>,
    completed: Vec<(CharacterRef, Grade)>,
    retries: u32,
}

impl QueueScheduler {
    pub fn new(cards: impl IntoIterator<Item = CharacterRef>) -> Self {
        Self {
            queue: cards.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn push(&mut self, card: CharacterRef) {
        self.queue.push_back(card);
    }

    /// Drop the head card without grading it.
    pub fn skip(&mut self) -> Option<CharacterRef> {
        self.queue.pop_front()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn completed(&self) -> &[(CharacterRef, Grade)] {
        &self.completed
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }
}

impl Scheduler for QueueScheduler {
    fn next_scheduled(&self) -> Option<CharacterRef> {
        self.queue.front().cloned()
    }

    fn complete_card(&mut self, card: &CharacterRef, grade: Grade) {
        if let Some(position) = self.queue.iter().position(|queued| queued == card) {
            self.queue.remove(position);
        }
        self.completed.push((card.clone(), grade));
    }

    fn request_retry(&mut self) {
        self.retries = self.retries.saturating_add(1);
        if !self.queue.is_empty() {
            self.queue.rotate_left(1);
        }
    }
}

/// Lookup over a fixed set of entries keyed by word.
#[derive(Debug, Default, Clone)]
pub struct StaticLookup {
    entries: HashMap<String, CharacterData>,
}

impl StaticLookup {
    pub fn new(entries: impl IntoIterator<Item = CharacterData>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|data| (data.word.clone(), data))
                .collect(),
        }
    }

    pub fn insert(&mut self, data: CharacterData) {
        self.entries.insert(data.word.clone(), data);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a JSON array of entries.
    pub fn from_json_str(json: &str) -> Result<Self, LookupError> {
        let entries: Vec<CharacterData> = serde_json::from_str(json)?;
        Ok(Self::new(entries))
    }

    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LookupError> {
        let json = tokio::fs::read_to_string(path).await?;
        Self::from_json_str(&json)
    }
}

impl Lookup for StaticLookup {
    async fn by_word(&self, word: &str) -> Result<CharacterData, LookupError> {
        self.entries
            .get(word)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(word.to_string()))
    }
}
