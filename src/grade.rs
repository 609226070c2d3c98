use serde::{Deserialize, Serialize};

use crate::types::MAX_PENALTIES;

/// Review grade for one character. Lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Grade {
    Clean = 1,
    Shaky = 2,
    Failed = 3,
}

impl Grade {
    pub const fn value(self) -> u8 {
        self as u8
    }

    pub const fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Clean),
            2 => Some(Self::Shaky),
            3 => Some(Self::Failed),
            _ => None,
        }
    }
}

impl From<Grade> for u8 {
    fn from(grade: Grade) -> Self {
        grade.value()
    }
}

impl TryFrom<u8> for Grade {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_value(value).ok_or_else(|| format!("grade out of range: {value}"))
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// `min(floor(2p / 4) + 1, 3)`: one grade step per two penalty points.
pub fn grade(penalties: u32) -> Grade {
    let step = (2 * u64::from(penalties)) / u64::from(MAX_PENALTIES);
    match step {
        0 => Grade::Clean,
        1 => Grade::Shaky,
        _ => Grade::Failed,
    }
}
