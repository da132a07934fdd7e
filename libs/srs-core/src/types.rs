//! Core types for the spaced repetition scheduling engine.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SchedulingError;

/// Opaque card identifier, assigned by the storage layer.
pub type CardId = i64;

/// Default ease factor for new cards.
pub const INITIAL_EASE_FACTOR: f64 = 2.5;

/// Card learning state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningState {
    New,
    Learning,
    Review,
    Relearning,
}

impl Default for LearningState {
    fn default() -> Self {
        Self::New
    }
}

impl LearningState {
    /// Queue priority: lower sorts first. Cards mid-learning always
    /// surface before reviews and new cards.
    pub fn priority(self) -> u8 {
        match self {
            Self::Learning => 0,
            Self::Relearning => 1,
            Self::Review => 2,
            Self::New => 3,
        }
    }
}

/// Rating for a review on the 4-point scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Again,
    Hard,
    Good,
    Easy,
}

impl Rating {
    /// Convert to 4-point numeric value (1-4).
    pub fn to_value(self) -> u8 {
        match self {
            Self::Again => 1,
            Self::Hard => 2,
            Self::Good => 3,
            Self::Easy => 4,
        }
    }

    /// Whether the review counts as successful recall (Good or better).
    pub fn is_correct(self) -> bool {
        self.to_value() >= Self::Good.to_value()
    }
}

impl TryFrom<u8> for Rating {
    type Error = SchedulingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Again),
            2 => Ok(Self::Hard),
            3 => Ok(Self::Good),
            4 => Ok(Self::Easy),
            other => Err(SchedulingError::InvalidRating(other)),
        }
    }
}

/// Persisted scheduling record for one flashcard.
///
/// Owned by the storage layer; this crate only computes its next value.
/// Serialized field names are the persistence contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardState {
    pub id: CardId,
    /// Consecutive successful reviews since the last lapse.
    pub repetitions: u32,
    /// Interval growth multiplier, never below 1.3.
    pub ease_factor: f64,
    /// Days until the next review; 0 only before the first review.
    pub interval: u32,
    /// Start-of-day due date: last review day plus `interval`.
    pub due_date: NaiveDate,
    pub learning_state: LearningState,
    /// Lifetime count of Again ratings. Monotonic, never reset.
    pub lapses: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<DateTime<Utc>>,
}

impl CardState {
    /// State for a freshly authored card, due immediately.
    pub fn new(id: CardId, today: NaiveDate) -> Self {
        Self {
            id,
            repetitions: 0,
            ease_factor: INITIAL_EASE_FACTOR,
            interval: 0,
            due_date: today,
            learning_state: LearningState::New,
            lapses: 0,
            last_reviewed: None,
        }
    }
}

/// One entry of a card's append-only review history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub card_id: CardId,
    pub rating: Rating,
    pub timestamp: DateTime<Utc>,
    pub resulting_state: CardState,
}
