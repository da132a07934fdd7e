//! Spaced repetition grading.

pub mod sm2;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{CardState, LearningState};

/// Scheduling inputs for one card: the mutable slice of [`CardState`]
/// the algorithm actually reads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sm2Parameters {
    pub repetitions: u32,
    pub ease_factor: f64,
    pub interval: u32,
}

impl From<&CardState> for Sm2Parameters {
    fn from(card: &CardState) -> Self {
        Self {
            repetitions: card.repetitions,
            ease_factor: card.ease_factor,
            interval: card.interval,
        }
    }
}

/// Output of grading a single review.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sm2Result {
    pub repetitions: u32,
    pub ease_factor: f64,
    pub interval: u32,
    pub due_date: NaiveDate,
    pub learning_state: LearningState,
}

impl Sm2Result {
    /// Parameters for the follow-up review, used when chaining
    /// simulated reviews.
    pub fn parameters(&self) -> Sm2Parameters {
        Sm2Parameters {
            repetitions: self.repetitions,
            ease_factor: self.ease_factor,
            interval: self.interval,
        }
    }
}
