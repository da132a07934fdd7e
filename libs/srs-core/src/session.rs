//! Single study pass over an ordered queue of cards.
//!
//! The session is single-owner state: one learner, one queue, one pass.
//! Each `rate` call produces one atomic new [`CardState`] which the
//! caller is expected to persist before advancing.

use std::time::{Duration, Instant};

use chrono::Utc;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::algorithm::sm2::Sm2;
use crate::error::{Result, SchedulingError};
use crate::types::{CardState, Rating, ReviewRecord};

/// Where the session is within the flip/rate cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    AwaitingFlip,
    AwaitingRating,
    Complete,
}

impl SessionPhase {
    fn name(self) -> &'static str {
        match self {
            Self::AwaitingFlip => "awaiting_flip",
            Self::AwaitingRating => "awaiting_rating",
            Self::Complete => "complete",
        }
    }
}

/// Count of reviews per rating value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingHistogram {
    pub again: u32,
    pub hard: u32,
    pub good: u32,
    pub easy: u32,
}

impl RatingHistogram {
    fn record(&mut self, rating: Rating) {
        match rating {
            Rating::Again => self.again += 1,
            Rating::Hard => self.hard += 1,
            Rating::Good => self.good += 1,
            Rating::Easy => self.easy += 1,
        }
    }
}

/// Statistics for one completed session. Ephemeral, never persisted here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStats {
    pub total_reviewed: u32,
    pub average_rating: f64,
    /// Reviews rated Good or better.
    pub correct: u32,
    pub accuracy: f64,
    pub elapsed: Duration,
    pub histogram: RatingHistogram,
}

/// State machine for one study pass over a pre-ordered card queue.
#[derive(Debug)]
pub struct ReviewSession {
    grader: Sm2,
    cards: Vec<CardState>,
    /// Next ungraded card; grading always applies here.
    position: usize,
    /// Card currently displayed; navigation moves only this.
    cursor: usize,
    phase: SessionPhase,
    records: Vec<ReviewRecord>,
    started_at: Instant,
    stats: Option<SessionStats>,
}

impl ReviewSession {
    /// Start a session over an already-ordered queue. An empty queue
    /// completes immediately.
    pub fn new(grader: Sm2, cards: Vec<CardState>) -> Self {
        let mut session = Self {
            grader,
            cards,
            position: 0,
            cursor: 0,
            phase: SessionPhase::AwaitingFlip,
            records: Vec::new(),
            started_at: Instant::now(),
            stats: None,
        };
        if session.cards.is_empty() {
            session.complete();
        }
        session
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// The card currently displayed (the active card unless the learner
    /// navigated away). `None` only for an empty queue.
    pub fn current_card(&self) -> Option<&CardState> {
        self.cards.get(self.cursor)
    }

    pub fn records(&self) -> &[ReviewRecord] {
        &self.records
    }

    /// Available once the session is complete.
    pub fn stats(&self) -> Option<&SessionStats> {
        self.stats.as_ref()
    }

    /// Reveal the answer side of the active card.
    pub fn flip(&mut self) -> Result<()> {
        match self.phase {
            SessionPhase::AwaitingFlip => {
                self.cursor = self.position;
                self.phase = SessionPhase::AwaitingRating;
                Ok(())
            }
            other => Err(SchedulingError::InvalidTransition {
                action: "flip",
                phase: other.name(),
            }),
        }
    }

    /// Grade the active card and advance.
    ///
    /// Returns the updated state for the caller to persist before the
    /// next card is shown. Grading the last card completes the session
    /// and computes its statistics.
    pub fn rate(&mut self, rating: Rating) -> Result<CardState> {
        if self.phase != SessionPhase::AwaitingRating {
            return Err(SchedulingError::InvalidTransition {
                action: "rate",
                phase: self.phase.name(),
            });
        }

        let now = Utc::now();
        let graded = self.grader.grade(&self.cards[self.position], rating, now);
        self.records.push(ReviewRecord {
            card_id: graded.id,
            rating,
            timestamp: now,
            resulting_state: graded.clone(),
        });
        self.cards[self.position] = graded.clone();

        self.position += 1;
        if self.position >= self.cards.len() {
            self.complete();
        } else {
            self.phase = SessionPhase::AwaitingFlip;
        }
        // Snap the display back from wherever the learner navigated.
        self.cursor = self.position.min(self.cards.len().saturating_sub(1));

        Ok(graded)
    }

    /// Show the previous card without grading it.
    pub fn previous(&mut self) -> Result<()> {
        self.navigate("previous", |cursor, _| cursor.saturating_sub(1))
    }

    /// Show the next card without grading it.
    pub fn next(&mut self) -> Result<()> {
        self.navigate("next", |cursor, last| (cursor + 1).min(last))
    }

    fn navigate(
        &mut self,
        action: &'static str,
        move_cursor: impl Fn(usize, usize) -> usize,
    ) -> Result<()> {
        if self.phase == SessionPhase::Complete {
            return Err(SchedulingError::InvalidTransition {
                action,
                phase: self.phase.name(),
            });
        }
        self.cursor = move_cursor(self.cursor, self.cards.len().saturating_sub(1));
        Ok(())
    }

    /// Back to a fresh pass over the same queue, from any state.
    ///
    /// Cards keep their latest graded state; only the session-local
    /// progress, records, and timer are cleared.
    pub fn restart(&mut self) {
        self.position = 0;
        self.cursor = 0;
        self.records.clear();
        self.stats = None;
        self.started_at = Instant::now();
        self.phase = SessionPhase::AwaitingFlip;
        if self.cards.is_empty() {
            self.complete();
        }
    }

    fn complete(&mut self) {
        self.phase = SessionPhase::Complete;
        self.stats = Some(self.compute_stats());
        debug!("session complete: {} cards reviewed", self.records.len());
    }

    fn compute_stats(&self) -> SessionStats {
        let total = self.records.len() as u32;
        let mut histogram = RatingHistogram::default();
        let mut rating_sum = 0u32;
        let mut correct = 0u32;

        for record in &self.records {
            histogram.record(record.rating);
            rating_sum += u32::from(record.rating.to_value());
            if record.rating.is_correct() {
                correct += 1;
            }
        }

        let (average_rating, accuracy) = if total == 0 {
            (0.0, 0.0)
        } else {
            (
                f64::from(rating_sum) / f64::from(total),
                f64::from(correct) / f64::from(total),
            )
        };

        SessionStats {
            total_reviewed: total,
            average_rating,
            correct,
            accuracy,
            elapsed: self.started_at.elapsed(),
            histogram,
        }
    }
}
