//! Batch scheduling over a snapshot of card states.
//!
//! Everything here is read-only and idempotent: recomputing against a
//! slightly stale snapshot can only yield a stale ordering, never a
//! corrupted one.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::algorithm::sm2::Sm2;
use crate::algorithm::Sm2Parameters;
use crate::types::{CardId, CardState, Rating};

/// Hours of the day at which suggested study sessions are anchored.
const SESSION_START_HOURS: [u32; 5] = [9, 12, 15, 18, 21];

/// Tunable scheduling parameters.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Daily study budget in minutes.
    pub target_daily_minutes: f64,
    /// Average review time per card in minutes.
    pub avg_minutes_per_card: f64,
    /// New cards cost this multiple of a normal review.
    pub new_card_cost_factor: f64,
    pub max_new_cards_per_day: u32,
    /// Length of a single suggested session.
    pub session_minutes: u32,
    pub max_sessions: usize,
    /// Interval at which a card counts as mature.
    pub mature_interval: u32,
    /// Safety cap for maturity simulation.
    pub maturity_cap_days: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            target_daily_minutes: 30.0,
            avg_minutes_per_card: 0.5,
            new_card_cost_factor: 2.0,
            max_new_cards_per_day: 20,
            session_minutes: 30,
            max_sessions: 5,
            mature_interval: 21,
            maturity_cap_days: 365,
        }
    }
}

/// One suggested study block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub start: NaiveTime,
    pub minutes: u32,
}

/// Suggested layout for a day's studying. Advisory, never enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlan {
    pub estimated_minutes: u32,
    pub sessions: Vec<StudySession>,
}

/// Batch operations over many card states.
#[derive(Debug, Clone, Default)]
pub struct DeckScheduler {
    pub config: SchedulerConfig,
}

impl DeckScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// Order cards for study: by state priority, then by due date.
    ///
    /// Learning and relearning cards always come before reviews and new
    /// cards, however overdue the latter are, so partially learned cards
    /// are never abandoned.
    pub fn prioritize(&self, cards: &[CardState]) -> Vec<CardId> {
        let mut order: Vec<&CardState> = cards.iter().collect();
        order.sort_by_key(|card| (card.learning_state.priority(), card.due_date));
        order.into_iter().map(|card| card.id).collect()
    }

    /// Count cards due per day over `days` starting at `today`.
    ///
    /// The map is dense: every day in the horizon appears, zero-filled.
    /// Overdue cards count toward today; due dates past the horizon are
    /// not included.
    pub fn forecast_workload(
        &self,
        cards: &[CardState],
        days: u32,
        today: NaiveDate,
    ) -> BTreeMap<NaiveDate, usize> {
        let mut forecast: BTreeMap<NaiveDate, usize> = (0..days)
            .map(|offset| (today + Duration::days(i64::from(offset)), 0))
            .collect();

        for card in cards {
            let day = card.due_date.max(today);
            if let Some(count) = forecast.get_mut(&day) {
                *count += 1;
            }
        }

        forecast
    }

    /// Lay out the day's workload into at most five 30-minute blocks.
    pub fn suggest_study_time(
        &self,
        due_count: u32,
        new_cards_target: u32,
        avg_minutes_per_card: f64,
    ) -> StudyPlan {
        let estimated_minutes =
            (f64::from(due_count + new_cards_target) * avg_minutes_per_card).ceil() as u32;

        let block = self.config.session_minutes;
        let mut sessions = Vec::new();
        let mut remaining = estimated_minutes;
        while remaining > 0 && sessions.len() < self.config.max_sessions {
            let minutes = remaining.min(block);
            let hour = SESSION_START_HOURS[sessions.len()];
            sessions.push(StudySession {
                start: NaiveTime::from_hms_opt(hour, 0, 0).expect("valid session hour"),
                minutes,
            });
            remaining -= minutes;
        }

        StudyPlan {
            estimated_minutes,
            sessions,
        }
    }

    /// How many new cards fit into today's remaining time budget.
    ///
    /// New cards are budgeted at double the per-card review time, and the
    /// result is clamped to the daily introduction cap.
    pub fn recommended_new_cards(&self, current_review_count: u32) -> u32 {
        let review_time = f64::from(current_review_count) * self.config.avg_minutes_per_card;
        let remaining = (self.config.target_daily_minutes - review_time).max(0.0);
        let per_new_card = self.config.avg_minutes_per_card * self.config.new_card_cost_factor;
        let fit = (remaining / per_new_card).floor() as u32;
        fit.min(self.config.max_new_cards_per_day)
    }

    /// Estimate the days until a card reaches a mature interval, assuming
    /// every future review is rated Good.
    ///
    /// The Good branch is deterministic, so a single replay suffices.
    /// Capped at `maturity_cap_days` for cards whose interval cannot grow
    /// past the threshold (ease pinned at the minimum).
    pub fn estimate_maturity_time(&self, sm2: &Sm2, params: Sm2Parameters) -> u32 {
        // Only interval deltas matter; any anchor date works.
        let anchor = NaiveDate::from_ymd_opt(2000, 1, 1).expect("valid anchor date");

        if params.interval >= self.config.mature_interval {
            return 0;
        }

        let mut params = params;
        let mut elapsed = 0u32;
        loop {
            let result = sm2.calculate(Rating::Good, &params, anchor);
            if result.interval >= self.config.mature_interval {
                return elapsed;
            }
            elapsed += result.interval;
            if elapsed >= self.config.maturity_cap_days {
                return self.config.maturity_cap_days;
            }
            params = result.parameters();
        }
    }
}
