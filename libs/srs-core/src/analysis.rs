//! Read-only difficulty analysis over a card's review history.

use serde::{Deserialize, Serialize};

use crate::types::{Rating, ReviewRecord, INITIAL_EASE_FACTOR};

/// Lapse count at which a card is flagged as a leech.
pub const LEECH_THRESHOLD: u32 = 8;

/// Difficulty classification for a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    VeryHard,
}

/// Advisory analysis output. Never feeds back into scheduling; whether
/// to suspend or rewrite a flagged card is an editorial decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyReport {
    pub difficulty: Difficulty,
    pub is_leech: bool,
    pub recommendation: String,
}

/// Classify a card from its lapse count, total review count, and ease.
pub fn analyze(lapses: u32, total_reviews: u32, ease_factor: f64) -> DifficultyReport {
    let lapse_rate = if total_reviews == 0 {
        0.0
    } else {
        f64::from(lapses) / f64::from(total_reviews)
    };

    let difficulty = if ease_factor >= 2.5 && lapse_rate < 0.1 {
        Difficulty::Easy
    } else if ease_factor >= 2.0 && lapse_rate < 0.2 {
        Difficulty::Medium
    } else if ease_factor >= 1.5 || lapse_rate < 0.4 {
        Difficulty::Hard
    } else {
        Difficulty::VeryHard
    };

    let is_leech = lapses >= LEECH_THRESHOLD;
    let recommendation = if is_leech {
        "This card is a leech: suspend it and reformulate the content before reviewing again."
            .to_string()
    } else {
        match difficulty {
            Difficulty::Easy => "Card is well retained; keep the current schedule.".to_string(),
            Difficulty::Medium => "Card is progressing normally.".to_string(),
            Difficulty::Hard => {
                "Card needs extra attention; consider adding a mnemonic.".to_string()
            }
            Difficulty::VeryHard => {
                "Card is frequently forgotten; consider rewriting it.".to_string()
            }
        }
    };

    DifficultyReport {
        difficulty,
        is_leech,
        recommendation,
    }
}

/// Classify a card from its append-only review history.
///
/// Lapses and review totals are counted from the records; the ease factor
/// is taken from the latest resulting state.
pub fn analyze_history(records: &[ReviewRecord]) -> DifficultyReport {
    let lapses = records
        .iter()
        .filter(|r| r.rating == Rating::Again)
        .count() as u32;
    let ease_factor = records
        .last()
        .map(|r| r.resulting_state.ease_factor)
        .unwrap_or(INITIAL_EASE_FACTOR);
    analyze(lapses, records.len() as u32, ease_factor)
}
