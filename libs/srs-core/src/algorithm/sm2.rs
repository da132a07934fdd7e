//! SM-2 spaced repetition algorithm.
//!
//! Based on SuperMemo 2 with configurable parameters. Grading is a pure
//! function over [`Sm2Parameters`]: no I/O, no clock access beyond the
//! caller-supplied review date.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use log::{debug, warn};

use super::{Sm2Parameters, Sm2Result};
use crate::types::{CardState, LearningState, Rating};

/// SM-2 algorithm with configurable parameters.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub minimum_ease: f64,
    pub again_penalty: f64,
    pub hard_penalty: f64,
    pub easy_bonus: f64,
    pub hard_multiplier: f64,
    pub easy_multiplier: f64,
    pub first_interval: u32,
    pub second_interval: u32,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            minimum_ease: 1.3,
            again_penalty: 0.2,
            hard_penalty: 0.15,
            easy_bonus: 0.1,
            hard_multiplier: 1.2,
            easy_multiplier: 1.3,
            first_interval: 1,
            second_interval: 6,
        }
    }
}

impl Sm2 {
    /// Calculate the next scheduling state after a review.
    ///
    /// Total for every rating/parameter combination: out-of-range ease
    /// factors from corrupted persisted data are repaired by the normal
    /// clamp rather than rejected, so a next review date can always be
    /// produced.
    pub fn calculate(
        &self,
        rating: Rating,
        current: &Sm2Parameters,
        today: NaiveDate,
    ) -> Sm2Result {
        if current.ease_factor < self.minimum_ease {
            warn!(
                "ease factor {} below minimum {}, clamping",
                current.ease_factor, self.minimum_ease
            );
        }

        match rating {
            Rating::Again => self.lapse(current, today),
            Rating::Hard | Rating::Good | Rating::Easy => self.advance(rating, current, today),
        }
    }

    fn lapse(&self, current: &Sm2Parameters, today: NaiveDate) -> Sm2Result {
        // A lapse mid-learning stays Learning; a lapse after any
        // successful review drops back to Relearning.
        let learning_state = if current.repetitions == 0 {
            LearningState::Learning
        } else {
            LearningState::Relearning
        };

        Sm2Result {
            repetitions: 0,
            ease_factor: (current.ease_factor - self.again_penalty).max(self.minimum_ease),
            interval: 1,
            due_date: today + Duration::days(1),
            learning_state,
        }
    }

    fn advance(&self, rating: Rating, current: &Sm2Parameters, today: NaiveDate) -> Sm2Result {
        let repetitions = current.repetitions + 1;

        let ease_adjustment = match rating {
            Rating::Hard => -self.hard_penalty,
            Rating::Good => 0.0,
            Rating::Easy => self.easy_bonus,
            Rating::Again => unreachable!("lapse handled separately"),
        };
        let ease_factor = (current.ease_factor + ease_adjustment).max(self.minimum_ease);

        let base = match repetitions {
            1 => self.first_interval as f64,
            2 => self.second_interval as f64,
            _ => (current.interval as f64 * ease_factor).round(),
        };
        let scaled = match rating {
            Rating::Hard => (base * self.hard_multiplier).round(),
            Rating::Easy => (base * self.easy_multiplier).round(),
            _ => base,
        };
        // Floor at one day regardless of multiplier rounding.
        let interval = scaled.max(1.0) as u32;

        let learning_state = if repetitions <= 2 {
            LearningState::Learning
        } else {
            LearningState::Review
        };

        Sm2Result {
            repetitions,
            ease_factor,
            interval,
            due_date: today + Duration::days(i64::from(interval)),
            learning_state,
        }
    }

    /// Grade a whole card: applies [`Sm2::calculate`] and carries the
    /// bookkeeping fields the algorithm itself does not touch.
    ///
    /// `lapses` is the lifetime Again count and only ever grows.
    pub fn grade(&self, card: &CardState, rating: Rating, now: DateTime<Utc>) -> CardState {
        let result = self.calculate(rating, &Sm2Parameters::from(card), now.date_naive());
        let lapses = if rating == Rating::Again {
            card.lapses + 1
        } else {
            card.lapses
        };

        debug!(
            "card {} rated {:?}: interval {} -> {}, ease {:.2} -> {:.2}",
            card.id, rating, card.interval, result.interval, card.ease_factor, result.ease_factor
        );

        CardState {
            id: card.id,
            repetitions: result.repetitions,
            ease_factor: result.ease_factor,
            interval: result.interval,
            due_date: result.due_date,
            learning_state: result.learning_state,
            lapses,
            last_reviewed: Some(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    fn new_params() -> Sm2Parameters {
        Sm2Parameters {
            repetitions: 0,
            ease_factor: 2.5,
            interval: 0,
        }
    }

    #[test]
    fn again_resets_repetitions_and_interval() {
        let sm2 = Sm2::default();
        let params = Sm2Parameters {
            repetitions: 5,
            ease_factor: 2.5,
            interval: 30,
        };
        let result = sm2.calculate(Rating::Again, &params, today());
        assert_eq!(result.repetitions, 0);
        assert_eq!(result.interval, 1);
        assert_eq!(result.ease_factor, 2.3);
        assert_eq!(result.learning_state, LearningState::Relearning);
        assert_eq!(result.due_date, today() + Duration::days(1));
    }

    #[test]
    fn again_on_unstarted_card_stays_learning() {
        let sm2 = Sm2::default();
        let result = sm2.calculate(Rating::Again, &new_params(), today());
        assert_eq!(result.learning_state, LearningState::Learning);
    }

    #[test]
    fn three_good_reviews_yield_canonical_intervals() {
        let sm2 = Sm2::default();
        let mut params = new_params();
        let mut intervals = Vec::new();
        for _ in 0..3 {
            let result = sm2.calculate(Rating::Good, &params, today());
            intervals.push(result.interval);
            params = result.parameters();
        }
        assert_eq!(intervals, vec![1, 6, 15]);
    }

    #[test]
    fn easy_first_review_floors_interval_at_one_day() {
        let sm2 = Sm2::default();
        let result = sm2.calculate(Rating::Easy, &new_params(), today());
        // round(1 * 1.3) stays a single day, but the ease bonus applies.
        assert_eq!(result.interval, 1);
        assert_eq!(result.ease_factor, 2.6);
    }

    #[test]
    fn hard_scales_interval_and_lowers_ease() {
        let sm2 = Sm2::default();
        let params = Sm2Parameters {
            repetitions: 3,
            ease_factor: 2.5,
            interval: 10,
        };
        let result = sm2.calculate(Rating::Hard, &params, today());
        // ease 2.35, base round(10 * 2.35) = 24, then * 1.2 = 28.8 -> 29
        assert_eq!(result.ease_factor, 2.35);
        assert_eq!(result.interval, 29);
        assert_eq!(result.learning_state, LearningState::Review);
    }

    #[test]
    fn repetitions_at_or_below_two_stay_learning() {
        let sm2 = Sm2::default();
        let first = sm2.calculate(Rating::Good, &new_params(), today());
        assert_eq!(first.learning_state, LearningState::Learning);
        let second = sm2.calculate(Rating::Good, &first.parameters(), today());
        assert_eq!(second.learning_state, LearningState::Learning);
        let third = sm2.calculate(Rating::Good, &second.parameters(), today());
        assert_eq!(third.learning_state, LearningState::Review);
    }

    #[test]
    fn corrupted_ease_factor_is_repaired_not_rejected() {
        let sm2 = Sm2::default();
        let params = Sm2Parameters {
            repetitions: 4,
            ease_factor: 0.4,
            interval: 3,
        };
        let result = sm2.calculate(Rating::Good, &params, today());
        assert_eq!(result.ease_factor, sm2.minimum_ease);
        assert!(result.interval >= 1);
    }

    #[test]
    fn grade_increments_lapses_only_on_again() {
        let sm2 = Sm2::default();
        let now = Utc::now();
        let card = CardState::new(42, now.date_naive());

        let after_good = sm2.grade(&card, Rating::Good, now);
        assert_eq!(after_good.lapses, 0);
        assert_eq!(after_good.last_reviewed, Some(now));
        assert_eq!(after_good.id, 42);

        let after_again = sm2.grade(&after_good, Rating::Again, now);
        assert_eq!(after_again.lapses, 1);
        assert_eq!(after_again.repetitions, 0);
        assert_eq!(after_again.interval, 1);
    }

    #[test]
    fn grade_sets_due_date_interval_days_out() {
        let sm2 = Sm2::default();
        let now = Utc::now();
        let card = CardState {
            repetitions: 2,
            interval: 6,
            ..CardState::new(1, now.date_naive())
        };
        let graded = sm2.grade(&card, Rating::Good, now);
        assert_eq!(
            graded.due_date,
            now.date_naive() + Duration::days(i64::from(graded.interval))
        );
    }

    proptest! {
        #[test]
        fn ease_factor_never_drops_below_minimum(
            ratings in proptest::collection::vec(1u8..=4, 0..200)
        ) {
            let sm2 = Sm2::default();
            let mut params = new_params();
            for value in ratings {
                let rating = Rating::try_from(value).unwrap();
                let result = sm2.calculate(rating, &params, today());
                prop_assert!(result.ease_factor >= sm2.minimum_ease);
                prop_assert!(result.interval >= 1);
                params = result.parameters();
            }
        }

        #[test]
        fn interval_is_at_least_one_once_reviewed(
            reps in 0u32..50,
            ease in 1.3f64..4.0,
            interval in 0u32..400,
            value in 1u8..=4,
        ) {
            let sm2 = Sm2::default();
            let params = Sm2Parameters { repetitions: reps, ease_factor: ease, interval };
            let result = sm2.calculate(Rating::try_from(value).unwrap(), &params, today());
            prop_assert!(result.interval >= 1);
        }
    }
}
