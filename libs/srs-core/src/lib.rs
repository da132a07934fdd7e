//! Spaced repetition scheduling core shared by the study applications.
//!
//! Provides:
//! - SM-2 grading: next interval, ease factor, and due date per review
//! - Deck scheduling: study queue ordering, workload forecast, session
//!   layout and new-card budgeting
//! - Review sessions: flip/rate state machine with end-of-session stats
//! - Difficulty analysis and leech detection over review history
//!
//! The core is pure: persistence and presentation live in the calling
//! application. Callers hand in a snapshot of [`CardState`]s and persist
//! each updated state as it comes back out of a session.

pub mod algorithm;
pub mod analysis;
pub mod error;
pub mod scheduler;
pub mod session;
pub mod types;

pub use algorithm::sm2::Sm2;
pub use algorithm::{Sm2Parameters, Sm2Result};
pub use analysis::{analyze, analyze_history, Difficulty, DifficultyReport, LEECH_THRESHOLD};
pub use error::{Result, SchedulingError};
pub use scheduler::{DeckScheduler, SchedulerConfig, StudyPlan, StudySession};
pub use session::{RatingHistogram, ReviewSession, SessionPhase, SessionStats};
pub use types::{CardId, CardState, LearningState, Rating, ReviewRecord};
