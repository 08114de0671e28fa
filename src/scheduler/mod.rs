//! Spaced Repetition Scheduler
//!
//! Two interchangeable strategies over one contract: given a review card
//! and an observed attempt, produce the updated card. SM-2 consumes a
//! 0-5 quality score, FSRS a 1-4 rating; both mappings derive from the
//! same attempt fields. Both strategies guarantee `interval_days >= 1`
//! after the first success, a due date strictly after the review
//! timestamp, and no hidden randomness.

pub mod fsrs;
pub mod sm2;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::types::{AttemptEvent, ReviewCard};

/// FSRS review rating. SM-2 derives its quality score from the same
/// attempt via `sm2::quality_from_attempt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    Again = 1,
    Hard = 2,
    Good = 3,
    Easy = 4,
}

impl Rating {
    /// Map correctness, hesitation, and hint usage onto a rating.
    /// A correct answer with hints never rates above Good.
    pub fn from_attempt(attempt: &AttemptEvent) -> Self {
        if !attempt.is_correct {
            return Self::Again;
        }
        if attempt.hints_used > 0 {
            return if attempt.time_taken_ms < 5000 {
                Self::Good
            } else {
                Self::Hard
            };
        }
        if attempt.time_taken_ms < 2000 {
            Self::Easy
        } else if attempt.time_taken_ms < 5000 {
            Self::Good
        } else {
            Self::Hard
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum ScheduleStrategy {
    Sm2,
    #[default]
    Fsrs,
}

impl ScheduleStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sm2 => "sm2",
            Self::Fsrs => "fsrs",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "sm2" | "sm-2" => Self::Sm2,
            _ => Self::Fsrs,
        }
    }

    /// Shared scheduling contract. Pure in `(card, attempt, now)`.
    pub fn schedule(
        &self,
        card: &ReviewCard,
        attempt: &AttemptEvent,
        config: &EngineConfig,
        now: DateTime<Utc>,
    ) -> ReviewCard {
        match self {
            Self::Sm2 => sm2::schedule(card, sm2::quality_from_attempt(attempt), &config.sm2, now),
            Self::Fsrs => fsrs::schedule(card, Rating::from_attempt(attempt), &config.fsrs, now),
        }
    }
}
