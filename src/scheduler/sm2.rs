//! SM-2 scheduling: the canonical ease-factor recurrence with the
//! 1, 6, round(prev * EF) interval sequence.

use chrono::{DateTime, Duration, Utc};

use crate::config::Sm2Params;
use crate::types::{AttemptEvent, ReviewCard};

/// Map an attempt onto the SM-2 0-5 quality score: correct answers grade
/// 5/4/3 by hesitation, minus one step per hint used (floor 3); incorrect
/// answers grade 2 so the card resets without zeroing the ease history.
pub fn quality_from_attempt(attempt: &AttemptEvent) -> u8 {
    if !attempt.is_correct {
        return 2;
    }
    let base: i32 = if attempt.time_taken_ms < 2000 {
        5
    } else if attempt.time_taken_ms < 5000 {
        4
    } else {
        3
    };
    (base - attempt.hints_used).clamp(3, 5) as u8
}

/// One SM-2 review. Pure in `(card, quality, now)`.
///
/// Quality < 3 resets repetitions and the interval to one day; otherwise
/// the interval follows 1, 6, round(prev * EF). The ease factor updates
/// on every review and never drops below the configured floor.
pub fn schedule(
    card: &ReviewCard,
    quality: u8,
    params: &Sm2Params,
    now: DateTime<Utc>,
) -> ReviewCard {
    let q = quality.min(5) as f64;

    // EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02))
    let ease_delta = 0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02);
    let ease_factor = (card.ease_factor + ease_delta).max(params.min_ease_factor);

    let (interval_days, repetitions, lapses) = if quality < 3 {
        (params.first_interval_days, 0, card.lapses + 1)
    } else {
        let interval = match card.repetitions {
            0 => params.first_interval_days,
            1 => params.second_interval_days,
            _ => (card.interval_days * ease_factor).round().max(1.0),
        };
        (interval, card.repetitions + 1, card.lapses)
    };

    ReviewCard {
        ease_factor,
        interval_days,
        repetitions,
        lapses,
        due_date: Some(now + Duration::days(interval_days as i64)),
        last_reviewed: Some(now),
        stability: card.stability,
        fsrs_difficulty: card.fsrs_difficulty,
    }
}
