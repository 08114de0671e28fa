//! FSRS scheduling: power-law forgetting curve with per-card stability
//! and difficulty, driven by the 17-value weight vector in `FsrsParams`.
//!
//! Card difficulty here is the FSRS memory-difficulty in (0, 1], distinct
//! from the IRT item difficulty `b`.

use chrono::{DateTime, Duration, Utc};

use super::Rating;
use crate::config::FsrsParams;
use crate::types::ReviewCard;

const DECAY: f64 = -0.5;
const FACTOR: f64 = 19.0 / 81.0;

const MIN_STABILITY: f64 = 0.1;
const MIN_INTERVAL_DAYS: f64 = 1.0;
const MAX_INTERVAL_DAYS: f64 = 36500.0;

const SECONDS_PER_DAY: f64 = 86400.0;

/// Probability of recall after `elapsed_days` at the given stability:
/// `R(t) = (1 + FACTOR * t / S)^DECAY`.
pub fn retrievability(stability: f64, elapsed_days: f64) -> f64 {
    if stability <= 0.0 {
        return 0.0;
    }
    (1.0 + FACTOR * elapsed_days.max(0.0) / stability).powf(DECAY)
}

/// Retrievability of a card at `now`, for ranking overdue reviews.
/// A card never reviewed has nothing to forget yet and reads as 1.
pub fn card_retrievability(card: &ReviewCard, now: DateTime<Utc>) -> f64 {
    match (card.stability, card.last_reviewed) {
        (Some(stability), Some(last)) => {
            retrievability(stability, elapsed_days(last, now))
        }
        _ => 1.0,
    }
}

/// One FSRS review. Pure in `(card, rating, now)`.
///
/// A new card seeds stability and difficulty from w0..w5; a reviewed card
/// updates difficulty toward its mean-reverted target and stability via
/// the recall/forget equations, with the lapse path capped at the
/// previous stability. The next interval hits `desired_retention` on the
/// forgetting curve.
pub fn schedule(
    card: &ReviewCard,
    rating: Rating,
    params: &FsrsParams,
    now: DateTime<Utc>,
) -> ReviewCard {
    let w = &params.w;
    let rating_val = rating as i32;

    let (stability, difficulty, lapses) = match (card.stability, card.fsrs_difficulty) {
        (Some(prev_stability), Some(prev_difficulty)) if !card.is_new() => {
            let elapsed = card
                .last_reviewed
                .map(|last| elapsed_days(last, now))
                .unwrap_or(0.0);
            let r = retrievability(prev_stability, elapsed);
            let difficulty = next_difficulty(w, prev_difficulty, rating_val);
            if rating == Rating::Again {
                let stability = stability_after_lapse(w, prev_difficulty, prev_stability, r);
                (stability, difficulty, card.lapses + 1)
            } else {
                let stability =
                    stability_after_recall(w, prev_difficulty, prev_stability, r, rating_val);
                (stability, difficulty, card.lapses)
            }
        }
        _ => {
            let lapses = card.lapses + if rating == Rating::Again { 1 } else { 0 };
            (
                initial_stability(w, rating_val),
                initial_difficulty(w, rating_val),
                lapses,
            )
        }
    };

    let interval_days = next_interval(stability, params.desired_retention);

    ReviewCard {
        ease_factor: card.ease_factor,
        interval_days,
        repetitions: card.repetitions + 1,
        lapses,
        due_date: Some(now + Duration::seconds((interval_days * SECONDS_PER_DAY) as i64)),
        last_reviewed: Some(now),
        stability: Some(stability),
        fsrs_difficulty: Some(difficulty),
    }
}

fn elapsed_days(last: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    ((now - last).num_seconds() as f64 / SECONDS_PER_DAY).max(0.0)
}

fn initial_stability(w: &[f64; 17], rating: i32) -> f64 {
    w[(rating - 1) as usize].max(MIN_STABILITY)
}

fn initial_difficulty(w: &[f64; 17], rating: i32) -> f64 {
    let d = w[4] - (rating - 3) as f64 * w[5];
    d.clamp(1.0, 10.0) / 10.0
}

fn next_difficulty(w: &[f64; 17], d: f64, rating: i32) -> f64 {
    let d_10 = d * 10.0;
    let delta = -(rating - 3) as f64;
    let d_new = d_10 + w[6] * delta;
    // Mean reversion toward the initial-difficulty anchor.
    let d_mean = w[7] * (w[4] - 3.0 * w[5]) + (1.0 - w[7]) * d_new;
    d_mean.clamp(1.0, 10.0) / 10.0
}

fn stability_after_recall(w: &[f64; 17], d: f64, s: f64, r: f64, rating: i32) -> f64 {
    let d_10 = d * 10.0;
    let hard_penalty = if rating == 2 { w[15] } else { 1.0 };
    let easy_bonus = if rating == 4 { w[16] } else { 1.0 };

    let new_s = s
        * (1.0
            + w[8].exp()
                * (11.0 - d_10)
                * s.powf(-w[9])
                * ((1.0 - r) * w[10]).exp_m1()
                * hard_penalty
                * easy_bonus);
    new_s.max(MIN_STABILITY)
}

fn stability_after_lapse(w: &[f64; 17], d: f64, s: f64, r: f64) -> f64 {
    let d_10 = d * 10.0;
    let new_s =
        w[11] * d_10.powf(-w[12]) * ((s + 1.0).powf(w[13]) - 1.0) * (1.0 - r).powf(w[14]).exp();
    new_s.clamp(MIN_STABILITY, s)
}

fn next_interval(stability: f64, desired_retention: f64) -> f64 {
    let safe_retention = desired_retention.clamp(0.0001, 0.9999);
    let interval = stability / FACTOR * (safe_retention.powf(1.0 / DECAY) - 1.0);
    interval.clamp(MIN_INTERVAL_DAYS, MAX_INTERVAL_DAYS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> FsrsParams {
        FsrsParams::default()
    }

    #[test]
    fn test_new_card_good_rating() {
        let now = Utc::now();
        let card = schedule(&ReviewCard::default(), Rating::Good, &params(), now);
        assert_eq!(card.repetitions, 1);
        assert!(card.interval_days >= 1.0);
        assert!(card.stability.unwrap() > 1.0);
        assert!(card.due_date.unwrap() > now);
    }

    #[test]
    fn test_retrievability_decay() {
        let r_0 = retrievability(10.0, 0.0);
        let r_5 = retrievability(10.0, 5.0);
        let r_10 = retrievability(10.0, 10.0);
        assert!((r_0 - 1.0).abs() < 0.001);
        assert!(r_0 > r_5);
        assert!(r_5 > r_10);
    }

    #[test]
    fn test_stability_grows_on_success() {
        let now = Utc::now();
        let mut card = schedule(&ReviewCard::default(), Rating::Good, &params(), now);
        for i in 1..6 {
            let review_time = now + Duration::days(card.interval_days as i64 * i);
            let next = schedule(&card, Rating::Good, &params(), review_time);
            assert!(next.stability.unwrap() > card.stability.unwrap());
            card = next;
        }
    }

    #[test]
    fn test_lapse_shrinks_stability() {
        let now = Utc::now();
        let mature = ReviewCard {
            repetitions: 6,
            stability: Some(20.0),
            fsrs_difficulty: Some(0.4),
            last_reviewed: Some(now - Duration::days(18)),
            ..Default::default()
        };
        let card = schedule(&mature, Rating::Again, &params(), now);
        assert!(card.stability.unwrap() < 20.0);
        assert_eq!(card.lapses, 1);
        assert!(card.interval_days >= 1.0);
    }

    #[test]
    fn test_easy_outschedules_hard() {
        let now = Utc::now();
        let reviewed = ReviewCard {
            repetitions: 3,
            stability: Some(5.0),
            fsrs_difficulty: Some(0.5),
            last_reviewed: Some(now - Duration::days(5)),
            ..Default::default()
        };
        let easy = schedule(&reviewed, Rating::Easy, &params(), now);
        let hard = schedule(&reviewed, Rating::Hard, &params(), now);
        assert!(easy.interval_days > hard.interval_days);
        assert!(easy.fsrs_difficulty.unwrap() < hard.fsrs_difficulty.unwrap());
    }

    #[test]
    fn test_higher_retention_shortens_interval() {
        let now = Utc::now();
        let strict = FsrsParams {
            desired_retention: 0.95,
            ..params()
        };
        let lax = FsrsParams {
            desired_retention: 0.8,
            ..params()
        };
        let base = ReviewCard {
            repetitions: 2,
            stability: Some(10.0),
            fsrs_difficulty: Some(0.5),
            last_reviewed: Some(now - Duration::days(8)),
            ..Default::default()
        };
        let short = schedule(&base, Rating::Good, &strict, now);
        let long = schedule(&base, Rating::Good, &lax, now);
        assert!(short.interval_days < long.interval_days);
    }

    #[test]
    fn test_card_retrievability_unreviewed_is_one() {
        let now = Utc::now();
        assert!((card_retrievability(&ReviewCard::default(), now) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_sm2_fields_untouched() {
        let now = Utc::now();
        let card = schedule(&ReviewCard::default(), Rating::Good, &params(), now);
        assert!((card.ease_factor - 2.5).abs() < 1e-9);
    }
}
