//! Bayesian Knowledge Tracing
//!
//! Per-topic mastery probability updated from each attempt via the
//! slip/guess posterior, plus the zone-of-proximal-development topic
//! suggestion and the threshold-band status classification consumed by
//! dashboards.

use std::collections::HashMap;

use crate::config::MasteryBands;
use crate::types::MasteryStatus;

/// Mastery is clamped strictly inside this range: a probability of
/// exactly 0 or 1 is mathematically irrecoverable in the Bayesian update.
pub const MASTERY_FLOOR: f64 = 0.01;
pub const MASTERY_CEILING: f64 = 0.99;

pub const DEFAULT_SLIP: f64 = 0.1;
pub const DEFAULT_GUESS: f64 = 0.2;

/// Posterior mastery given one observed attempt.
///
/// Correct:   `p(1-slip) / (p(1-slip) + (1-p)guess)`
/// Incorrect: `p·slip / (p·slip + (1-p)(1-guess))`
///
/// Slip and guess are parameters, not constants: callers vary guess by
/// question type (see `BktParams::guess_for`).
pub fn update_mastery(prior_mastery: f64, is_correct: bool, slip: f64, guess: f64) -> f64 {
    let p = prior_mastery;
    let posterior = if is_correct {
        let evidence = p * (1.0 - slip) + (1.0 - p) * guess;
        if evidence <= 0.0 {
            p
        } else {
            p * (1.0 - slip) / evidence
        }
    } else {
        let evidence = p * slip + (1.0 - p) * (1.0 - guess);
        if evidence <= 0.0 {
            p
        } else {
            p * slip / evidence
        }
    };
    posterior.clamp(MASTERY_FLOOR, MASTERY_CEILING)
}

/// Pick the candidate topic whose mastery sits closest to 0.5, the point
/// of maximal uncertainty and learning value. Topics absent from the map
/// default to `fresh_prior`, so genuinely unpracticed topics outrank
/// topics already pinned near a boundary. Ties break to input order.
pub fn suggest_next_topic<'a>(
    mastery: &HashMap<String, f64>,
    candidate_topics: &'a [String],
    fresh_prior: f64,
) -> Option<&'a str> {
    let mut best: Option<(&str, f64)> = None;
    for topic in candidate_topics {
        let p = mastery.get(topic).copied().unwrap_or(fresh_prior);
        let distance = (p - 0.5).abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((topic, distance)),
        }
    }
    best.map(|(topic, _)| topic)
}

/// Classify a mastery probability into the discrete status bands.
/// Thresholds are configuration (`MasteryBands`), not model constants.
pub fn classify(mastery: f64, bands: &MasteryBands) -> MasteryStatus {
    if mastery >= bands.mastered {
        MasteryStatus::Mastered
    } else if mastery >= bands.in_progress {
        MasteryStatus::InProgress
    } else if mastery >= bands.unlocked {
        MasteryStatus::Unlocked
    } else {
        MasteryStatus::Locked
    }
}

/// Project mastery onto the 0-5 integer level used by dashboards.
pub fn mastery_level(mastery: f64) -> i32 {
    (mastery.clamp(0.0, 1.0) * 5.0).round() as i32
}
