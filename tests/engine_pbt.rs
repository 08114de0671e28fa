//! Property-Based Tests for the Engine Core
//!
//! Tests the following invariants:
//! - Monotonicity: probability of a correct response never decreases in theta
//! - BKT range: mastery updates stay inside [0.01, 0.99] for any valid input
//! - SM-2 growth: successful reviews never shrink the interval; failures reset it
//! - Scheduling guarantees: interval >= 1 and due date strictly after the review
//! - Idempotence: process_answer is a pure function of its inputs
//! - Wire format: boundary state shapes survive a JSON round-trip

use proptest::prelude::*;

use chrono::{TimeZone, Utc};
use tutor_engine::scheduler::sm2;
use tutor_engine::{
    bkt, irt, AttemptEvent, EngineConfig, ItemParams, Orchestrator, Question, QuestionType,
    Rating, Response, ReviewCard, ScheduleStrategy, Sm2Params, StudentState,
};

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_theta() -> impl Strategy<Value = f64> {
    -4.0f64..=4.0f64
}

fn arb_item() -> impl Strategy<Value = ItemParams> {
    (-3.0f64..=3.0f64, 0.2f64..=2.5f64, 0.0f64..=0.35f64).prop_map(
        |(difficulty, discrimination, guessing)| ItemParams {
            difficulty,
            discrimination,
            guessing,
        },
    )
}

fn arb_response() -> impl Strategy<Value = Response> {
    (arb_item(), any::<bool>()).prop_map(|(item, is_correct)| Response { item, is_correct })
}

fn arb_attempt() -> impl Strategy<Value = AttemptEvent> {
    (any::<bool>(), 0i64..=60_000i64, 0i32..=3i32, 1i32..=5i32).prop_map(
        |(is_correct, time_taken_ms, hints_used, attempt_number)| AttemptEvent {
            is_correct,
            time_taken_ms,
            hints_used,
            attempt_number,
            timestamp: 0,
        },
    )
}

fn arb_card() -> impl Strategy<Value = ReviewCard> {
    // SM-2 intervals are whole days by construction; generate them that way.
    (1.3f64..=3.0f64, 0i32..=8i32, 0i32..=3i32, (1i64..=60i64).prop_map(|d| d as f64)).prop_map(
        |(ease_factor, repetitions, lapses, interval_days)| ReviewCard {
            ease_factor,
            interval_days: if repetitions == 0 { 0.0 } else { interval_days },
            repetitions,
            lapses,
            due_date: None,
            last_reviewed: None,
            stability: if repetitions == 0 { None } else { Some(interval_days) },
            fsrs_difficulty: if repetitions == 0 { None } else { Some(0.5) },
        },
    )
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn probability_monotone_in_theta(item in arb_item(), lo in arb_theta(), hi in arb_theta()) {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        let p_lo = irt::probability_correct(lo, &item);
        let p_hi = irt::probability_correct(hi, &item);
        prop_assert!(p_lo <= p_hi + 1e-12);
    }

    #[test]
    fn information_is_non_negative(item in arb_item(), theta in arb_theta()) {
        prop_assert!(irt::item_information(theta, &item) >= 0.0);
    }

    #[test]
    fn mle_stays_on_scale(theta0 in arb_theta(), responses in prop::collection::vec(arb_response(), 0..20)) {
        let config = EngineConfig::default();
        let theta = irt::update_ability_mle(theta0, &responses, &config.mle);
        prop_assert!(theta.is_finite());
        prop_assert!((-4.0..=4.0).contains(&theta));
    }

    #[test]
    fn eap_stays_on_scale(responses in prop::collection::vec(arb_response(), 0..20)) {
        let config = EngineConfig::default();
        let estimate = irt::update_ability_eap(&responses, &config.eap);
        prop_assert!(estimate.ability.is_finite());
        prop_assert!((-4.0..=4.0).contains(&estimate.ability));
        prop_assert!(estimate.standard_error.is_finite());
        prop_assert!(estimate.standard_error >= 0.0);
    }

    #[test]
    fn bkt_update_stays_in_range(
        prior in 0.001f64..=0.999f64,
        is_correct in any::<bool>(),
        slip in 0.01f64..=0.3f64,
        guess in 0.01f64..=0.4f64,
    ) {
        let posterior = bkt::update_mastery(prior, is_correct, slip, guess);
        prop_assert!((bkt::MASTERY_FLOOR..=bkt::MASTERY_CEILING).contains(&posterior));
    }

    #[test]
    fn bkt_correct_never_decreases_unclamped_prior(
        prior in 0.01f64..=0.99f64,
        slip in 0.01f64..=0.3f64,
        guess in 0.01f64..=0.4f64,
    ) {
        // With slip + guess < 1, a correct answer is always evidence for mastery.
        prop_assume!(slip + guess < 1.0);
        let posterior = bkt::update_mastery(prior, true, slip, guess);
        prop_assert!(posterior >= prior - 1e-12);
    }

    #[test]
    fn sm2_success_never_shrinks_interval(card in arb_card(), quality in 3u8..=5u8) {
        let params = Sm2Params::default();
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let updated = sm2::schedule(&card, quality, &params, now);
        if card.repetitions >= 2 {
            prop_assert!(updated.interval_days >= card.interval_days);
        }
        prop_assert!(updated.interval_days >= 1.0);
        prop_assert!(updated.ease_factor >= params.min_ease_factor);
    }

    #[test]
    fn sm2_failure_resets(card in arb_card(), quality in 0u8..=2u8) {
        let params = Sm2Params::default();
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let updated = sm2::schedule(&card, quality, &params, now);
        prop_assert_eq!(updated.repetitions, 0);
        prop_assert!((updated.interval_days - params.first_interval_days).abs() < 1e-9);
        prop_assert_eq!(updated.lapses, card.lapses + 1);
    }

    #[test]
    fn both_strategies_schedule_into_the_future(
        card in arb_card(),
        attempt in arb_attempt(),
        use_sm2 in any::<bool>(),
    ) {
        let config = EngineConfig::default();
        let strategy = if use_sm2 { ScheduleStrategy::Sm2 } else { ScheduleStrategy::Fsrs };
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let updated = strategy.schedule(&card, &attempt, &config, now);
        prop_assert!(updated.interval_days >= 1.0);
        prop_assert!(updated.due_date.unwrap() > now);
        prop_assert_eq!(updated.last_reviewed, Some(now));
    }

    #[test]
    fn fsrs_rating_covers_all_attempts(attempt in arb_attempt()) {
        let rating = Rating::from_attempt(&attempt);
        if !attempt.is_correct {
            prop_assert_eq!(rating, Rating::Again);
        } else {
            prop_assert!(rating != Rating::Again);
        }
    }

    #[test]
    fn process_answer_is_idempotent(
        attempt in arb_attempt(),
        item in arb_item(),
        prior_mastery in 0.05f64..=0.95f64,
        responses in prop::collection::vec(arb_response(), 0..10),
    ) {
        let config = EngineConfig::default();
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let question = Question {
            id: "q1".to_string(),
            topic_id: "fractions".to_string(),
            question_type: QuestionType::MultipleChoice,
            item,
        };
        let mut student = StudentState::default();
        student.mastery.insert("fractions".to_string(), prior_mastery);
        student.ability.response_count = responses.len() as i32;

        let first = Orchestrator::process_answer(&student, &question, &attempt, &responses, &config, now)
            .unwrap();
        let second = Orchestrator::process_answer(&student, &question, &attempt, &responses, &config, now)
            .unwrap();

        prop_assert_eq!(first.ability.theta, second.ability.theta);
        prop_assert_eq!(first.mastery, second.mastery);
        prop_assert_eq!(first.card, second.card);
        prop_assert_eq!(first.recommendation, second.recommendation);
    }

    #[test]
    fn student_state_json_round_trip(
        theta in arb_theta(),
        mastery in 0.01f64..=0.99f64,
        card in arb_card(),
    ) {
        let mut student = StudentState::default();
        student.ability.theta = theta;
        student.mastery.insert("fractions".to_string(), mastery);
        student.cards.insert("q1".to_string(), card);

        let json = serde_json::to_string(&student).unwrap();
        let back: StudentState = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back.ability.theta, student.ability.theta);
        prop_assert_eq!(back.mastery.get("fractions"), student.mastery.get("fractions"));
        prop_assert_eq!(back.cards.get("q1"), student.cards.get("q1"));
    }
}
