//! Adaptive Orchestrator
//!
//! Composes the three models into one decision loop: BKT picks which
//! topic, IRT picks which item within that topic, and a submitted answer
//! updates ability, mastery, and the review card together. Every
//! operation is a pure transform of explicit inputs; per-student call
//! serialization and write-back are the persistence layer's concern.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bkt;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::irt;
use crate::sanitize;
use crate::types::{
    AbilityState, AttemptEvent, MasteryStatus, Question, Recommendation, Response, ReviewCard,
};

/// Everything the engine knows about one student, loaded by the caller
/// and passed in by value on each call. Cards are keyed by question id,
/// mastery by topic id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentState {
    pub ability: AbilityState,
    pub mastery: HashMap<String, f64>,
    pub cards: HashMap<String, ReviewCard>,
}

/// Composite result of processing one answer: the three updated states
/// plus the derived classification and recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerAnalysis {
    pub ability: AbilityState,
    pub topic_id: String,
    pub mastery: f64,
    pub mastery_level: i32,
    pub status: MasteryStatus,
    pub card: ReviewCard,
    pub recommendation: Recommendation,
}

pub struct Orchestrator;

impl Orchestrator {
    /// Pick the next question: filter the bank to unseen-or-due items,
    /// narrow to the topic BKT suggests (least-practiced fallback when no
    /// topic is in the learning zone), then take the item with maximum
    /// information at the student's current theta. `None` when nothing
    /// is available.
    pub fn select_next_question<'a>(
        student: &StudentState,
        bank: &'a [Question],
        config: &EngineConfig,
        now: DateTime<Utc>,
    ) -> Option<&'a Question> {
        let available: Vec<&Question> = bank
            .iter()
            .filter(|q| match student.cards.get(&q.id) {
                None => true,
                Some(card) => card.is_due(now),
            })
            .collect();
        if available.is_empty() {
            return None;
        }

        let mut topics: Vec<String> = Vec::new();
        for q in &available {
            if !topics.contains(&q.topic_id) {
                topics.push(q.topic_id.clone());
            }
        }

        let prior = config.bkt.fresh_topic_prior;
        let suggested = bkt::suggest_next_topic(&student.mastery, &topics, prior)?;
        let suggested_mastery = student.mastery.get(suggested).copied().unwrap_or(prior);

        let topic = if (suggested_mastery - 0.5).abs() <= config.recommendation.learning_zone_radius
        {
            suggested.to_string()
        } else {
            Self::least_practiced_topic(&student.mastery, &topics, prior)
        };

        // Reuse the CAT scan by masking out everything except the
        // available items of the chosen topic.
        let selectable: HashSet<&str> = available
            .iter()
            .filter(|q| q.topic_id == topic)
            .map(|q| q.id.as_str())
            .collect();
        let used_ids: HashSet<String> = bank
            .iter()
            .filter(|q| !selectable.contains(q.id.as_str()))
            .map(|q| q.id.clone())
            .collect();

        let selected = irt::select_next_item(student.ability.theta, bank, &used_ids);
        if let Some(question) = selected {
            tracing::debug!(
                question_id = %question.id,
                topic = %topic,
                theta = student.ability.theta,
                "selected next question"
            );
        }
        selected
    }

    /// Process one submitted answer. The three model updates are
    /// order-independent and share no mutable state; re-running with the
    /// same inputs against the same prior state yields identical output.
    ///
    /// `prior_responses` is the student's response history excluding this
    /// attempt; the caller owns its persistence.
    pub fn process_answer(
        student: &StudentState,
        question: &Question,
        attempt: &AttemptEvent,
        prior_responses: &[Response],
        config: &EngineConfig,
        now: DateTime<Utc>,
    ) -> Result<AnswerAnalysis, EngineError> {
        sanitize::validate_item(&question.item)?;
        sanitize::validate_attempt(attempt)?;
        let prior_mastery = match student.mastery.get(&question.topic_id) {
            Some(&p) => {
                sanitize::validate_mastery(p)?;
                p
            }
            None => config.bkt.fresh_topic_prior,
        };

        let ability = Self::update_ability(student, question, attempt, prior_responses, config);

        let guess = config.bkt.guess_for(question.question_type);
        let mastery = bkt::update_mastery(prior_mastery, attempt.is_correct, config.bkt.slip, guess);
        let status = bkt::classify(mastery, &config.bands);

        let prior_card = student
            .cards
            .get(&question.id)
            .cloned()
            .unwrap_or_default();
        let card = config.scheduler.schedule(&prior_card, attempt, config, now);

        let recommendation = Self::recommend(mastery, status, attempt, config);

        tracing::debug!(
            question_id = %question.id,
            topic = %question.topic_id,
            is_correct = attempt.is_correct,
            theta = ability.theta,
            mastery,
            recommendation = recommendation.as_str(),
            "processed answer"
        );

        Ok(AnswerAnalysis {
            ability,
            topic_id: question.topic_id.clone(),
            mastery,
            mastery_level: bkt::mastery_level(mastery),
            status,
            card,
            recommendation,
        })
    }

    /// EAP is preferred; MLE only once enough history exists, since MLE
    /// is unstable on short (or one-sided) response vectors.
    fn update_ability(
        student: &StudentState,
        question: &Question,
        attempt: &AttemptEvent,
        prior_responses: &[Response],
        config: &EngineConfig,
    ) -> AbilityState {
        let mut responses = Vec::with_capacity(prior_responses.len() + 1);
        responses.extend_from_slice(prior_responses);
        responses.push(Response {
            item: question.item,
            is_correct: attempt.is_correct,
        });

        if student.ability.response_count >= config.mle_min_responses {
            let theta = irt::update_ability_mle(student.ability.theta, &responses, &config.mle);
            AbilityState {
                theta,
                standard_error: student.ability.standard_error,
                response_count: student.ability.response_count + 1,
            }
        } else {
            let estimate = irt::update_ability_eap(&responses, &config.eap);
            AbilityState {
                theta: estimate.ability,
                standard_error: Some(estimate.standard_error),
                response_count: student.ability.response_count + 1,
            }
        }
    }

    fn recommend(
        mastery: f64,
        status: MasteryStatus,
        attempt: &AttemptEvent,
        config: &EngineConfig,
    ) -> Recommendation {
        let thresholds = &config.recommendation;
        if !attempt.is_correct && mastery < thresholds.weak_topic {
            if attempt.attempt_number >= thresholds.remediate_min_attempts && attempt.hints_used > 0
            {
                return Recommendation::RemediatePrerequisite;
            }
            return Recommendation::ReviewWeakTopic;
        }
        if status == MasteryStatus::Mastered {
            return Recommendation::SwitchTopic;
        }
        Recommendation::ContinueTopic
    }

    fn least_practiced_topic(
        mastery: &HashMap<String, f64>,
        topics: &[String],
        prior: f64,
    ) -> String {
        let mut best: Option<(&str, f64)> = None;
        for topic in topics {
            let p = mastery.get(topic).copied().unwrap_or(prior);
            match best {
                Some((_, lowest)) if p >= lowest => {}
                _ => best = Some((topic, p)),
            }
        }
        best.map(|(topic, _)| topic.to_string()).unwrap_or_default()
    }
}
