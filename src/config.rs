use serde::{Deserialize, Serialize};

use crate::scheduler::ScheduleStrategy;
use crate::types::QuestionType;

/// BKT update parameters. Slip is fixed per deployment; guess varies by
/// question type (a 4-option multiple choice is far easier to guess than
/// free-form numeric entry).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BktParams {
    pub slip: f64,
    pub guess_multiple_choice: f64,
    pub guess_numeric_entry: f64,
    pub guess_short_answer: f64,
    pub fresh_topic_prior: f64,
}

impl Default for BktParams {
    fn default() -> Self {
        Self {
            slip: 0.1,
            guess_multiple_choice: 0.25,
            guess_numeric_entry: 0.05,
            guess_short_answer: 0.1,
            fresh_topic_prior: 0.1,
        }
    }
}

impl BktParams {
    pub fn guess_for(&self, question_type: QuestionType) -> f64 {
        match question_type {
            QuestionType::MultipleChoice => self.guess_multiple_choice,
            QuestionType::NumericEntry => self.guess_numeric_entry,
            QuestionType::ShortAnswer => self.guess_short_answer,
        }
    }
}

/// Threshold bands mapping mastery probability to a discrete status.
/// Tuning values for consuming dashboards, not model invariants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasteryBands {
    pub mastered: f64,
    pub in_progress: f64,
    pub unlocked: f64,
}

impl Default for MasteryBands {
    fn default() -> Self {
        Self {
            mastered: 0.8,
            in_progress: 0.3,
            unlocked: 0.05,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MleParams {
    pub max_iter: usize,
    pub tol: f64,
    pub theta_min: f64,
    pub theta_max: f64,
}

impl Default for MleParams {
    fn default() -> Self {
        Self {
            max_iter: 10,
            tol: 0.001,
            theta_min: -4.0,
            theta_max: 4.0,
        }
    }
}

/// EAP quadrature settings. A uniform grid with normal-prior weights,
/// not true Gauss-Hermite nodes; consuming dashboards depend on this
/// specific numeric behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EapParams {
    pub prior_mean: f64,
    pub prior_sd: f64,
    pub points: usize,
    pub theta_min: f64,
    pub theta_max: f64,
}

impl Default for EapParams {
    fn default() -> Self {
        Self {
            prior_mean: 0.0,
            prior_sd: 1.0,
            points: 40,
            theta_min: -4.0,
            theta_max: 4.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sm2Params {
    pub min_ease_factor: f64,
    pub first_interval_days: f64,
    pub second_interval_days: f64,
}

impl Default for Sm2Params {
    fn default() -> Self {
        Self {
            min_ease_factor: 1.3,
            first_interval_days: 1.0,
            second_interval_days: 6.0,
        }
    }
}

/// FSRS weight vector and target retention. Defaults follow the
/// published FSRS-4.5 fit; deployments substitute their trained set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FsrsParams {
    pub w: [f64; 17],
    pub desired_retention: f64,
}

impl Default for FsrsParams {
    fn default() -> Self {
        Self {
            w: [
                0.4, 0.6, 2.4, 5.8, // w0-w3: initial stability per rating
                4.93, 0.94, 0.86, 0.01, 1.49, // w4-w8
                0.14, 0.94, 2.18, 0.05, 0.34, // w9-w13
                1.26, 0.29, 2.61, // w14-w16
            ],
            desired_retention: 0.9,
        }
    }
}

/// Recommendation policy knobs. UI-facing tuning values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationThresholds {
    pub weak_topic: f64,
    pub remediate_min_attempts: i32,
    /// Max distance from 0.5 for a topic to count as in the learning zone.
    pub learning_zone_radius: f64,
}

impl Default for RecommendationThresholds {
    fn default() -> Self {
        Self {
            weak_topic: 0.4,
            remediate_min_attempts: 3,
            learning_zone_radius: 0.35,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub bkt: BktParams,
    pub bands: MasteryBands,
    pub mle: MleParams,
    pub eap: EapParams,
    pub sm2: Sm2Params,
    pub fsrs: FsrsParams,
    pub recommendation: RecommendationThresholds,
    pub scheduler: ScheduleStrategy,
    /// MLE is unstable on short histories; below this count EAP is used.
    pub mle_min_responses: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bkt: BktParams::default(),
            bands: MasteryBands::default(),
            mle: MleParams::default(),
            eap: EapParams::default(),
            sm2: Sm2Params::default(),
            fsrs: FsrsParams::default(),
            recommendation: RecommendationThresholds::default(),
            scheduler: ScheduleStrategy::default(),
            mle_min_responses: 5,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("TUTOR_SCHEDULER") {
            config.scheduler = ScheduleStrategy::parse(&val);
        }
        if let Ok(val) = std::env::var("TUTOR_DESIRED_RETENTION") {
            if let Ok(r) = val.parse::<f64>() {
                config.fsrs.desired_retention = r.clamp(0.5, 0.99);
            }
        }
        if let Ok(val) = std::env::var("TUTOR_MASTERED_THRESHOLD") {
            if let Ok(t) = val.parse::<f64>() {
                config.bands.mastered = t.clamp(0.5, 0.99);
            }
        }
        if let Ok(val) = std::env::var("TUTOR_BKT_SLIP") {
            if let Ok(s) = val.parse::<f64>() {
                config.bkt.slip = s.clamp(0.01, 0.5);
            }
        }

        config
    }
}
