//! IRT Ability Model
//!
//! Item Response Theory over a scalar latent ability theta:
//! - 3PL response probability (2PL and Rasch as special cases)
//! - Fisher item information
//! - Ability estimation: Newton-Raphson MLE and EAP over a fixed grid
//! - Maximum-information item selection for adaptive testing
//!
//! All functions are pure and total over validated input (`sanitize`);
//! numerically degenerate cases fall back instead of producing NaN.

use std::collections::HashSet;
use std::f64::consts::PI;

use crate::config::{EapParams, MleParams};
use crate::types::{ItemParams, Question, Response};

/// 3PL probability of a correct response: `c + (1-c) / (1 + e^{-a(theta-b)})`.
pub fn probability_correct(theta: f64, item: &ItemParams) -> f64 {
    let ItemParams {
        difficulty: b,
        discrimination: a,
        guessing: c,
    } = *item;
    c + (1.0 - c) / (1.0 + (-a * (theta - b)).exp())
}

/// 2PL special case (`c = 0`), for callers that never use guessing correction.
pub fn probability_correct_2pl(theta: f64, difficulty: f64, discrimination: f64) -> f64 {
    probability_correct(
        theta,
        &ItemParams {
            difficulty,
            discrimination,
            guessing: 0.0,
        },
    )
}

/// Rasch (1PL) special case (`c = 0`, `a = 1`).
pub fn probability_correct_rasch(theta: f64, difficulty: f64) -> f64 {
    probability_correct_2pl(theta, difficulty, 1.0)
}

/// Fisher information of an item at theta: `a^2 (p-c)^2 q / ((1-c)^2 p)`.
/// Returns 0 at the numeric extremes where p saturates.
pub fn item_information(theta: f64, item: &ItemParams) -> f64 {
    let a = item.discrimination;
    let c = item.guessing;
    let p = probability_correct(theta, item);
    if p <= 0.0 || p >= 1.0 {
        return 0.0;
    }
    let q = 1.0 - p;
    let numerator = a * a * (p - c) * (p - c) * q;
    let denominator = (1.0 - c) * (1.0 - c) * p;
    if denominator <= 0.0 {
        return 0.0;
    }
    (numerator / denominator).max(0.0)
}

/// Newton-Raphson MLE of ability from a response history.
///
/// Each iteration sums the log-likelihood score and curvature (Fisher
/// scoring) over all responses, steps theta, and clamps to the scale
/// range. Zero curvature halts immediately with no update, which
/// protects ill-posed sets such as all-correct streaks on extreme items.
pub fn update_ability_mle(theta0: f64, responses: &[Response], params: &MleParams) -> f64 {
    let mut theta = theta0.clamp(params.theta_min, params.theta_max);
    if responses.is_empty() {
        return theta;
    }

    for _ in 0..params.max_iter {
        let mut score = 0.0;
        let mut curvature = 0.0;

        for r in responses {
            let a = r.item.discrimination;
            let c = r.item.guessing;
            let p = probability_correct(theta, &r.item);
            if p <= 0.0 || p >= 1.0 {
                continue;
            }
            let u = if r.is_correct { 1.0 } else { 0.0 };
            score += a * (u - p) * (p - c) / (p * (1.0 - c));
            curvature -= item_information(theta, &r.item);
        }

        if curvature == 0.0 {
            tracing::trace!(theta, "MLE halted on zero curvature");
            break;
        }

        let delta = -score / curvature;
        theta = (theta + delta).clamp(params.theta_min, params.theta_max);
        if delta.abs() < params.tol {
            break;
        }
    }

    theta
}

#[derive(Debug, Clone, Copy)]
pub struct EapEstimate {
    pub ability: f64,
    pub standard_error: f64,
}

/// EAP ability estimate: numerical integration over a uniform grid on
/// the theta range, weighted by a normal prior. Returns the posterior
/// mean and standard deviation.
///
/// Preferred over MLE for short histories, where MLE is undefined for
/// all-correct or all-incorrect response vectors. Underflow of the
/// posterior mass falls back to the prior rather than propagating NaN.
pub fn update_ability_eap(responses: &[Response], params: &EapParams) -> EapEstimate {
    let prior = EapEstimate {
        ability: params.prior_mean,
        standard_error: params.prior_sd,
    };
    if responses.is_empty() || params.points < 2 || params.prior_sd <= 0.0 {
        return prior;
    }

    let step = (params.theta_max - params.theta_min) / (params.points - 1) as f64;
    let norm = 1.0 / (params.prior_sd * (2.0 * PI).sqrt());

    let mut mass = 0.0;
    let mut weighted_sum = 0.0;
    let mut posterior = vec![0.0; params.points];
    let mut nodes = vec![0.0; params.points];

    for (i, (post, node)) in posterior.iter_mut().zip(nodes.iter_mut()).enumerate() {
        let t = params.theta_min + step * i as f64;
        let z = (t - params.prior_mean) / params.prior_sd;
        let mut density = norm * (-0.5 * z * z).exp();
        for r in responses {
            let p = probability_correct(t, &r.item);
            density *= if r.is_correct { p } else { 1.0 - p };
        }
        *post = density;
        *node = t;
        mass += density;
        weighted_sum += t * density;
    }

    if mass <= 0.0 || !mass.is_finite() {
        tracing::trace!(responses = responses.len(), "EAP posterior mass underflow");
        return prior;
    }

    let mean = weighted_sum / mass;
    let variance = posterior
        .iter()
        .zip(nodes.iter())
        .map(|(post, t)| (t - mean) * (t - mean) * post)
        .sum::<f64>()
        / mass;

    EapEstimate {
        ability: mean,
        standard_error: variance.max(0.0).sqrt(),
    }
}

/// Pick the not-yet-used item with maximum information at theta.
/// Ties break to the first-encountered item; `None` when exhausted or
/// when every remaining item carries zero information (a saturated bank
/// tells us nothing about this student, so the caller decides).
pub fn select_next_item<'a>(
    theta: f64,
    items: &'a [Question],
    used_ids: &HashSet<String>,
) -> Option<&'a Question> {
    let mut best: Option<(&Question, f64)> = None;
    for question in items {
        if used_ids.contains(&question.id) {
            continue;
        }
        let info = item_information(theta, &question.item);
        if info <= 0.0 {
            continue;
        }
        match best {
            Some((_, best_info)) if info <= best_info => {}
            _ => best = Some((question, info)),
        }
    }
    best.map(|(question, _)| question)
}

/// Map an author-facing 1..10 difficulty onto the IRT `b` scale.
/// Authoring convenience only, not part of the statistical model.
pub fn author_difficulty_to_b(difficulty: f64) -> f64 {
    (difficulty - 5.5) * 0.6
}

pub fn b_to_author_difficulty(b: f64) -> f64 {
    b / 0.6 + 5.5
}
