//! Input Validation
//!
//! Fail-fast checks for the malformed-input error class. The numeric
//! kernels in `irt`/`bkt`/`scheduler` are total over validated input;
//! degenerate-but-finite cases are handled by in-model fallbacks, not here.

use crate::error::EngineError;
use crate::types::{AttemptEvent, ItemParams};

/// Check whether a slice contains NaN or Inf.
pub fn has_invalid_values(arr: &[f64]) -> bool {
    arr.iter().any(|&x| x.is_nan() || x.is_infinite())
}

/// Validate authored item parameters: all finite, `a > 0`, `c` in `[0, 1)`.
pub fn validate_item(item: &ItemParams) -> Result<(), EngineError> {
    if has_invalid_values(&[item.difficulty, item.discrimination, item.guessing]) {
        return Err(EngineError::InvalidItem(format!(
            "non-finite parameter (b={}, a={}, c={})",
            item.difficulty, item.discrimination, item.guessing
        )));
    }
    if item.discrimination <= 0.0 {
        return Err(EngineError::InvalidItem(format!(
            "discrimination must be positive, got {}",
            item.discrimination
        )));
    }
    if item.guessing < 0.0 || item.guessing >= 1.0 {
        return Err(EngineError::InvalidItem(format!(
            "guessing must be in [0, 1), got {}",
            item.guessing
        )));
    }
    Ok(())
}

pub fn validate_attempt(attempt: &AttemptEvent) -> Result<(), EngineError> {
    if attempt.time_taken_ms < 0 {
        return Err(EngineError::InvalidAttempt(format!(
            "negative time_taken_ms: {}",
            attempt.time_taken_ms
        )));
    }
    if attempt.hints_used < 0 {
        return Err(EngineError::InvalidAttempt(format!(
            "negative hints_used: {}",
            attempt.hints_used
        )));
    }
    if attempt.attempt_number < 1 {
        return Err(EngineError::InvalidAttempt(format!(
            "attempt_number must be >= 1, got {}",
            attempt.attempt_number
        )));
    }
    Ok(())
}

/// Validate a stored mastery probability before feeding it to the BKT
/// update. Persisted values are clamped on write, so anything outside
/// (0, 1) indicates a corrupted row rather than a numeric edge case.
pub fn validate_mastery(p: f64) -> Result<(), EngineError> {
    if !p.is_finite() || p <= 0.0 || p >= 1.0 {
        return Err(EngineError::InvalidMastery(format!(
            "must be finite and strictly inside (0, 1), got {p}"
        )));
    }
    Ok(())
}
