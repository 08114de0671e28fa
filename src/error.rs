use thiserror::Error;

/// Input contract violations surfaced at the engine boundary.
///
/// Numeric edge cases (zero curvature in MLE, zero posterior mass in EAP,
/// zero information across a bank) are absorbed by in-model fallbacks and
/// never reach the caller as errors.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid item parameters: {0}")]
    InvalidItem(String),
    #[error("invalid attempt event: {0}")]
    InvalidAttempt(String),
    #[error("invalid mastery probability: {0}")]
    InvalidMastery(String),
}
