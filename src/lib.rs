//! # tutor-engine - Adaptive learner-modeling engine
//!
//! Pure Rust implementation of the adaptive core behind a tutoring
//! platform:
//!
//! - **IRT Ability Model** - 1PL/2PL/3PL response probability, item
//!   information, MLE/EAP ability estimation, adaptive item selection
//! - **Bayesian Knowledge Tracing** - per-topic mastery probability
//!   with slip/guess parameters
//! - **Spaced Repetition** - SM-2 and FSRS review scheduling
//! - **Orchestrator** - the composed next-question / answer-processing
//!   decision loop
//!
//! ## Design
//!
//! Every operation is a pure, synchronous function over explicit state
//! structs: the caller loads state, invokes the engine, and writes the
//! result back. The engine holds nothing mutable, so calls for different
//! students are freely concurrent; calls for the same student must be
//! serialized by the caller to avoid lost updates.
//!
//! ## Module structure
//!
//! - [`types`] - boundary data model (items, attempts, ability, cards)
//! - [`config`] - tunable parameters with environment overrides
//! - [`irt`] - Item Response Theory ability model
//! - [`bkt`] - Bayesian Knowledge Tracing mastery model
//! - [`scheduler`] - SM-2 / FSRS review scheduling
//! - [`orchestrator`] - composition of the three models
//! - [`sanitize`] - fail-fast input validation
//!
//! ## Example
//!
//! ```rust
//! use chrono::Utc;
//! use tutor_engine::{
//!     AttemptEvent, EngineConfig, ItemParams, Orchestrator, Question, QuestionType, StudentState,
//! };
//!
//! let config = EngineConfig::default();
//! let student = StudentState::default();
//! let bank = vec![Question {
//!     id: "q1".to_string(),
//!     topic_id: "fractions".to_string(),
//!     question_type: QuestionType::MultipleChoice,
//!     item: ItemParams::default(),
//! }];
//!
//! let question = Orchestrator::select_next_question(&student, &bank, &config, Utc::now())
//!     .expect("bank is non-empty");
//! let attempt = AttemptEvent {
//!     is_correct: true,
//!     time_taken_ms: 2400,
//!     hints_used: 0,
//!     attempt_number: 1,
//!     timestamp: Utc::now().timestamp_millis(),
//! };
//! let analysis = Orchestrator::process_answer(&student, question, &attempt, &[], &config, Utc::now())
//!     .expect("valid inputs");
//! assert!(analysis.mastery > 0.0);
//! ```

pub mod bkt;
pub mod config;
pub mod error;
pub mod irt;
pub mod orchestrator;
pub mod sanitize;
pub mod scheduler;
pub mod types;

pub use config::{
    BktParams, EapParams, EngineConfig, FsrsParams, MasteryBands, MleParams,
    RecommendationThresholds, Sm2Params,
};
pub use error::EngineError;
pub use irt::EapEstimate;
pub use orchestrator::{AnswerAnalysis, Orchestrator, StudentState};
pub use scheduler::{Rating, ScheduleStrategy};
pub use types::{
    AbilityState, AttemptEvent, ItemParams, MasteryStatus, Question, QuestionType, Recommendation,
    Response, ReviewCard,
};
