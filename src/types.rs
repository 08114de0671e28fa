use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// IRT item parameters, authored per question and immutable at runtime.
///
/// `difficulty` is the 3PL `b`, `discrimination` is `a` (must be > 0),
/// `guessing` is the lower asymptote `c` in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemParams {
    pub difficulty: f64,
    pub discrimination: f64,
    pub guessing: f64,
}

impl Default for ItemParams {
    fn default() -> Self {
        Self {
            difficulty: 0.0,
            discrimination: 1.0,
            guessing: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum QuestionType {
    #[default]
    MultipleChoice,
    NumericEntry,
    ShortAnswer,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MultipleChoice => "multiple_choice",
            Self::NumericEntry => "numeric_entry",
            Self::ShortAnswer => "short_answer",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "numeric_entry" => Self::NumericEntry,
            "short_answer" => Self::ShortAnswer,
            _ => Self::MultipleChoice,
        }
    }
}

/// Minimal question-bank record the engine ranks and selects from.
/// Content fields (stem, choices, solution) live with the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub topic_id: String,
    pub question_type: QuestionType,
    pub item: ItemParams,
}

/// One submitted answer. Append-only history owned by the caller;
/// the engine consumes it transiently.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptEvent {
    pub is_correct: bool,
    pub time_taken_ms: i64,
    pub hints_used: i32,
    pub attempt_number: i32,
    pub timestamp: i64,
}

/// A single (item, outcome) pair from the response history, the unit
/// the ability estimators sum over.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub item: ItemParams,
    pub is_correct: bool,
}

/// Latent ability state. `theta` is conventionally in [-4, 4];
/// new students start at the population mean.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityState {
    pub theta: f64,
    pub standard_error: Option<f64>,
    pub response_count: i32,
}

impl Default for AbilityState {
    fn default() -> Self {
        Self {
            theta: 0.0,
            standard_error: None,
            response_count: 0,
        }
    }
}

/// Per-(student, question) review card shared by both scheduling
/// strategies. `stability` and `fsrs_difficulty` are FSRS-only and stay
/// `None` under SM-2; `fsrs_difficulty` is unrelated to the IRT `b`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCard {
    pub ease_factor: f64,
    pub interval_days: f64,
    pub repetitions: i32,
    pub lapses: i32,
    pub due_date: Option<DateTime<Utc>>,
    pub last_reviewed: Option<DateTime<Utc>>,
    pub stability: Option<f64>,
    pub fsrs_difficulty: Option<f64>,
}

impl Default for ReviewCard {
    fn default() -> Self {
        Self {
            ease_factor: 2.5,
            interval_days: 0.0,
            repetitions: 0,
            lapses: 0,
            due_date: None,
            last_reviewed: None,
            stability: None,
            fsrs_difficulty: None,
        }
    }
}

impl ReviewCard {
    pub fn is_new(&self) -> bool {
        self.repetitions == 0
    }

    /// Due when never scheduled or the due date has passed.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.due_date {
            None => true,
            Some(due) => due <= now,
        }
    }
}

/// Discrete mastery classification consumed by dashboards. Produced by
/// threshold bands over the continuous mastery probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum MasteryStatus {
    #[default]
    Locked,
    Unlocked,
    InProgress,
    Mastered,
}

impl MasteryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Locked => "locked",
            Self::Unlocked => "unlocked",
            Self::InProgress => "in_progress",
            Self::Mastered => "mastered",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "unlocked" => Self::Unlocked,
            "in_progress" => Self::InProgress,
            "mastered" => Self::Mastered,
            _ => Self::Locked,
        }
    }
}

/// What the student should do next, as decided by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    ContinueTopic,
    SwitchTopic,
    ReviewWeakTopic,
    RemediatePrerequisite,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ContinueTopic => "continue_topic",
            Self::SwitchTopic => "switch_topic",
            Self::ReviewWeakTopic => "review_weak_topic",
            Self::RemediatePrerequisite => "remediate_prerequisite",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_due_semantics() {
        let now = Utc::now();
        let card = ReviewCard::default();
        assert!(card.is_new());
        assert!(card.is_due(now));

        let scheduled = ReviewCard {
            due_date: Some(now + chrono::Duration::days(3)),
            repetitions: 1,
            ..Default::default()
        };
        assert!(!scheduled.is_due(now));
        assert!(scheduled.is_due(now + chrono::Duration::days(3)));
    }

    #[test]
    fn test_enum_string_round_trip() {
        for status in [
            MasteryStatus::Locked,
            MasteryStatus::Unlocked,
            MasteryStatus::InProgress,
            MasteryStatus::Mastered,
        ] {
            assert_eq!(MasteryStatus::parse(status.as_str()), status);
        }
        assert_eq!(QuestionType::parse("numeric_entry"), QuestionType::NumericEntry);
        assert_eq!(QuestionType::parse("unknown"), QuestionType::MultipleChoice);
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let state = AbilityState::default();
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("standardError"));
        assert!(json.contains("responseCount"));

        let rec = serde_json::to_string(&Recommendation::ReviewWeakTopic).unwrap();
        assert_eq!(rec, "\"review_weak_topic\"");
    }
}
