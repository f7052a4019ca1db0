use serde::{Deserialize, Serialize};

/// Why the Stop Controller (C9) chose RESULT over QUESTION for this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StopReason {
    MaxQuestionsReached,
    HighConfidenceSingleDisease,
    ClearSpecialtyWinner,
    NoMoreDiscriminativeQuestions,
}
