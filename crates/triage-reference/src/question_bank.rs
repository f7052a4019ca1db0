use serde::Deserialize;
use triage_types::AnswerType;

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionSpec {
    pub canonical: String,
    pub text: String,
    #[serde(default = "default_answer_type")]
    pub answer_type: AnswerType,
    #[serde(default)]
    pub choices: Option<Vec<String>>,
    #[serde(default)]
    pub priority_when_known: Vec<String>,
    #[serde(default)]
    pub skip_if_denied: Vec<String>,
}

fn default_answer_type() -> AnswerType {
    AnswerType::YesNo
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionBankFile {
    pub questions: Vec<QuestionSpec>,
}

#[derive(Debug, Clone)]
pub struct QuestionDef {
    pub text: String,
    pub answer_type: AnswerType,
    pub choices: Option<Vec<String>>,
    pub priority_when_known: Vec<String>,
    pub skip_if_denied: Vec<String>,
}
