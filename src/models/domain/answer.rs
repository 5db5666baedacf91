use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::domain::content::QuestionType;

/// A submitted answer, mirroring the question variants. Matching answers
/// are keyed by element id; the assignment map is the outcome of whatever
/// entry mechanism the UI uses. Fill-blanks answers carry one slot per
/// blank in document order; `None` is an unfilled slot.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum SubmittedAnswer {
    SingleChoice(String),
    MultipleChoice(Vec<String>),
    TrueFalse(bool),
    Matching(HashMap<String, String>),
    ImageMatching(HashMap<String, String>),
    FillBlanks(Vec<Option<String>>),
}

impl SubmittedAnswer {
    pub fn question_type(&self) -> QuestionType {
        match self {
            SubmittedAnswer::SingleChoice(_) => QuestionType::SingleChoice,
            SubmittedAnswer::MultipleChoice(_) => QuestionType::MultipleChoice,
            SubmittedAnswer::TrueFalse(_) => QuestionType::TrueFalse,
            SubmittedAnswer::Matching(_) => QuestionType::Matching,
            SubmittedAnswer::ImageMatching(_) => QuestionType::ImageMatching,
            SubmittedAnswer::FillBlanks(_) => QuestionType::FillBlanks,
        }
    }
}
