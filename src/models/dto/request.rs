use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::answer::SubmittedAnswer;
use crate::models::domain::content::QuestionContent;
use crate::models::domain::Question;

/// Payload for `createQuestion`/`updateQuestion`. The field rules here are
/// the universal half of authoring validation; the per-variant half lives
/// in the validation service.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, JsonSchema)]
pub struct SaveQuestionRequest {
    #[validate(length(min = 1, message = "Question text is required"))]
    pub text: String,

    #[serde(flatten)]
    pub content: QuestionContent,

    pub explanation: String,

    #[validate(range(min = 1, message = "Points must be at least 1"))]
    pub points: u32,

    pub order: u32,
}

impl From<&Question> for SaveQuestionRequest {
    fn from(question: &Question) -> Self {
        SaveQuestionRequest {
            text: question.text.clone(),
            content: question.content.clone(),
            explanation: question.explanation.clone(),
            points: question.points,
            order: question.order,
        }
    }
}

/// One entry of a `bulkReorder` payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct ReorderEntry {
    pub id: String,
    pub order: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct SubmitAnswerInput {
    pub question_id: String,
    pub answer: SubmittedAnswer,
}
