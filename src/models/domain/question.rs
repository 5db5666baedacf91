use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::content::{QuestionContent, QuestionType};

/// One quiz item. The variant tag lives on `content`; `question_type()`
/// derives it so the two can never disagree.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(flatten)]
    pub content: QuestionContent,
    pub explanation: String,
    pub points: u32,
    pub order: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Question {
    /// Fresh single-choice draft with a client-minted temporary id. The id
    /// is replaced by the server-issued one after a successful create.
    pub fn new_draft(temp_id_prefix: &str, default_points: u32) -> Self {
        Question {
            id: format!("{}{}", temp_id_prefix, Uuid::new_v4()),
            text: String::new(),
            content: QuestionContent::default_for(QuestionType::SingleChoice),
            explanation: String::new(),
            points: default_points,
            order: 0,
            created_at: None,
            modified_at: None,
        }
    }

    pub fn question_type(&self) -> QuestionType {
        self.content.question_type()
    }

    pub fn is_temporary(&self, temp_id_prefix: &str) -> bool {
        self.id.starts_with(temp_id_prefix)
    }

    /// Draft copy for duplication: content and explanation carry over,
    /// id and order do not.
    pub fn duplicate_as_draft(&self, temp_id_prefix: &str) -> Self {
        Question {
            id: format!("{}{}", temp_id_prefix, Uuid::new_v4()),
            text: self.text.clone(),
            content: self.content.clone(),
            explanation: self.explanation.clone(),
            points: self.points,
            order: 0,
            created_at: None,
            modified_at: None,
        }
    }
}
