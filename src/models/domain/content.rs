use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The six mutually exclusive question kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    SingleChoice,
    MultipleChoice,
    TrueFalse,
    Matching,
    ImageMatching,
    FillBlanks,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct ChoiceOption {
    pub id: String,
    pub text: String,
    pub is_correct: bool,
}

impl ChoiceOption {
    pub fn new(text: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            is_correct: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct MatchItem {
    pub id: String,
    pub text: String,
}

impl MatchItem {
    pub fn new(text: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
        }
    }
}

/// A right-side element an item can be matched against.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct MatchTarget {
    pub id: String,
    pub text: String,
}

impl MatchTarget {
    pub fn new(text: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct MatchPair {
    pub item_id: String,
    pub match_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct ImageLabel {
    pub id: String,
    pub text: String,
}

impl ImageLabel {
    pub fn new(text: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct MatchImage {
    pub id: String,
    pub url: String,
}

impl MatchImage {
    pub fn new(url: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            url: url.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct LabelImagePair {
    pub label_id: String,
    pub image_id: String,
}

/// A candidate filler for a fill-in-the-blanks question.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct BlankAnswer {
    pub id: String,
    pub text: String,
}

impl BlankAnswer {
    pub fn new(text: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
        }
    }
}

/// Per-variant question payload. The serde tag doubles as the question
/// type on the wire; there is no separate type field to drift out of sync.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum QuestionContent {
    SingleChoice {
        options: Vec<ChoiceOption>,
    },
    MultipleChoice {
        options: Vec<ChoiceOption>,
    },
    TrueFalse {
        correct_answer: bool,
    },
    Matching {
        items: Vec<MatchItem>,
        matches: Vec<MatchTarget>,
        correct_matches: Vec<MatchPair>,
    },
    ImageMatching {
        labels: Vec<ImageLabel>,
        images: Vec<MatchImage>,
        correct_matches: Vec<LabelImagePair>,
    },
    FillBlanks {
        answers: Vec<BlankAnswer>,
        correct_answers: Vec<String>,
    },
}

impl QuestionContent {
    pub fn question_type(&self) -> QuestionType {
        match self {
            QuestionContent::SingleChoice { .. } => QuestionType::SingleChoice,
            QuestionContent::MultipleChoice { .. } => QuestionType::MultipleChoice,
            QuestionContent::TrueFalse { .. } => QuestionType::TrueFalse,
            QuestionContent::Matching { .. } => QuestionType::Matching,
            QuestionContent::ImageMatching { .. } => QuestionType::ImageMatching,
            QuestionContent::FillBlanks { .. } => QuestionType::FillBlanks,
        }
    }

    /// Canonical empty instance for a variant. Switching a question's type
    /// always goes through this; prior content is discarded, never migrated.
    pub fn default_for(question_type: QuestionType) -> Self {
        match question_type {
            QuestionType::SingleChoice => QuestionContent::SingleChoice {
                options: vec![ChoiceOption::new(""), ChoiceOption::new("")],
            },
            QuestionType::MultipleChoice => QuestionContent::MultipleChoice {
                options: vec![ChoiceOption::new(""), ChoiceOption::new("")],
            },
            QuestionType::TrueFalse => QuestionContent::TrueFalse {
                correct_answer: false,
            },
            QuestionType::Matching => QuestionContent::Matching {
                items: vec![MatchItem::new(""), MatchItem::new("")],
                matches: vec![MatchTarget::new(""), MatchTarget::new("")],
                correct_matches: Vec::new(),
            },
            QuestionType::ImageMatching => QuestionContent::ImageMatching {
                labels: Vec::new(),
                images: Vec::new(),
                correct_matches: Vec::new(),
            },
            QuestionType::FillBlanks => QuestionContent::FillBlanks {
                answers: Vec::new(),
                correct_answers: Vec::new(),
            },
        }
    }

    /// Drops fill-blanks candidate answers whose trimmed text is empty.
    /// Runs before validation; a correct-answer entry referencing a dropped
    /// candidate is then reported as an unknown id.
    pub fn normalize(&mut self) {
        if let QuestionContent::FillBlanks { answers, .. } = self {
            answers.retain(|a| !a.text.trim().is_empty());
        }
    }
}
