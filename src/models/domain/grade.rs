use serde::{Deserialize, Serialize};

/// Grading outcome for one question. `score` is the fraction of the
/// question answered correctly in [0, 1]; `correct` means fully correct.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuestionGrade {
    pub question_id: String,
    pub correct: bool,
    pub score: f64,
    pub points_earned: f64,
    pub detail: GradeDetail,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum GradeDetail {
    Choice { selected: Vec<String> },
    TrueFalse { selected: bool },
    Matching { pairs: Vec<PairOutcome> },
    FillBlanks { blanks: Vec<BlankOutcome> },
    Unanswered,
}

/// Per-item outcome for matching and image-matching questions; `left_id`
/// is the item or label id.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct PairOutcome {
    pub left_id: String,
    pub selected: Option<String>,
    pub correct: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct BlankOutcome {
    pub index: usize,
    pub selected: Option<String>,
    pub correct: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SubmissionGrade {
    pub points_earned: f64,
    pub total_possible: u32,
    pub question_grades: Vec<QuestionGrade>,
}

impl SubmissionGrade {
    pub fn correct_count(&self) -> usize {
        self.question_grades.iter().filter(|g| g.correct).count()
    }
}
