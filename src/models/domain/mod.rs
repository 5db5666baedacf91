pub mod answer;
pub mod content;
pub mod grade;
pub mod question;
pub use answer::SubmittedAnswer;
pub use content::{QuestionContent, QuestionType};
pub use grade::{QuestionGrade, SubmissionGrade};
pub use question::Question;
