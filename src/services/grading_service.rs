use std::collections::{HashMap, HashSet};

use crate::errors::{AppError, AppResult};
use crate::models::domain::answer::SubmittedAnswer;
use crate::models::domain::content::QuestionContent;
use crate::models::domain::grade::{
    BlankOutcome, GradeDetail, PairOutcome, QuestionGrade, SubmissionGrade,
};
use crate::models::domain::Question;
use crate::models::dto::request::SubmitAnswerInput;

/// Scoring rule for multiple-choice selections. The default policy is
/// exact set equality; swapping in partial credit does not touch callers.
pub trait ChoiceScoringPolicy: Send + Sync {
    fn score(&self, correct_ids: &HashSet<&str>, selected_ids: &HashSet<&str>) -> f64;
}

pub struct ExactSetPolicy;

impl ChoiceScoringPolicy for ExactSetPolicy {
    fn score(&self, correct_ids: &HashSet<&str>, selected_ids: &HashSet<&str>) -> f64 {
        if correct_ids == selected_ids {
            1.0
        } else {
            0.0
        }
    }
}

pub struct GradingService {
    choice_policy: Box<dyn ChoiceScoringPolicy>,
}

impl Default for GradingService {
    fn default() -> Self {
        Self::new(Box::new(ExactSetPolicy))
    }
}

impl GradingService {
    pub fn new(choice_policy: Box<dyn ChoiceScoringPolicy>) -> Self {
        Self { choice_policy }
    }

    /// Grade one question against an optional submission. An absent
    /// submission grades to zero, never to an error. A submission whose
    /// variant does not match the question also grades to zero. Invalid
    /// correct-answer data is a validation error.
    pub fn grade(
        &self,
        question: &Question,
        answer: Option<&SubmittedAnswer>,
    ) -> AppResult<QuestionGrade> {
        let Some(answer) = answer else {
            return Ok(Self::unanswered(question));
        };

        let (score, detail) = match (&question.content, answer) {
            (
                QuestionContent::SingleChoice { options },
                SubmittedAnswer::SingleChoice(selected),
            ) => {
                let correct_id = options
                    .iter()
                    .find(|o| o.is_correct)
                    .map(|o| o.id.as_str())
                    .ok_or_else(|| {
                        AppError::ValidationError(
                            "Single choice question has no correct option".to_string(),
                        )
                    })?;
                let score = if selected == correct_id { 1.0 } else { 0.0 };
                (
                    score,
                    GradeDetail::Choice {
                        selected: vec![selected.clone()],
                    },
                )
            }
            (
                QuestionContent::MultipleChoice { options },
                SubmittedAnswer::MultipleChoice(selected),
            ) => {
                let correct_ids: HashSet<&str> = options
                    .iter()
                    .filter(|o| o.is_correct)
                    .map(|o| o.id.as_str())
                    .collect();
                if correct_ids.is_empty() {
                    return Err(AppError::ValidationError(
                        "Multiple choice question has no correct options".to_string(),
                    ));
                }
                let selected_ids: HashSet<&str> =
                    selected.iter().map(String::as_str).collect();
                let score = self.choice_policy.score(&correct_ids, &selected_ids);
                (
                    score,
                    GradeDetail::Choice {
                        selected: selected.clone(),
                    },
                )
            }
            (
                QuestionContent::TrueFalse { correct_answer },
                SubmittedAnswer::TrueFalse(selected),
            ) => {
                let score = if selected == correct_answer { 1.0 } else { 0.0 };
                (score, GradeDetail::TrueFalse { selected: *selected })
            }
            (
                QuestionContent::Matching {
                    items,
                    correct_matches,
                    ..
                },
                SubmittedAnswer::Matching(assignments),
            ) => {
                let left_ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
                let expected: HashMap<&str, &str> = correct_matches
                    .iter()
                    .map(|pair| (pair.item_id.as_str(), pair.match_id.as_str()))
                    .collect();
                let (score, pairs) =
                    Self::grade_assignments(&left_ids, &expected, assignments, "item")?;
                (score, GradeDetail::Matching { pairs })
            }
            (
                QuestionContent::ImageMatching {
                    labels,
                    correct_matches,
                    ..
                },
                SubmittedAnswer::ImageMatching(assignments),
            ) => {
                let left_ids: Vec<&str> = labels.iter().map(|l| l.id.as_str()).collect();
                let expected: HashMap<&str, &str> = correct_matches
                    .iter()
                    .map(|pair| (pair.label_id.as_str(), pair.image_id.as_str()))
                    .collect();
                let (score, pairs) =
                    Self::grade_assignments(&left_ids, &expected, assignments, "label")?;
                (score, GradeDetail::Matching { pairs })
            }
            (
                QuestionContent::FillBlanks {
                    correct_answers, ..
                },
                SubmittedAnswer::FillBlanks(slots),
            ) => {
                if correct_answers.is_empty() {
                    return Err(AppError::ValidationError(
                        "Fill in the blanks question has no blanks".to_string(),
                    ));
                }
                let mut blanks = Vec::with_capacity(correct_answers.len());
                let mut correct_count = 0usize;
                for (index, expected) in correct_answers.iter().enumerate() {
                    let selected = slots.get(index).cloned().flatten();
                    // an unfilled slot is never correct
                    let correct = selected.as_deref() == Some(expected.as_str());
                    if correct {
                        correct_count += 1;
                    }
                    blanks.push(BlankOutcome {
                        index,
                        selected,
                        correct,
                    });
                }
                let score = correct_count as f64 / correct_answers.len() as f64;
                (score, GradeDetail::FillBlanks { blanks })
            }
            (content, answer) => {
                log::debug!(
                    "answer variant {:?} does not match question variant {:?}, grading as unanswered",
                    answer.question_type(),
                    content.question_type()
                );
                return Ok(Self::unanswered(question));
            }
        };

        Ok(Self::outcome(question, score, detail))
    }

    /// Grade a whole submission. Every question is graded: missing
    /// answers score zero; answers for unknown questions are ignored.
    pub fn grade_submission(
        &self,
        questions: &[Question],
        answers: &[SubmitAnswerInput],
    ) -> AppResult<SubmissionGrade> {
        let answer_map: HashMap<&str, &SubmittedAnswer> = answers
            .iter()
            .map(|input| (input.question_id.as_str(), &input.answer))
            .collect();
        let known: HashSet<&str> = questions.iter().map(|q| q.id.as_str()).collect();
        for input in answers {
            if !known.contains(input.question_id.as_str()) {
                log::debug!(
                    "ignoring answer for unknown question '{}'",
                    input.question_id
                );
            }
        }

        let mut question_grades = Vec::with_capacity(questions.len());
        let mut points_earned = 0.0;
        let mut total_possible = 0u32;
        for question in questions {
            let grade = self.grade(question, answer_map.get(question.id.as_str()).copied())?;
            points_earned += grade.points_earned;
            total_possible += question.points;
            question_grades.push(grade);
        }

        Ok(SubmissionGrade {
            points_earned,
            total_possible,
            question_grades,
        })
    }

    fn grade_assignments(
        left_ids: &[&str],
        expected: &HashMap<&str, &str>,
        assignments: &HashMap<String, String>,
        side: &str,
    ) -> AppResult<(f64, Vec<PairOutcome>)> {
        if left_ids.is_empty() {
            return Err(AppError::ValidationError(format!(
                "Matching question has no {}s",
                side
            )));
        }

        let mut pairs = Vec::with_capacity(left_ids.len());
        let mut correct_count = 0usize;
        for left_id in left_ids {
            let expected_right = expected.get(left_id).copied().ok_or_else(|| {
                AppError::ValidationError(format!(
                    "Matching question has no correct match for {} '{}'",
                    side, left_id
                ))
            })?;
            let selected = assignments.get(*left_id).cloned();
            let correct = selected.as_deref() == Some(expected_right);
            if correct {
                correct_count += 1;
            }
            pairs.push(PairOutcome {
                left_id: left_id.to_string(),
                selected,
                correct,
            });
        }

        let score = correct_count as f64 / left_ids.len() as f64;
        Ok((score, pairs))
    }

    fn outcome(question: &Question, score: f64, detail: GradeDetail) -> QuestionGrade {
        QuestionGrade {
            question_id: question.id.clone(),
            correct: score >= 1.0,
            score,
            points_earned: score * f64::from(question.points),
            detail,
        }
    }

    fn unanswered(question: &Question) -> QuestionGrade {
        QuestionGrade {
            question_id: question.id.clone(),
            correct: false,
            score: 0.0,
            points_earned: 0.0,
            detail: GradeDetail::Unanswered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures;

    fn single(id: &str) -> SubmittedAnswer {
        SubmittedAnswer::SingleChoice(id.to_string())
    }

    fn multi(ids: &[&str]) -> SubmittedAnswer {
        SubmittedAnswer::MultipleChoice(ids.iter().map(|id| id.to_string()).collect())
    }

    fn assignments(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(left, right)| (left.to_string(), right.to_string()))
            .collect()
    }

    #[test]
    fn single_choice_grades_on_the_one_correct_option() {
        let service = GradingService::default();
        let question = fixtures::single_choice_question();

        let right = service.grade(&question, Some(&single("o1"))).unwrap();
        assert!(right.correct);
        assert_eq!(right.score, 1.0);
        assert_eq!(right.points_earned, 1.0);

        let wrong = service.grade(&question, Some(&single("o2"))).unwrap();
        assert!(!wrong.correct);
        assert_eq!(wrong.points_earned, 0.0);
    }

    #[test]
    fn multiple_choice_requires_exact_set_equality() {
        let service = GradingService::default();
        let question = fixtures::multiple_choice_question();

        // subset is not partially correct
        assert!(!service.grade(&question, Some(&multi(&["o1"]))).unwrap().correct);
        // exact set, order irrelevant
        assert!(service
            .grade(&question, Some(&multi(&["o2", "o1"])))
            .unwrap()
            .correct);
        // superset is incorrect
        assert!(!service
            .grade(&question, Some(&multi(&["o1", "o2", "o3"])))
            .unwrap()
            .correct);
    }

    #[test]
    fn choice_policy_is_substitutable_without_touching_callers() {
        struct SubsetCredit;
        impl ChoiceScoringPolicy for SubsetCredit {
            fn score(&self, correct_ids: &HashSet<&str>, selected_ids: &HashSet<&str>) -> f64 {
                let hits = selected_ids.intersection(correct_ids).count();
                if selected_ids.len() != hits {
                    return 0.0;
                }
                hits as f64 / correct_ids.len() as f64
            }
        }

        let service = GradingService::new(Box::new(SubsetCredit));
        let question = fixtures::multiple_choice_question();

        let partial = service.grade(&question, Some(&multi(&["o1"]))).unwrap();
        assert_eq!(partial.score, 0.5);
        assert!(!partial.correct);
    }

    #[test]
    fn true_false_compares_against_correct_answer() {
        let service = GradingService::default();
        let question = fixtures::true_false_question();

        assert!(service
            .grade(&question, Some(&SubmittedAnswer::TrueFalse(true)))
            .unwrap()
            .correct);
        assert!(!service
            .grade(&question, Some(&SubmittedAnswer::TrueFalse(false)))
            .unwrap()
            .correct);
    }

    #[test]
    fn matching_scores_fraction_of_correct_pairs() {
        let service = GradingService::default();
        let question = fixtures::matching_question();
        let answer =
            SubmittedAnswer::Matching(assignments(&[("i1", "m1"), ("i2", "m9")]));

        let grade = service.grade(&question, Some(&answer)).unwrap();

        assert!(!grade.correct);
        assert_eq!(grade.score, 0.5);
        let GradeDetail::Matching { pairs } = &grade.detail else {
            panic!("expected matching detail");
        };
        assert!(pairs.iter().any(|p| p.left_id == "i1" && p.correct));
        assert!(pairs.iter().any(|p| p.left_id == "i2" && !p.correct));
    }

    #[test]
    fn matching_treats_missing_assignments_as_incorrect() {
        let service = GradingService::default();
        let question = fixtures::matching_question();
        let answer = SubmittedAnswer::Matching(assignments(&[("i1", "m1")]));

        let grade = service.grade(&question, Some(&answer)).unwrap();

        assert_eq!(grade.score, 0.5);
    }

    #[test]
    fn image_matching_grades_like_matching_keyed_by_label() {
        let service = GradingService::default();
        let question = fixtures::image_matching_question();
        let answer =
            SubmittedAnswer::ImageMatching(assignments(&[("l1", "img1"), ("l2", "img2")]));

        let grade = service.grade(&question, Some(&answer)).unwrap();

        assert!(grade.correct);
        assert_eq!(grade.score, 1.0);
    }

    #[test]
    fn fill_blanks_scores_per_slot_and_null_is_never_correct() {
        let service = GradingService::default();
        let question = fixtures::fill_blanks_question();
        let answer =
            SubmittedAnswer::FillBlanks(vec![Some("a1".to_string()), None]);

        let grade = service.grade(&question, Some(&answer)).unwrap();

        assert!(!grade.correct);
        assert_eq!(grade.score, 0.5);
        let GradeDetail::FillBlanks { blanks } = &grade.detail else {
            panic!("expected fill-blanks detail");
        };
        assert!(blanks[0].correct);
        assert!(!blanks[1].correct);
        assert_eq!(blanks[1].selected, None);
    }

    #[test]
    fn fill_blanks_positions_are_independent_of_candidate_order() {
        let service = GradingService::default();
        let question = fixtures::fill_blanks_question();
        // right candidates, wrong slots
        let answer =
            SubmittedAnswer::FillBlanks(vec![Some("a2".to_string()), Some("a1".to_string())]);

        let grade = service.grade(&question, Some(&answer)).unwrap();

        assert_eq!(grade.score, 0.0);
    }

    #[test]
    fn unanswered_question_grades_to_zero_not_error() {
        let service = GradingService::default();
        for question in fixtures::all_variant_questions() {
            let grade = service.grade(&question, None).unwrap();
            assert!(!grade.correct);
            assert_eq!(grade.score, 0.0);
            assert_eq!(grade.detail, GradeDetail::Unanswered);
        }
    }

    #[test]
    fn mismatched_answer_variant_grades_to_zero() {
        let service = GradingService::default();
        let question = fixtures::true_false_question();

        let grade = service.grade(&question, Some(&single("o1"))).unwrap();

        assert!(!grade.correct);
        assert_eq!(grade.detail, GradeDetail::Unanswered);
    }

    #[test]
    fn choice_question_without_correct_option_is_a_validation_error() {
        let service = GradingService::default();
        let mut question = fixtures::single_choice_question();
        if let QuestionContent::SingleChoice { options } = &mut question.content {
            for option in options.iter_mut() {
                option.is_correct = false;
            }
        }

        let result = service.grade(&question, Some(&single("o1")));

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn grading_is_pure_and_idempotent() {
        let service = GradingService::default();
        let question = fixtures::matching_question();
        let answer = SubmittedAnswer::Matching(assignments(&[("i1", "m1"), ("i2", "m9")]));
        let question_before = question.clone();
        let answer_before = answer.clone();

        let first = service.grade(&question, Some(&answer)).unwrap();
        let second = service.grade(&question, Some(&answer)).unwrap();

        assert_eq!(first, second);
        assert_eq!(question, question_before);
        assert_eq!(answer, answer_before);
    }

    #[test]
    fn grade_submission_aggregates_points_over_all_questions() {
        let service = GradingService::default();
        let mut questions = vec![
            fixtures::single_choice_question(),
            fixtures::matching_question(),
        ];
        questions[1].points = 2;

        let answers = vec![
            SubmitAnswerInput {
                question_id: "q-single".to_string(),
                answer: single("o1"),
            },
            SubmitAnswerInput {
                question_id: "q-match".to_string(),
                answer: SubmittedAnswer::Matching(assignments(&[("i1", "m1"), ("i2", "m9")])),
            },
            SubmitAnswerInput {
                question_id: "q-ghost".to_string(),
                answer: single("o1"),
            },
        ];

        let submission = service.grade_submission(&questions, &answers).unwrap();

        assert_eq!(submission.total_possible, 3);
        assert_eq!(submission.points_earned, 2.0); // 1.0 + 0.5 * 2
        assert_eq!(submission.question_grades.len(), 2);
        assert_eq!(submission.correct_count(), 1);
    }

    #[test]
    fn grade_submission_scores_missing_answers_as_zero() {
        let service = GradingService::default();
        let questions = fixtures::all_variant_questions();

        let submission = service.grade_submission(&questions, &[]).unwrap();

        assert_eq!(submission.points_earned, 0.0);
        assert_eq!(submission.total_possible, 6);
        assert!(submission.question_grades.iter().all(|g| !g.correct));
    }
}
