use std::collections::HashSet;

use validator::Validate;

use crate::models::domain::content::QuestionContent;
use crate::models::domain::Question;
use crate::models::dto::request::SaveQuestionRequest;
use crate::services::blank_extractor;

/// Authoring-time validation. An empty message list means the question may
/// be persisted; a non-empty list blocks the save. Never mutates state;
/// callers normalize fill-blanks content before validating.
pub struct QuestionValidator;

impl QuestionValidator {
    pub fn validate(question: &Question) -> Vec<String> {
        let mut errors = Vec::new();

        let request = SaveQuestionRequest::from(question);
        if let Err(field_errors) = request.validate() {
            for (field, field_errs) in field_errors.field_errors() {
                for err in field_errs.iter() {
                    match &err.message {
                        Some(message) => errors.push(message.to_string()),
                        None => errors.push(format!("Invalid value for field '{}'", field)),
                    }
                }
            }
        }

        Self::validate_content(question, &mut errors);
        errors
    }

    fn validate_content(question: &Question, errors: &mut Vec<String>) {
        match &question.content {
            QuestionContent::SingleChoice { options } => {
                if options.len() < 2 {
                    errors.push("A single choice question needs at least two options".to_string());
                }
                if options.iter().any(|o| o.text.trim().is_empty()) {
                    errors.push("All options need text".to_string());
                }
                let correct_count = options.iter().filter(|o| o.is_correct).count();
                if correct_count != 1 {
                    errors.push(
                        "A single choice question needs exactly one correct option".to_string(),
                    );
                }
            }
            QuestionContent::MultipleChoice { options } => {
                if options.len() < 2 {
                    errors
                        .push("A multiple choice question needs at least two options".to_string());
                }
                if options.iter().any(|o| o.text.trim().is_empty()) {
                    errors.push("All options need text".to_string());
                }
                if !options.iter().any(|o| o.is_correct) {
                    errors.push(
                        "A multiple choice question needs at least one correct option".to_string(),
                    );
                }
            }
            QuestionContent::TrueFalse { .. } => {}
            QuestionContent::Matching {
                items,
                matches,
                correct_matches,
            } => {
                if items.iter().any(|i| i.text.trim().is_empty()) {
                    errors.push("All items need text".to_string());
                }
                if matches.iter().any(|m| m.text.trim().is_empty()) {
                    errors.push("All matches need text".to_string());
                }

                let item_ids: HashSet<&str> = items.iter().map(|i| i.id.as_str()).collect();
                let match_ids: HashSet<&str> = matches.iter().map(|m| m.id.as_str()).collect();

                for item in items {
                    let linked = correct_matches
                        .iter()
                        .filter(|pair| pair.item_id == item.id)
                        .count();
                    if linked == 0 {
                        errors.push(format!("Item '{}' has no correct match", item.text.trim()));
                    } else if linked > 1 {
                        errors.push(format!(
                            "Item '{}' has more than one correct match",
                            item.text.trim()
                        ));
                    }
                }
                for pair in correct_matches {
                    if !item_ids.contains(pair.item_id.as_str()) {
                        errors.push("A correct match references an unknown item".to_string());
                    }
                    if !match_ids.contains(pair.match_id.as_str()) {
                        errors.push("A correct match references an unknown match".to_string());
                    }
                }
            }
            QuestionContent::ImageMatching {
                labels,
                images,
                correct_matches,
            } => {
                if labels.iter().any(|l| l.text.trim().is_empty()) {
                    errors.push("All labels need text".to_string());
                }
                if images.iter().any(|i| i.url.trim().is_empty()) {
                    errors.push("Every image needs an uploaded file".to_string());
                }

                let label_ids: HashSet<&str> = labels.iter().map(|l| l.id.as_str()).collect();
                let image_ids: HashSet<&str> = images.iter().map(|i| i.id.as_str()).collect();

                for label in labels {
                    let linked = correct_matches
                        .iter()
                        .filter(|pair| pair.label_id == label.id)
                        .count();
                    if linked == 0 {
                        errors.push(format!(
                            "Label '{}' has no correct image",
                            label.text.trim()
                        ));
                    } else if linked > 1 {
                        errors.push(format!(
                            "Label '{}' has more than one correct image",
                            label.text.trim()
                        ));
                    }
                }
                for pair in correct_matches {
                    if !label_ids.contains(pair.label_id.as_str()) {
                        errors.push("A correct match references an unknown label".to_string());
                    }
                    if !image_ids.contains(pair.image_id.as_str()) {
                        errors.push("A correct match references an unknown image".to_string());
                    }
                }
            }
            QuestionContent::FillBlanks {
                answers,
                correct_answers,
            } => {
                let blanks = blank_extractor::blank_count(&question.text);
                if blanks == 0 {
                    errors.push(
                        "The question text needs at least one [[blank]] marker".to_string(),
                    );
                } else if correct_answers.len() != blanks {
                    errors.push(format!(
                        "The text has {} blank(s) but {} correct answer(s) are set",
                        blanks,
                        correct_answers.len()
                    ));
                }

                // Candidates with empty trimmed text are discarded before
                // save; ids pointing at them are unknown here.
                let candidate_ids: HashSet<&str> = answers
                    .iter()
                    .filter(|a| !a.text.trim().is_empty())
                    .map(|a| a.id.as_str())
                    .collect();
                for id in correct_answers {
                    if !candidate_ids.contains(id.as_str()) {
                        errors.push("A blank references an unknown answer".to_string());
                    }
                }
            }
        }
    }
}
