use std::sync::Arc;

use crate::errors::{AppError, AppResult};
use crate::models::domain::Question;
use crate::models::dto::request::ReorderEntry;
use crate::repositories::QuestionRepository;

/// Keeps a quiz's question list numbered 1..N with no gaps or duplicates.
/// Every mutating operation renumbers locally first, then fires a bulk
/// persist of the full order; a persist failure leaves the local list as
/// is (see the divergence note on `persist_order`).
pub struct OrderService {
    repository: Arc<dyn QuestionRepository>,
    temp_id_prefix: String,
}

impl OrderService {
    pub fn new(repository: Arc<dyn QuestionRepository>, temp_id_prefix: &str) -> Self {
        Self {
            repository,
            temp_id_prefix: temp_id_prefix.to_string(),
        }
    }

    /// Restores the 1..N invariant by current list position.
    pub fn renumber(list: &mut [Question]) {
        for (index, question) in list.iter_mut().enumerate() {
            question.order = (index + 1) as u32;
        }
    }

    /// Appends with `order = N + 1`.
    pub async fn append(
        &self,
        quiz_id: &str,
        list: &mut Vec<Question>,
        mut question: Question,
    ) -> AppResult<()> {
        question.order = list.len() as u32 + 1;
        list.push(question);
        self.persist_order(quiz_id, list).await
    }

    /// Removes by id and renumbers the remaining questions by their
    /// pre-delete relative order.
    pub async fn remove(
        &self,
        quiz_id: &str,
        list: &mut Vec<Question>,
        id: &str,
    ) -> AppResult<()> {
        let index = list
            .iter()
            .position(|q| q.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Question with id '{}' not found", id)))?;
        list.remove(index);
        Self::renumber(list);
        self.persist_order(quiz_id, list).await
    }

    /// Moves one question from `from_index` to `to_index`, then renumbers
    /// everything by new position.
    pub async fn reorder(
        &self,
        quiz_id: &str,
        list: &mut Vec<Question>,
        from_index: usize,
        to_index: usize,
    ) -> AppResult<()> {
        if from_index >= list.len() || to_index >= list.len() {
            return Err(AppError::ValidationError(format!(
                "Reorder index out of range (list has {} questions)",
                list.len()
            )));
        }
        if from_index == to_index {
            return Ok(());
        }

        let question = list.remove(from_index);
        list.insert(to_index, question);
        Self::renumber(list);
        self.persist_order(quiz_id, list).await
    }

    /// Clones content and explanation into a fresh draft (temporary id, no
    /// inherited order) appended at the end. The draft itself is persisted
    /// later through the editing session's save.
    pub async fn duplicate(
        &self,
        quiz_id: &str,
        list: &mut Vec<Question>,
        id: &str,
    ) -> AppResult<String> {
        let source = list
            .iter()
            .find(|q| q.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Question with id '{}' not found", id)))?;

        let mut copy = source.duplicate_as_draft(&self.temp_id_prefix);
        copy.order = list.len() as u32 + 1;
        let copy_id = copy.id.clone();
        list.push(copy);

        self.persist_order(quiz_id, list).await?;
        Ok(copy_id)
    }

    /// Sends the full renumbered order to the backend. Drafts with
    /// temporary ids are excluded, since the backend cannot know them; their
    /// slots are re-sent once created. On failure the local list keeps the
    /// new order and the error is surfaced; the divergence lasts until the
    /// next successful persist.
    async fn persist_order(&self, quiz_id: &str, list: &[Question]) -> AppResult<()> {
        let entries: Vec<ReorderEntry> = list
            .iter()
            .filter(|q| !q.is_temporary(&self.temp_id_prefix))
            .map(|q| ReorderEntry {
                id: q.id.clone(),
                order: q.order,
            })
            .collect();

        let skipped = list.len() - entries.len();
        if skipped > 0 {
            log::debug!(
                "bulk reorder for quiz '{}' skips {} unsaved draft(s)",
                quiz_id,
                skipped
            );
        }

        if let Err(err) = self.repository.bulk_reorder(quiz_id, entries).await {
            log::warn!(
                "bulk reorder for quiz '{}' failed: {}; keeping local order",
                quiz_id,
                err
            );
            return Err(err);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::question_repository::MockQuestionRepository;
    use crate::test_utils::fixtures;

    fn assert_contiguous(list: &[Question]) {
        for (index, question) in list.iter().enumerate() {
            assert_eq!(
                question.order,
                (index + 1) as u32,
                "order invariant broken at position {}",
                index
            );
        }
    }

    fn service_with_ok_reorder() -> OrderService {
        let mut repository = MockQuestionRepository::new();
        repository.expect_bulk_reorder().returning(|_, _| Ok(()));
        OrderService::new(Arc::new(repository), "tmp-")
    }

    #[test]
    fn renumber_restores_contiguous_orders() {
        let mut list = fixtures::all_variant_questions();
        list[0].order = 10;
        list[3].order = 0;

        OrderService::renumber(&mut list);

        assert_contiguous(&list);
    }

    #[tokio::test]
    async fn append_assigns_next_order() {
        let service = service_with_ok_reorder();
        let mut list = fixtures::all_variant_questions();
        let draft = Question::new_draft("tmp-", 1);

        service.append("quiz-1", &mut list, draft).await.unwrap();

        assert_eq!(list.len(), 7);
        assert_eq!(list[6].order, 7);
        assert_contiguous(&list);
    }

    #[tokio::test]
    async fn remove_renumbers_by_pre_delete_relative_order() {
        let service = service_with_ok_reorder();
        let mut list = fixtures::all_variant_questions();

        service.remove("quiz-1", &mut list, "q-bool").await.unwrap();

        assert_eq!(list.len(), 5);
        assert!(list.iter().all(|q| q.id != "q-bool"));
        assert_contiguous(&list);
        // q-match was behind q-bool and moved up
        assert_eq!(list[2].id, "q-match");
    }

    #[tokio::test]
    async fn remove_unknown_id_is_not_found() {
        let service = service_with_ok_reorder();
        let mut list = fixtures::all_variant_questions();

        let result = service.remove("quiz-1", &mut list, "q-ghost").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(list.len(), 6);
    }

    #[tokio::test]
    async fn reorder_moves_and_renumbers() {
        let service = service_with_ok_reorder();
        let mut list = fixtures::all_variant_questions();

        service.reorder("quiz-1", &mut list, 0, 3).await.unwrap();

        assert_eq!(list[3].id, "q-single");
        assert_contiguous(&list);
    }

    #[tokio::test]
    async fn reorder_out_of_range_is_rejected_before_any_call() {
        let mut repository = MockQuestionRepository::new();
        repository.expect_bulk_reorder().never();
        let service = OrderService::new(Arc::new(repository), "tmp-");
        let mut list = fixtures::all_variant_questions();

        let result = service.reorder("quiz-1", &mut list, 0, 9).await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
        assert_contiguous(&list);
    }

    #[tokio::test]
    async fn duplicate_appends_a_draft_copy_at_the_end() {
        let service = service_with_ok_reorder();
        let mut list = fixtures::all_variant_questions();

        let copy_id = service
            .duplicate("quiz-1", &mut list, "q-match")
            .await
            .unwrap();

        assert_eq!(list.len(), 7);
        let copy = &list[6];
        assert_eq!(copy.id, copy_id);
        assert!(copy.is_temporary("tmp-"));
        assert_eq!(copy.order, 7);
        assert_eq!(copy.content, fixtures::matching_question().content);
        assert_contiguous(&list);
    }

    #[tokio::test]
    async fn persisted_payload_excludes_temporary_drafts() {
        let mut repository = MockQuestionRepository::new();
        repository
            .expect_bulk_reorder()
            .withf(|quiz_id, entries| {
                quiz_id == "quiz-1"
                    && entries.len() == 6
                    && entries.iter().all(|e| !e.id.starts_with("tmp-"))
            })
            .returning(|_, _| Ok(()));
        let service = OrderService::new(Arc::new(repository), "tmp-");
        let mut list = fixtures::all_variant_questions();

        let draft = Question::new_draft("tmp-", 1);
        service.append("quiz-1", &mut list, draft).await.unwrap();
    }

    #[tokio::test]
    async fn failed_persist_keeps_the_local_order() {
        let mut repository = MockQuestionRepository::new();
        repository
            .expect_bulk_reorder()
            .returning(|_, _| Err(AppError::CollaboratorError("503".to_string())));
        let service = OrderService::new(Arc::new(repository), "tmp-");
        let mut list = fixtures::all_variant_questions();

        let result = service.reorder("quiz-1", &mut list, 5, 0).await;

        assert!(matches!(result, Err(AppError::CollaboratorError(_))));
        // local mutation is not rolled back
        assert_eq!(list[0].id, "q-fill");
        assert_contiguous(&list);
    }

    #[tokio::test]
    async fn order_invariant_survives_operation_sequences() {
        let service = service_with_ok_reorder();
        let mut list = fixtures::all_variant_questions();

        service
            .append("quiz-1", &mut list, Question::new_draft("tmp-", 1))
            .await
            .unwrap();
        service.remove("quiz-1", &mut list, "q-single").await.unwrap();
        service.reorder("quiz-1", &mut list, 2, 0).await.unwrap();
        service
            .duplicate("quiz-1", &mut list, "q-bool")
            .await
            .unwrap();
        service.remove("quiz-1", &mut list, "q-image").await.unwrap();

        assert_eq!(list.len(), 6);
        assert_contiguous(&list);
    }
}
