use async_trait::async_trait;

use crate::errors::AppResult;
use crate::models::domain::Question;
use crate::models::dto::request::{ReorderEntry, SaveQuestionRequest};

/// Persistence collaborator for quiz questions. The core consumes this and
/// never implements it; the backing transport (REST, in-memory, ...) is the
/// caller's concern. `create` returns the question with its server-issued
/// id, which replaces the draft's temporary id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn fetch_for_quiz(&self, quiz_id: &str) -> AppResult<Vec<Question>>;
    async fn create(&self, quiz_id: &str, request: SaveQuestionRequest) -> AppResult<Question>;
    async fn update(&self, id: &str, request: SaveQuestionRequest) -> AppResult<Question>;
    async fn delete(&self, id: &str) -> AppResult<()>;
    async fn bulk_reorder(&self, quiz_id: &str, entries: Vec<ReorderEntry>) -> AppResult<()>;
}
