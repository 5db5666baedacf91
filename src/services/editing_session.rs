use std::sync::Arc;

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::domain::content::{MatchImage, QuestionContent, QuestionType};
use crate::models::domain::Question;
use crate::models::dto::request::SaveQuestionRequest;
use crate::repositories::{FileUpload, MediaRepository, QuestionRepository};
use crate::services::order_service::OrderService;
use crate::services::validation_service::QuestionValidator;

/// Regenerates the draft's content as the canonical default of the new
/// type. Prior content is discarded, never migrated: switching variants is
/// authoring behavior, not data loss. A no-op when the type is unchanged.
pub fn apply_type_change(draft: &mut Question, new_type: QuestionType) {
    if draft.question_type() == new_type {
        return;
    }
    draft.content = QuestionContent::default_for(new_type);
}

/// Transient authoring state for one quiz: the question list, at most one
/// open editor, and the collaborator handles. All mutation goes through
/// session methods so the single-open invariant holds in one place.
pub struct EditingSession {
    quiz_id: String,
    config: Config,
    repository: Arc<dyn QuestionRepository>,
    media: Arc<dyn MediaRepository>,
    order: OrderService,
    questions: Vec<Question>,
    open_question_id: Option<String>,
}

impl EditingSession {
    pub fn new(
        quiz_id: &str,
        repository: Arc<dyn QuestionRepository>,
        media: Arc<dyn MediaRepository>,
        config: Config,
    ) -> Self {
        let order = OrderService::new(repository.clone(), &config.temp_id_prefix);
        Self {
            quiz_id: quiz_id.to_string(),
            config,
            repository,
            media,
            order,
            questions: Vec::new(),
            open_question_id: None,
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn open_question_id(&self) -> Option<&str> {
        self.open_question_id.as_deref()
    }

    pub fn open_question(&self) -> Option<&Question> {
        let open_id = self.open_question_id.as_deref()?;
        self.questions.iter().find(|q| q.id == open_id)
    }

    /// Mutable access to the open draft for field edits (text, points,
    /// content elements). Returns None when no editor is open.
    pub fn open_question_mut(&mut self) -> Option<&mut Question> {
        let open_id = self.open_question_id.clone()?;
        self.questions.iter_mut().find(|q| q.id == open_id)
    }

    pub async fn load(&mut self) -> AppResult<()> {
        let mut questions = self.repository.fetch_for_quiz(&self.quiz_id).await?;
        questions.sort_by_key(|q| q.order);
        OrderService::renumber(&mut questions);
        log::info!(
            "loaded {} question(s) for quiz '{}'",
            questions.len(),
            self.quiz_id
        );
        self.questions = questions;
        self.open_question_id = None;
        Ok(())
    }

    /// Creates a temp-id draft, appends it at the end of the list and opens
    /// it for editing, implicitly closing any previously open editor.
    pub async fn add_question(&mut self) -> AppResult<String> {
        let draft = Question::new_draft(&self.config.temp_id_prefix, self.config.default_points);
        let draft_id = draft.id.clone();
        self.open_question_id = Some(draft_id.clone());
        self.order
            .append(&self.quiz_id, &mut self.questions, draft)
            .await?;
        Ok(draft_id)
    }

    /// Opens an existing question for editing. The previously open editor
    /// is closed without an unsaved-changes warning; an abandoned unsaved
    /// draft stays in the list until it is explicitly canceled or deleted.
    pub fn open(&mut self, id: &str) -> AppResult<()> {
        if !self.questions.iter().any(|q| q.id == id) {
            return Err(AppError::NotFound(format!(
                "Question with id '{}' not found",
                id
            )));
        }
        self.open_question_id = Some(id.to_string());
        Ok(())
    }

    /// Closes the editor. A never-persisted draft is removed from the list
    /// again; persisted content is left untouched.
    pub fn cancel_edit(&mut self) {
        let Some(open_id) = self.open_question_id.take() else {
            return;
        };
        let is_unsaved_draft = self
            .questions
            .iter()
            .any(|q| q.id == open_id && q.is_temporary(&self.config.temp_id_prefix));
        if is_unsaved_draft {
            self.questions.retain(|q| q.id != open_id);
            OrderService::renumber(&mut self.questions);
            log::debug!("discarded unsaved draft '{}'", open_id);
        }
    }

    pub fn change_type(&mut self, new_type: QuestionType) -> AppResult<()> {
        let draft = self.open_question_mut().ok_or_else(|| {
            AppError::NotFound("No question is open for editing".to_string())
        })?;
        apply_type_change(draft, new_type);
        Ok(())
    }

    /// Validation messages for the open question, computed on a normalized
    /// copy so the draft itself is not touched.
    pub fn validate_open(&self) -> AppResult<Vec<String>> {
        let open = self.open_question().ok_or_else(|| {
            AppError::NotFound("No question is open for editing".to_string())
        })?;
        let mut candidate = open.clone();
        candidate.content.normalize();
        Ok(QuestionValidator::validate(&candidate))
    }

    /// Normalizes and validates the open draft, then persists it: a draft
    /// with a temporary id is created and has its id replaced everywhere
    /// (list entry, open-editor pointer) by the server-issued one; a
    /// persisted question is updated in place. Validation failures block
    /// the save and nothing is sent.
    pub async fn save_open(&mut self) -> AppResult<Question> {
        let open_id = self.open_question_id.clone().ok_or_else(|| {
            AppError::NotFound("No question is open for editing".to_string())
        })?;
        let index = self
            .questions
            .iter()
            .position(|q| q.id == open_id)
            .ok_or_else(|| {
                AppError::InternalError(format!(
                    "Open question '{}' is missing from the list",
                    open_id
                ))
            })?;

        self.questions[index].content.normalize();
        let errors = QuestionValidator::validate(&self.questions[index]);
        if !errors.is_empty() {
            return Err(AppError::ValidationError(errors.join("; ")));
        }

        let request = SaveQuestionRequest::from(&self.questions[index]);
        let is_temp = self.questions[index].is_temporary(&self.config.temp_id_prefix);
        let persisted = if is_temp {
            log::info!("creating question for quiz '{}'", self.quiz_id);
            self.repository.create(&self.quiz_id, request).await?
        } else {
            log::info!("updating question '{}'", open_id);
            self.repository.update(&open_id, request).await?
        };

        // keep the locally managed order; the backend copy may lag a
        // not-yet-persisted renumbering
        let mut saved = persisted;
        saved.order = self.questions[index].order;
        if is_temp {
            self.open_question_id = Some(saved.id.clone());
        }
        self.questions[index] = saved.clone();
        Ok(saved)
    }

    /// Deletes a question. Never-persisted drafts are only removed locally;
    /// persisted questions are removed optimistically, then the backend
    /// delete and order persist run.
    pub async fn delete_question(&mut self, id: &str) -> AppResult<()> {
        let question = self
            .questions
            .iter()
            .find(|q| q.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Question with id '{}' not found", id)))?;
        let is_temp = question.is_temporary(&self.config.temp_id_prefix);

        if self.open_question_id.as_deref() == Some(id) {
            self.open_question_id = None;
        }

        if is_temp {
            self.questions.retain(|q| q.id != id);
            OrderService::renumber(&mut self.questions);
            return Ok(());
        }

        self.order
            .remove(&self.quiz_id, &mut self.questions, id)
            .await?;
        self.repository.delete(id).await
    }

    pub async fn reorder(&mut self, from_index: usize, to_index: usize) -> AppResult<()> {
        self.order
            .reorder(&self.quiz_id, &mut self.questions, from_index, to_index)
            .await
    }

    /// Duplicates into a new draft at the end of the list; the copy is
    /// persisted later through its own save.
    pub async fn duplicate(&mut self, id: &str) -> AppResult<String> {
        self.order
            .duplicate(&self.quiz_id, &mut self.questions, id)
            .await
    }

    /// Uploads one file and appends it as an image element on the open
    /// image-matching draft.
    pub async fn upload_image(&mut self, file: FileUpload) -> AppResult<String> {
        self.ensure_open_image_matching()?;
        let uploaded = self.media.upload(file).await?;
        self.push_images(std::slice::from_ref(&uploaded.url));
        Ok(uploaded.url)
    }

    /// Uploads a batch of files and appends them all.
    pub async fn upload_images(&mut self, files: Vec<FileUpload>) -> AppResult<Vec<String>> {
        self.ensure_open_image_matching()?;
        let uploaded = self.media.upload_many(files).await?;
        let urls: Vec<String> = uploaded.into_iter().map(|u| u.url).collect();
        self.push_images(&urls);
        Ok(urls)
    }

    fn ensure_open_image_matching(&self) -> AppResult<()> {
        let open = self.open_question().ok_or_else(|| {
            AppError::NotFound("No question is open for editing".to_string())
        })?;
        if !matches!(open.content, QuestionContent::ImageMatching { .. }) {
            return Err(AppError::ValidationError(
                "Images can only be attached to an image matching question".to_string(),
            ));
        }
        Ok(())
    }

    fn push_images(&mut self, urls: &[String]) {
        if let Some(Question {
            content: QuestionContent::ImageMatching { images, .. },
            ..
        }) = self.open_question_mut()
        {
            for url in urls {
                images.push(MatchImage::new(url));
            }
        }
    }
}
