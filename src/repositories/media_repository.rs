use async_trait::async_trait;

use crate::errors::AppResult;

#[derive(Clone, Debug)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadedFile {
    pub url: String,
}

/// Upload collaborator, used only when authoring image-matching questions.
/// The core cares about the returned url, not the transfer mechanics.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaRepository: Send + Sync {
    async fn upload(&self, file: FileUpload) -> AppResult<UploadedFile>;
    async fn upload_many(&self, files: Vec<FileUpload>) -> AppResult<Vec<UploadedFile>>;
}
