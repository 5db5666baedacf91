pub mod media_repository;
pub mod question_repository;

pub use media_repository::{FileUpload, MediaRepository, UploadedFile};
pub use question_repository::QuestionRepository;
