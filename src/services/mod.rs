pub mod blank_extractor;
pub mod editing_session;
pub mod grading_service;
pub mod order_service;
pub mod validation_service;

pub use editing_session::{apply_type_change, EditingSession};
pub use grading_service::GradingService;
pub use order_service::OrderService;
pub use validation_service::QuestionValidator;
