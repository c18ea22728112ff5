pub mod audit;
pub mod document_types;
pub mod documents;
pub mod enrollments;
pub mod metadata;
pub mod progress;
pub mod sessions;
pub mod students;
pub mod templates;
pub mod tokens;
pub mod ui_templates;
