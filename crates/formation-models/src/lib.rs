//! # Formation Models
//!
//! Domain entities, DTOs and the pure domain rules of the Formation API:
//! risk-score evaluation, the enrollment transition table, token expiry
//! arithmetic, metadata value validation, placeholder rendering and audit
//! diff formatting. Everything here is persistence-shaped (sqlx `FromRow`)
//! but free of I/O, so the rules unit-test without a database.

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
