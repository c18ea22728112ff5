//! # Formation API
//!
//! Management backend for a training organization ("organisme de formation"):
//! student lifecycle, enrollment tracking, dropout-risk scoring, access-token
//! issuance, audit trail, and document/template management for Qualiopi-style
//! compliance paperwork.
//!
//! ## Architecture
//!
//! The codebase follows a modular architecture:
//!
//! ```text
//! src/
//! ├── config/           # Configuration (database, SMTP, CORS)
//! ├── modules/          # Feature modules
//! │   ├── students/        # Student CRUD, credentials, CSV export, stats
//! │   ├── sessions/        # Training session reference data
//! │   ├── enrollments/     # Enrollment status state machine
//! │   ├── progress/        # Progress records and dropout-risk scoring
//! │   ├── tokens/          # Access-token issuance and expiry bookkeeping
//! │   ├── audit/           # Audit trail recording and diff display
//! │   ├── documents/       # Documents and immutable versions
//! │   ├── document_types/  # Document type reference data
//! │   ├── metadata/        # Typed key/value metadata per document
//! │   ├── templates/       # Placeholder templates
//! │   └── ui_templates/    # Zoned HTML/CSS UI templates
//! └── utils/            # Email (SMTP) and CSV export helpers
//! ```
//!
//! Each feature module follows a consistent structure:
//!
//! - `mod.rs`: Module exports
//! - `controller.rs`: HTTP handlers (routes)
//! - `service.rs`: Business logic
//! - `model.rs`: Data models and DTOs (re-exported from `formation-models`)
//! - `router.rs`: Axum router configuration
//!
//! Domain entities and the pure rules (risk scoring, transition table, token
//! arithmetic, placeholder rendering) live in the `formation-models` crate;
//! shared error/pagination/password utilities live in `formation-core`.

pub mod config;
pub mod docs;
pub mod logging;
pub mod metrics;
pub mod modules;
pub mod router;
pub mod state;
pub mod utils;

// Re-export workspace crates for convenience
pub use formation_core;
pub use formation_models;
