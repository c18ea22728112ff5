pub use formation_models::document_types::*;
