//! Student data models and DTOs, re-exported from the `formation-models`
//! crate.

pub use formation_models::students::*;
