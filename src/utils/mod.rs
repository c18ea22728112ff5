//! Shared utilities:
//!
//! - [`email`]: outbound SMTP notifications (lettre)
//! - [`csv_export`]: CSV serialization for exports

pub mod csv_export;
pub mod email;
