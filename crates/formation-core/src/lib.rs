//! # Formation Core
//!
//! Core types, errors, and utilities for the Formation API.
//!
//! This crate provides foundational types used throughout the application:
//!
//! - [`errors`]: Application error types with HTTP response conversion
//! - [`pagination`]: Pagination utilities for API responses
//! - [`password`]: Password hashing and random password generation

pub mod errors;
pub mod pagination;
pub mod password;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{generate_password, hash_password, verify_password};
