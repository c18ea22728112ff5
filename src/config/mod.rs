//! Configuration modules for the Formation API.
//!
//! Each submodule handles one aspect of configuration, loaded from
//! environment variables:
//!
//! - [`cors`]: CORS allow-list
//! - [`database`]: PostgreSQL connection pool initialization
//! - [`email`]: SMTP configuration for outbound notifications

pub mod cors;
pub mod database;
pub mod email;
