//! Kura Data Models
//!
//! Request/response DTOs for the HTTP API.

mod template;

pub use template::*;
