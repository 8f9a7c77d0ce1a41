//! Repository Ports
//!
//! Abstract interfaces for data persistence operations.

mod template_repository;

pub use template_repository::*;
