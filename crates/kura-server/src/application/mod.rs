//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between
//! repositories and server-side services.

mod template_service;

pub use template_service::{TemplateChanges, TemplateService};
