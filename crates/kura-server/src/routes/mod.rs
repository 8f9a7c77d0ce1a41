//! Kura API Routes
//!
//! - /kura/templates - Template management (owner scoped via X-User-Id)
//! - /kura/templates/public - Shared template catalogue
//! - /kura/templates/:id/render - Argument substitution

pub mod swagger;
pub mod template;
