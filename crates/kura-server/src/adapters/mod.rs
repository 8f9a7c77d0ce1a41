//! Infrastructure Adapters
//!
//! Implementations of domain ports for external systems.

pub mod memory;
pub mod postgres;
pub mod row;
pub mod supabase;

// Re-exports
pub use memory::InMemoryTemplateRepository;
pub use postgres::PgTemplateRepository;
pub use row::TemplateRow;
pub use supabase::{SupabaseClient, SupabaseTemplateRepository};
