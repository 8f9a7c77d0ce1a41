//! Supabase (PostgREST) adapters

mod client;
mod template_repository;

pub use client::SupabaseClient;
pub use template_repository::SupabaseTemplateRepository;
