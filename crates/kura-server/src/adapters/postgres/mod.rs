//! PostgreSQL Repository Implementations

mod template_repository;

pub use template_repository::PgTemplateRepository;
