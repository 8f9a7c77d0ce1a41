//! In-process adapters for tests and local runs

mod template_repository;

pub use template_repository::InMemoryTemplateRepository;
