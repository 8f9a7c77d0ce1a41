//! Kura Domain Library
//!
//! Core domain types and interfaces for the Kura prompt template store.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: The Template aggregate and its messages/arguments
//!   - `value_objects/`: Immutable value types (TemplateId, UserId, MessageRole)
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Data access interfaces
//!
//! - **Container** (`container`): Explicit service registry used to wire
//!   adapters to ports at startup
//!
//! # Usage
//!
//! ```rust,ignore
//! use kura::{Container, Template, TemplateDraft, TemplateRepository, UserId};
//!
//! let repo: Arc<dyn TemplateRepository> = container.resolve("template_repository")?;
//! let draft = TemplateDraft::new(UserId::new("u-1")?, "Greeting");
//! repo.save(&Template::create(draft)?).await?;
//! ```

pub mod container;
pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use container::Container;
pub use domain::{
    BoxError, DomainError, MessageRole, Template, TemplateArgument, TemplateDraft, TemplateId,
    TemplateMessage, TemplateRecord, UserId,
};
pub use ports::{sort_by_recent_update, TemplateRepository};
