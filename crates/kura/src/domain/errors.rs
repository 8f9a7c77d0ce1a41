//! Domain Errors
//!
//! Error types for domain operations and service resolution.

use thiserror::Error;

/// Boxed underlying cause of a storage failure
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("Failed to {operation} template: {source}")]
    Persistence {
        operation: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("No service registered for key '{key}'")]
    UnregisteredService { key: String },

    #[error("Service '{key}' does not have the requested type")]
    ServiceTypeMismatch { key: String },

    #[error("Circular dependency while constructing service '{key}'")]
    CircularDependency { key: String },

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl DomainError {
    pub fn persistence(operation: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Persistence {
            operation,
            source: source.into(),
        }
    }

    pub fn not_found<T: AsRef<str>>(entity_type: T, id: &str) -> Self {
        Self::NotFound {
            entity_type: entity_type.as_ref().to_string(),
            id: id.to_string(),
        }
    }

    pub fn unregistered(key: &str) -> Self {
        Self::UnregisteredService {
            key: key.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_persistence_message_includes_cause() {
        let err = DomainError::persistence("save", "Database error");
        assert_eq!(err.to_string(), "Failed to save template: Database error");
        assert_eq!(err.source().unwrap().to_string(), "Database error");
    }

    #[test]
    fn test_unregistered_names_key() {
        let err = DomainError::unregistered("template_repository");
        assert!(err.to_string().contains("template_repository"));
    }
}
