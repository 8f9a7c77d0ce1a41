//! Template Repository Port
//!
//! Abstract interface for Template persistence operations.
//!
//! Reads fail soft: "not found" and storage failures both come back as
//! `None` or an empty list, and adapters log the failure. Writes fail loud
//! with [`DomainError::Persistence`] carrying the underlying cause.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, Template, TemplateId, UserId};

/// Repository interface for Template aggregates
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Find a template by ID
    async fn find_by_id(&self, id: &TemplateId) -> Option<Template>;

    /// Templates owned by a user, most recently updated first
    async fn find_by_user(&self, user_id: &UserId) -> Vec<Template>;

    /// Public templates, most recently updated first
    async fn find_public(&self) -> Vec<Template>;

    /// Insert or fully replace a template, keyed by its ID
    async fn save(&self, template: &Template) -> Result<(), DomainError>;

    /// Delete a template by ID; deleting a missing ID succeeds
    async fn delete(&self, id: &TemplateId) -> Result<(), DomainError>;
}

/// Newest `updated_at` first, the ordering every list query returns
pub fn sort_by_recent_update(templates: &mut [Template]) {
    templates.sort_by(|a, b| b.updated_at().cmp(&a.updated_at()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TemplateRecord;
    use chrono::{Duration, TimeZone, Utc};
    use std::sync::Mutex;

    /// Vec-backed repository exercising the port contract
    #[derive(Default)]
    struct VecRepository {
        templates: Mutex<Vec<Template>>,
    }

    #[async_trait]
    impl TemplateRepository for VecRepository {
        async fn find_by_id(&self, id: &TemplateId) -> Option<Template> {
            let templates = self.templates.lock().unwrap();
            templates.iter().find(|t| t.id() == id).cloned()
        }

        async fn find_by_user(&self, user_id: &UserId) -> Vec<Template> {
            let mut found: Vec<Template> = self
                .templates
                .lock()
                .unwrap()
                .iter()
                .filter(|t| t.user_id() == user_id)
                .cloned()
                .collect();
            sort_by_recent_update(&mut found);
            found
        }

        async fn find_public(&self) -> Vec<Template> {
            let mut found: Vec<Template> = self
                .templates
                .lock()
                .unwrap()
                .iter()
                .filter(|t| t.is_public())
                .cloned()
                .collect();
            sort_by_recent_update(&mut found);
            found
        }

        async fn save(&self, template: &Template) -> Result<(), DomainError> {
            let mut templates = self.templates.lock().unwrap();
            templates.retain(|t| t.id() != template.id());
            templates.push(template.clone());
            Ok(())
        }

        async fn delete(&self, id: &TemplateId) -> Result<(), DomainError> {
            self.templates.lock().unwrap().retain(|t| t.id() != id);
            Ok(())
        }
    }

    fn template(id: &str, is_public: bool, minutes_after: i64) -> Template {
        let created_at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        Template::from_persistence(TemplateRecord {
            id: id.to_string(),
            user_id: "u-1".to_string(),
            name: format!("Template {id}"),
            description: None,
            is_public,
            messages: Vec::new(),
            arguments: Vec::new(),
            created_at,
            updated_at: created_at + Duration::minutes(minutes_after),
        })
        .unwrap()
    }

    #[test]
    fn test_sort_by_recent_update() {
        let mut templates = vec![
            template("a", false, 1),
            template("b", false, 5),
            template("c", false, 3),
        ];
        sort_by_recent_update(&mut templates);

        let ids: Vec<&str> = templates.iter().map(|t| t.id().value()).collect();
        assert_eq!(ids, ["b", "c", "a"]);
    }

    #[tokio::test]
    async fn test_port_usable_as_trait_object() {
        let repo: Box<dyn TemplateRepository> = Box::new(VecRepository::default());
        repo.save(&template("old", true, 1)).await.unwrap();
        repo.save(&template("new", true, 9)).await.unwrap();
        repo.save(&template("hidden", false, 5)).await.unwrap();

        let public = repo.find_public().await;
        let ids: Vec<&str> = public.iter().map(|t| t.id().value()).collect();
        assert_eq!(ids, ["new", "old"]);
        assert_eq!(repo.find_by_user(&UserId::new("u-1").unwrap()).await.len(), 3);

        let missing = TemplateId::new("missing").unwrap();
        assert!(repo.find_by_id(&missing).await.is_none());
        repo.delete(&missing).await.unwrap();
    }
}
