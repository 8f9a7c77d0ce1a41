//! Template Application Service (Use Case)
//!
//! Orchestrates domain operations for template management. Works only
//! against the `TemplateRepository` port and the `Template` aggregate.

use std::collections::HashMap;
use std::sync::Arc;

use kura::{
    DomainError, Template, TemplateArgument, TemplateDraft, TemplateId, TemplateMessage,
    TemplateRepository, UserId,
};

use crate::services::TemplateRenderer;

/// Partial update of a template; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct TemplateChanges {
    pub name: Option<String>,
    /// `Some("")` clears the description
    pub description: Option<String>,
    pub messages: Option<Vec<TemplateMessage>>,
    pub arguments: Option<Vec<TemplateArgument>>,
}

/// Application service for Template operations
pub struct TemplateService {
    repo: Arc<dyn TemplateRepository>,
    renderer: TemplateRenderer,
}

impl TemplateService {
    pub fn new(repo: Arc<dyn TemplateRepository>) -> Self {
        Self {
            repo,
            renderer: TemplateRenderer::new(),
        }
    }

    /// Templates owned by `user`, most recently updated first
    pub async fn list_for_user(&self, user: &UserId) -> Vec<Template> {
        self.repo.find_by_user(user).await
    }

    /// Public templates, most recently updated first
    pub async fn list_public(&self) -> Vec<Template> {
        self.repo.find_public().await
    }

    /// Fetch a template the viewer is allowed to see.
    ///
    /// Private templates of other users are reported as not found.
    pub async fn get(&self, viewer: &UserId, id: &TemplateId) -> Result<Template, DomainError> {
        self.repo
            .find_by_id(id)
            .await
            .filter(|template| template.is_visible_to(viewer))
            .ok_or_else(|| DomainError::not_found("Template", id.value()))
    }

    /// Create and persist a new template
    pub async fn create(&self, draft: TemplateDraft) -> Result<Template, DomainError> {
        let template = Template::create(draft)?;
        self.repo.save(&template).await?;

        tracing::info!(
            "Created template: {} ({}) for {}",
            template.name(),
            template.id(),
            template.user_id()
        );

        Ok(template)
    }

    /// Apply a partial update to a template owned by `user`
    pub async fn update(
        &self,
        user: &UserId,
        id: &TemplateId,
        changes: TemplateChanges,
    ) -> Result<Template, DomainError> {
        let mut template = self.load_owned(user, id).await?;

        if let Some(name) = changes.name {
            template.rename(name)?;
        }
        if let Some(description) = changes.description {
            template.update_description(Some(description));
        }
        if let Some(messages) = changes.messages {
            template.replace_messages(messages);
        }
        if let Some(arguments) = changes.arguments {
            template.replace_arguments(arguments);
        }

        self.repo.save(&template).await?;
        Ok(template)
    }

    /// Publish or unpublish a template owned by `user`
    pub async fn set_visibility(
        &self,
        user: &UserId,
        id: &TemplateId,
        is_public: bool,
    ) -> Result<Template, DomainError> {
        let mut template = self.load_owned(user, id).await?;
        template.set_public(is_public);
        self.repo.save(&template).await?;

        tracing::info!(
            "Template {} is now {}",
            template.id(),
            if is_public { "public" } else { "private" }
        );

        Ok(template)
    }

    /// Copy a visible template into `user`'s library
    pub async fn fork(&self, user: &UserId, id: &TemplateId) -> Result<Template, DomainError> {
        let source = self.get(user, id).await?;
        let fork = source.fork_for(user.clone());
        self.repo.save(&fork).await?;

        tracing::info!("Forked template {} into {} for {}", id, fork.id(), user);

        Ok(fork)
    }

    /// Render a visible template with argument values
    pub async fn render(
        &self,
        viewer: &UserId,
        id: &TemplateId,
        values: &HashMap<String, String>,
    ) -> Result<Vec<TemplateMessage>, DomainError> {
        let template = self.get(viewer, id).await?;
        self.renderer.render(&template, values)
    }

    /// Delete a template owned by `user`
    pub async fn delete(&self, user: &UserId, id: &TemplateId) -> Result<(), DomainError> {
        self.load_owned(user, id).await?;
        self.repo.delete(id).await?;

        tracing::info!("Deleted template: {}", id);
        Ok(())
    }

    async fn load_owned(&self, user: &UserId, id: &TemplateId) -> Result<Template, DomainError> {
        let template = self.get(user, id).await?;
        if !template.is_owned_by(user) {
            return Err(DomainError::Forbidden(format!(
                "Template {} belongs to another user",
                id
            )));
        }
        Ok(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryTemplateRepository;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn service() -> TemplateService {
        TemplateService::new(Arc::new(InMemoryTemplateRepository::new()))
    }

    fn draft(owner: &str, name: &str) -> TemplateDraft {
        TemplateDraft::new(user(owner), name)
            .with_messages(vec![TemplateMessage::user("Summarize {{text}}")])
            .with_arguments(vec![TemplateArgument::required("text")])
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let service = service();
        let created = service.create(draft("u-1", "Summarizer")).await.unwrap();

        let mine = service.list_for_user(&user("u-1")).await;
        assert_eq!(mine, vec![created]);
        assert!(service.list_public().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let result = service().create(draft("u-1", " ")).await;
        assert!(matches!(result, Err(DomainError::InvalidTemplate(_))));
    }

    #[tokio::test]
    async fn test_private_template_hidden_from_others() {
        let service = service();
        let created = service.create(draft("u-1", "Secret")).await.unwrap();

        assert!(service.get(&user("u-1"), created.id()).await.is_ok());
        assert!(matches!(
            service.get(&user("u-2"), created.id()).await,
            Err(DomainError::NotFound { .. })
        ));

        service
            .set_visibility(&user("u-1"), created.id(), true)
            .await
            .unwrap();
        assert!(service.get(&user("u-2"), created.id()).await.is_ok());
        assert_eq!(service.list_public().await.len(), 1);
    }

    #[tokio::test]
    async fn test_update_applies_changes() {
        let service = service();
        let created = service.create(draft("u-1", "Draft")).await.unwrap();

        let updated = service
            .update(
                &user("u-1"),
                created.id(),
                TemplateChanges {
                    name: Some("Final".to_string()),
                    description: Some("Summaries".to_string()),
                    messages: Some(vec![
                        TemplateMessage::system("Be concise"),
                        TemplateMessage::user("{{text}}"),
                    ]),
                    arguments: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name(), "Final");
        assert_eq!(updated.description(), Some("Summaries"));
        assert_eq!(updated.messages().len(), 2);
        assert_eq!(updated.arguments().len(), 1);
        assert!(updated.updated_at() >= created.updated_at());

        let stored = service.get(&user("u-1"), created.id()).await.unwrap();
        assert_eq!(stored.name(), "Final");
    }

    #[tokio::test]
    async fn test_only_owner_may_modify_public_template() {
        let service = service();
        let created = service.create(draft("u-1", "Shared").public()).await.unwrap();

        let err = service
            .delete(&user("u-2"), created.id())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        service.delete(&user("u-1"), created.id()).await.unwrap();
        assert!(matches!(
            service.get(&user("u-1"), created.id()).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_fork_public_template() {
        let service = service();
        let original = service.create(draft("u-1", "Shared").public()).await.unwrap();

        let fork = service.fork(&user("u-2"), original.id()).await.unwrap();
        assert!(fork.is_owned_by(&user("u-2")));
        assert!(!fork.is_public());
        assert_eq!(service.list_for_user(&user("u-2")).await.len(), 1);
    }

    #[tokio::test]
    async fn test_render() {
        let service = service();
        let created = service.create(draft("u-1", "Summarizer")).await.unwrap();

        let values = HashMap::from([("text".to_string(), "the report".to_string())]);
        let messages = service
            .render(&user("u-1"), created.id(), &values)
            .await
            .unwrap();
        assert_eq!(messages[0].content, "Summarize the report");

        let err = service
            .render(&user("u-1"), created.id(), &HashMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Render(_)));
    }

    #[tokio::test]
    async fn test_write_failure_propagates() {
        let service = TemplateService::new(Arc::new(
            InMemoryTemplateRepository::new().with_write_failure("Database error"),
        ));
        let err = service.create(draft("u-1", "Doomed")).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to save template: Database error");
    }
}
