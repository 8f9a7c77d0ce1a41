//! Service wiring
//!
//! Registers every server component in a `kura::Container`. Factories
//! run lazily on first resolve, so only the selected storage backend is
//! ever constructed.

use sqlx::PgPool;
use std::sync::Arc;

use kura::{Container, DomainError, TemplateRepository};

use crate::adapters::{
    InMemoryTemplateRepository, PgTemplateRepository, SupabaseClient, SupabaseTemplateRepository,
};
use crate::application::TemplateService;
use crate::config::{StorageBackend, StorageSettings};

/// Container keys
pub mod keys {
    pub const STORAGE_SETTINGS: &str = "storage_settings";
    pub const PG_POOL: &str = "pg_pool";
    pub const SUPABASE_CLIENT: &str = "supabase_client";
    pub const TEMPLATE_REPOSITORY: &str = "template_repository";
    pub const TEMPLATE_SERVICE: &str = "template_service";
}

/// Build the container; `pool` is only needed for the Postgres backend
pub fn build_container(settings: StorageSettings, pool: Option<PgPool>) -> Container {
    let container = Container::new();

    container.register_instance(keys::STORAGE_SETTINGS, Arc::new(settings));

    if let Some(pool) = pool {
        container.register_instance(keys::PG_POOL, pool);
    }

    container.register(keys::SUPABASE_CLIENT, |c| {
        let settings: Arc<StorageSettings> = c.resolve(keys::STORAGE_SETTINGS)?;
        let supabase = settings.supabase.as_ref().ok_or_else(|| {
            DomainError::Configuration("Supabase credentials are not configured".to_string())
        })?;
        SupabaseClient::new(supabase, settings.http_timeout)
    });

    container.register(keys::TEMPLATE_REPOSITORY, template_repository);

    container.register(keys::TEMPLATE_SERVICE, |c| {
        let repo: Arc<dyn TemplateRepository> = c.resolve(keys::TEMPLATE_REPOSITORY)?;
        Ok(Arc::new(TemplateService::new(repo)))
    });

    container
}

fn template_repository(c: &Container) -> Result<Arc<dyn TemplateRepository>, DomainError> {
    let settings: Arc<StorageSettings> = c.resolve(keys::STORAGE_SETTINGS)?;

    let repo: Arc<dyn TemplateRepository> = match settings.backend {
        StorageBackend::Postgres => {
            let pool: PgPool = c.resolve(keys::PG_POOL)?;
            Arc::new(PgTemplateRepository::new(pool))
        }
        StorageBackend::Supabase => {
            let client: SupabaseClient = c.resolve(keys::SUPABASE_CLIENT)?;
            Arc::new(SupabaseTemplateRepository::new(client))
        }
        StorageBackend::Memory => Arc::new(InMemoryTemplateRepository::new()),
    };

    tracing::info!(backend = %settings.backend, "Template repository ready");
    Ok(repo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SupabaseSettings;
    use kura::{TemplateDraft, UserId};

    fn settings(backend: StorageBackend) -> StorageSettings {
        StorageSettings {
            backend,
            ..StorageSettings::default()
        }
    }

    #[tokio::test]
    async fn test_memory_backend_end_to_end() {
        let container = build_container(settings(StorageBackend::Memory), None);
        let service: Arc<TemplateService> = container.resolve(keys::TEMPLATE_SERVICE).unwrap();

        let owner = UserId::new("u-1").unwrap();
        let created = service
            .create(TemplateDraft::new(owner.clone(), "Test Template"))
            .await
            .unwrap();

        let repo: Arc<dyn TemplateRepository> =
            container.resolve(keys::TEMPLATE_REPOSITORY).unwrap();
        assert_eq!(
            repo.find_by_id(created.id()).await.unwrap().name(),
            "Test Template"
        );
    }

    #[test]
    fn test_repository_is_singleton() {
        let container = build_container(settings(StorageBackend::Memory), None);
        let a: Arc<dyn TemplateRepository> = container.resolve(keys::TEMPLATE_REPOSITORY).unwrap();
        let b: Arc<dyn TemplateRepository> = container.resolve(keys::TEMPLATE_REPOSITORY).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_postgres_backend_requires_pool() {
        let container = build_container(settings(StorageBackend::Postgres), None);
        let err = container
            .resolve::<Arc<dyn TemplateRepository>>(keys::TEMPLATE_REPOSITORY)
            .err()
            .unwrap();
        assert!(matches!(
            err,
            DomainError::UnregisteredService { ref key } if key == keys::PG_POOL
        ));
    }

    #[test]
    fn test_supabase_backend_builds_client() {
        let mut settings = settings(StorageBackend::Supabase);
        settings.supabase = Some(SupabaseSettings {
            url: "http://localhost:54321".to_string(),
            anon_key: "anon".to_string(),
        });
        let container = build_container(settings, None);

        assert!(container
            .resolve::<Arc<dyn TemplateRepository>>(keys::TEMPLATE_REPOSITORY)
            .is_ok());
        assert!(container
            .resolve::<SupabaseClient>(keys::SUPABASE_CLIENT)
            .is_ok());
    }
}
