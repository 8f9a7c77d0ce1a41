//! Supabase implementation of TemplateRepository

use async_trait::async_trait;
use reqwest::Method;

use kura::{BoxError, DomainError, Template, TemplateId, TemplateRepository, UserId};

use super::client::{error_cause, SupabaseClient};
use crate::adapters::row::{decode_rows, TemplateRow, TEMPLATES_TABLE};

/// Supabase (PostgREST) implementation of TemplateRepository
pub struct SupabaseTemplateRepository {
    client: SupabaseClient,
}

impl SupabaseTemplateRepository {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    /// `GET /templates` with PostgREST filters
    async fn select(&self, filters: &[(&str, String)]) -> Result<Vec<TemplateRow>, BoxError> {
        let response = self
            .client
            .table(Method::GET, TEMPLATES_TABLE)
            .query(&[("select", "*")])
            .query(filters)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_cause(response).await.into());
        }

        Ok(response.json::<Vec<TemplateRow>>().await?)
    }

    async fn select_list(&self, filters: &[(&str, String)]) -> Vec<Template> {
        match self.select(filters).await {
            Ok(rows) => decode_rows(rows),
            Err(e) => {
                tracing::warn!(error = %e, "Supabase template query failed");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl TemplateRepository for SupabaseTemplateRepository {
    async fn find_by_id(&self, id: &TemplateId) -> Option<Template> {
        match self.select(&[("id", format!("eq.{id}"))]).await {
            Ok(rows) => decode_rows(rows).into_iter().next(),
            Err(e) => {
                tracing::warn!(template_id = %id, error = %e, "Supabase template lookup failed");
                None
            }
        }
    }

    async fn find_by_user(&self, user_id: &UserId) -> Vec<Template> {
        self.select_list(&[
            ("user_id", format!("eq.{user_id}")),
            ("order", "updated_at.desc".to_string()),
        ])
        .await
    }

    async fn find_public(&self) -> Vec<Template> {
        self.select_list(&[
            ("is_public", "eq.true".to_string()),
            ("order", "updated_at.desc".to_string()),
        ])
        .await
    }

    async fn save(&self, template: &Template) -> Result<(), DomainError> {
        let row = TemplateRow::from(template);

        let response = self
            .client
            .table(Method::POST, TEMPLATES_TABLE)
            .query(&[("on_conflict", "id")])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&row)
            .send()
            .await
            .map_err(|e| DomainError::persistence("save", e))?;

        if !response.status().is_success() {
            return Err(DomainError::persistence("save", error_cause(response).await));
        }

        tracing::debug!(template_id = %row.id, "Saved template");
        Ok(())
    }

    async fn delete(&self, id: &TemplateId) -> Result<(), DomainError> {
        let response = self
            .client
            .table(Method::DELETE, TEMPLATES_TABLE)
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await
            .map_err(|e| DomainError::persistence("delete", e))?;

        if !response.status().is_success() {
            return Err(DomainError::persistence("delete", error_cause(response).await));
        }

        tracing::debug!(template_id = %id, "Deleted template");
        Ok(())
    }
}
