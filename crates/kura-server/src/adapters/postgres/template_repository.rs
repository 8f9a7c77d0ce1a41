//! PostgreSQL implementation of TemplateRepository

use async_trait::async_trait;
use sqlx::PgPool;

use kura::{DomainError, Template, TemplateId, TemplateRepository, UserId};

use crate::adapters::row::{decode_row, decode_rows, TemplateRow};

const SELECT_TEMPLATES: &str = r#"
    SELECT id, name, description, user_id, is_public, template_data, created_at, updated_at
    FROM templates
"#;

/// PostgreSQL implementation of TemplateRepository
pub struct PgTemplateRepository {
    pool: PgPool,
}

impl PgTemplateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_list(&self, sql: &str, bind: Option<&str>) -> Vec<Template> {
        let mut query = sqlx::query_as::<_, TemplateRow>(sql);
        if let Some(value) = bind {
            query = query.bind(value);
        }

        match query.fetch_all(&self.pool).await {
            Ok(rows) => decode_rows(rows),
            Err(e) => {
                tracing::warn!(error = %e, "Template list query failed");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl TemplateRepository for PgTemplateRepository {
    async fn find_by_id(&self, id: &TemplateId) -> Option<Template> {
        let sql = format!("{SELECT_TEMPLATES} WHERE id = $1");
        let row = sqlx::query_as::<_, TemplateRow>(&sql)
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await;

        match row {
            Ok(row) => row.and_then(decode_row),
            Err(e) => {
                tracing::warn!(template_id = %id, error = %e, "Template lookup failed");
                None
            }
        }
    }

    async fn find_by_user(&self, user_id: &UserId) -> Vec<Template> {
        let sql = format!("{SELECT_TEMPLATES} WHERE user_id = $1 ORDER BY updated_at DESC");
        self.fetch_list(&sql, Some(user_id.value())).await
    }

    async fn find_public(&self) -> Vec<Template> {
        let sql = format!("{SELECT_TEMPLATES} WHERE is_public = TRUE ORDER BY updated_at DESC");
        self.fetch_list(&sql, None).await
    }

    async fn save(&self, template: &Template) -> Result<(), DomainError> {
        let row = TemplateRow::from(template);

        sqlx::query(
            r#"
            INSERT INTO templates
                (id, name, description, user_id, is_public, template_data, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name,
                description = EXCLUDED.description,
                user_id = EXCLUDED.user_id,
                is_public = EXCLUDED.is_public,
                template_data = EXCLUDED.template_data,
                created_at = EXCLUDED.created_at,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(&row.id)
        .bind(&row.name)
        .bind(&row.description)
        .bind(&row.user_id)
        .bind(row.is_public)
        .bind(&row.template_data)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::persistence("save", e))?;

        tracing::debug!(template_id = %row.id, "Saved template");
        Ok(())
    }

    async fn delete(&self, id: &TemplateId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM templates WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::persistence("delete", e))?;

        tracing::debug!(template_id = %id, rows = result.rows_affected(), "Deleted template");
        Ok(())
    }
}
