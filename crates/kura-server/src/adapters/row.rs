//! Persisted row shape shared by all storage adapters
//!
//! One row per template: flat columns plus a `template_data` payload
//! holding the ordered `messages` and `arguments` arrays.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kura::{DomainError, Template, TemplateArgument, TemplateMessage, TemplateRecord};

/// Table that holds template rows
pub const TEMPLATES_TABLE: &str = "templates";

/// Row as stored in the `templates` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TemplateRow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub user_id: String,
    pub is_public: bool,
    #[serde(default)]
    pub template_data: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Structured payload inside `template_data`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TemplateData {
    #[serde(default)]
    messages: Vec<TemplateMessage>,
    #[serde(default)]
    arguments: Vec<TemplateArgument>,
}

impl From<&Template> for TemplateRow {
    fn from(template: &Template) -> Self {
        Self {
            id: template.id().value().to_string(),
            name: template.name().to_string(),
            description: template.description().map(str::to_string),
            user_id: template.user_id().value().to_string(),
            is_public: template.is_public(),
            template_data: serde_json::json!({
                "messages": template.messages(),
                "arguments": template.arguments(),
            }),
            created_at: template.created_at(),
            updated_at: template.updated_at(),
        }
    }
}

impl TryFrom<TemplateRow> for Template {
    type Error = DomainError;

    fn try_from(row: TemplateRow) -> Result<Self, Self::Error> {
        let data = match row.template_data {
            serde_json::Value::Null => TemplateData::default(),
            value => serde_json::from_value::<TemplateData>(value).map_err(|e| {
                DomainError::InvalidTemplate(format!(
                    "Malformed template_data for {}: {e}",
                    row.id
                ))
            })?,
        };

        Template::from_persistence(TemplateRecord {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            description: row.description,
            is_public: row.is_public,
            messages: data.messages,
            arguments: data.arguments,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Decode one row, dropping it with a warning if it is not a valid template
pub fn decode_row(row: TemplateRow) -> Option<Template> {
    let id = row.id.clone();
    match Template::try_from(row) {
        Ok(template) => Some(template),
        Err(e) => {
            tracing::warn!(template_id = %id, error = %e, "Skipping undecodable template row");
            None
        }
    }
}

/// Decode rows in order, skipping the invalid ones
pub fn decode_rows(rows: Vec<TemplateRow>) -> Vec<Template> {
    rows.into_iter().filter_map(decode_row).collect()
}
