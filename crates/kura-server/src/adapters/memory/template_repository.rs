//! In-memory implementation of TemplateRepository
//!
//! Rows go through the same `TemplateRow` translation as the real
//! adapters. Failures can be injected to exercise error paths.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use kura::{
    sort_by_recent_update, DomainError, Template, TemplateId, TemplateRepository, UserId,
};

use crate::adapters::row::{decode_row, decode_rows, TemplateRow};

/// HashMap-backed TemplateRepository
#[derive(Debug, Default)]
pub struct InMemoryTemplateRepository {
    rows: RwLock<HashMap<String, TemplateRow>>,
    write_failure: Option<String>,
    fail_reads: bool,
}

impl InMemoryTemplateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every save/delete fails with `cause`
    pub fn with_write_failure(mut self, cause: impl Into<String>) -> Self {
        self.write_failure = Some(cause.into());
        self
    }

    /// Every query behaves like a failed storage round trip
    pub fn with_read_failure(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Store a raw row as-is, bypassing the aggregate
    pub fn insert_row(&self, row: TemplateRow) {
        self.rows
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(row.id.clone(), row);
    }

    pub fn len(&self) -> usize {
        self.rows.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn query<P>(&self, predicate: P) -> Vec<Template>
    where
        P: Fn(&TemplateRow) -> bool,
    {
        if self.fail_reads {
            tracing::warn!("In-memory template query failed (injected)");
            return Vec::new();
        }

        let rows: Vec<TemplateRow> = self
            .rows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|row| predicate(row))
            .cloned()
            .collect();

        let mut templates = decode_rows(rows);
        sort_by_recent_update(&mut templates);
        templates
    }

    fn check_write(&self, operation: &'static str) -> Result<(), DomainError> {
        match &self.write_failure {
            Some(cause) => Err(DomainError::persistence(operation, cause.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TemplateRepository for InMemoryTemplateRepository {
    async fn find_by_id(&self, id: &TemplateId) -> Option<Template> {
        if self.fail_reads {
            tracing::warn!(template_id = %id, "In-memory template lookup failed (injected)");
            return None;
        }

        let row = self
            .rows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id.value())
            .cloned();

        row.and_then(decode_row)
    }

    async fn find_by_user(&self, user_id: &UserId) -> Vec<Template> {
        self.query(|row| row.user_id == user_id.value())
    }

    async fn find_public(&self) -> Vec<Template> {
        self.query(|row| row.is_public)
    }

    async fn save(&self, template: &Template) -> Result<(), DomainError> {
        self.check_write("save")?;
        self.insert_row(TemplateRow::from(template));
        Ok(())
    }

    async fn delete(&self, id: &TemplateId) -> Result<(), DomainError> {
        self.check_write("delete")?;
        self.rows
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id.value());
        Ok(())
    }
}
