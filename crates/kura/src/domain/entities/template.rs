//! Template - Prompt template aggregate root
//!
//! All state changes go through named operations so that the invariants
//! below hold for every value of this type:
//!
//! - `name` is non-empty after trimming
//! - `id` and `user_id` are valid identifiers
//! - `updated_at >= created_at`
//!
//! Two `Template` values are equal when they carry the same `TemplateId`,
//! even if they are different snapshots of that template.

use chrono::{DateTime, Utc};

use super::{TemplateArgument, TemplateMessage};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{TemplateId, UserId};

/// Input for creating a brand new template
#[derive(Debug, Clone)]
pub struct TemplateDraft {
    pub user_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub messages: Vec<TemplateMessage>,
    pub arguments: Vec<TemplateArgument>,
}

impl TemplateDraft {
    /// Private draft with no messages or arguments
    pub fn new(user_id: UserId, name: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
            description: None,
            is_public: false,
            messages: Vec::new(),
            arguments: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_messages(mut self, messages: Vec<TemplateMessage>) -> Self {
        self.messages = messages;
        self
    }

    pub fn with_arguments(mut self, arguments: Vec<TemplateArgument>) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn public(mut self) -> Self {
        self.is_public = true;
        self
    }
}

/// Previously stored template state, as read back by a storage adapter
#[derive(Debug, Clone)]
pub struct TemplateRecord {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub messages: Vec<TemplateMessage>,
    pub arguments: Vec<TemplateArgument>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Template - A reusable, shareable prompt
#[derive(Debug, Clone)]
pub struct Template {
    id: TemplateId,
    user_id: UserId,
    name: String,
    description: Option<String>,
    is_public: bool,
    messages: Vec<TemplateMessage>,
    arguments: Vec<TemplateArgument>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidTemplate(
            "Template name must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description.filter(|d| !d.trim().is_empty())
}

fn check_index(index: usize, len: usize, what: &str) -> Result<(), DomainError> {
    if index >= len {
        return Err(DomainError::InvalidTemplate(format!(
            "{what} index {index} out of range (len {len})"
        )));
    }
    Ok(())
}

impl Template {
    /// Create a new template with a fresh id and current timestamps
    pub fn create(draft: TemplateDraft) -> Result<Self, DomainError> {
        validate_name(&draft.name)?;

        let now = Utc::now();
        Ok(Self {
            id: TemplateId::generate(),
            user_id: draft.user_id,
            name: draft.name,
            description: normalize_description(draft.description),
            is_public: draft.is_public,
            messages: draft.messages,
            arguments: draft.arguments,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild a template from storage, keeping ids and timestamps verbatim.
    ///
    /// Only storage adapters should call this; new templates go through
    /// [`Template::create`].
    pub fn from_persistence(record: TemplateRecord) -> Result<Self, DomainError> {
        validate_name(&record.name)?;
        let id = TemplateId::new(&record.id)?;
        let user_id = UserId::new(&record.user_id)?;

        if record.updated_at < record.created_at {
            return Err(DomainError::InvalidTemplate(format!(
                "Template {} was updated before it was created",
                record.id
            )));
        }

        Ok(Self {
            id,
            user_id,
            name: record.name,
            description: record.description,
            is_public: record.is_public,
            messages: record.messages,
            arguments: record.arguments,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }

    /// Private copy of this template owned by `owner`
    pub fn fork_for(&self, owner: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: TemplateId::generate(),
            user_id: owner,
            name: self.name.clone(),
            description: self.description.clone(),
            is_public: false,
            messages: self.messages.clone(),
            arguments: self.arguments.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    // --- Accessors ---

    pub fn id(&self) -> &TemplateId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_public(&self) -> bool {
        self.is_public
    }

    pub fn messages(&self) -> &[TemplateMessage] {
        &self.messages
    }

    pub fn arguments(&self) -> &[TemplateArgument] {
        &self.arguments
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    /// Owners see their own templates; everyone sees public ones
    pub fn is_visible_to(&self, user_id: &UserId) -> bool {
        self.is_public || self.is_owned_by(user_id)
    }

    // --- Mutations ---

    /// Stored timestamps may come from a clock ahead of ours
    fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.created_at);
    }

    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), DomainError> {
        let name = name.into();
        validate_name(&name)?;
        if name != self.name {
            self.name = name;
            self.touch();
        }
        Ok(())
    }

    /// Blank descriptions are stored as absent
    pub fn update_description(&mut self, description: Option<String>) {
        let description = normalize_description(description);
        if description != self.description {
            self.description = description;
            self.touch();
        }
    }

    pub fn set_public(&mut self, is_public: bool) {
        if is_public != self.is_public {
            self.is_public = is_public;
            self.touch();
        }
    }

    pub fn publish(&mut self) {
        self.set_public(true);
    }

    pub fn unpublish(&mut self) {
        self.set_public(false);
    }

    pub fn add_message(&mut self, message: TemplateMessage) {
        self.messages.push(message);
        self.touch();
    }

    pub fn update_message(
        &mut self,
        index: usize,
        message: TemplateMessage,
    ) -> Result<(), DomainError> {
        check_index(index, self.messages.len(), "Message")?;
        self.messages[index] = message;
        self.touch();
        Ok(())
    }

    pub fn remove_message(&mut self, index: usize) -> Result<TemplateMessage, DomainError> {
        check_index(index, self.messages.len(), "Message")?;
        let removed = self.messages.remove(index);
        self.touch();
        Ok(removed)
    }

    /// Move a message to a new position, shifting the ones in between
    pub fn move_message(&mut self, from: usize, to: usize) -> Result<(), DomainError> {
        check_index(from, self.messages.len(), "Message")?;
        check_index(to, self.messages.len(), "Message")?;
        if from != to {
            let message = self.messages.remove(from);
            self.messages.insert(to, message);
            self.touch();
        }
        Ok(())
    }

    pub fn replace_messages(&mut self, messages: Vec<TemplateMessage>) {
        if messages != self.messages {
            self.messages = messages;
            self.touch();
        }
    }

    /// Argument names are not required to be unique
    pub fn add_argument(&mut self, argument: TemplateArgument) {
        self.arguments.push(argument);
        self.touch();
    }

    pub fn update_argument(
        &mut self,
        index: usize,
        argument: TemplateArgument,
    ) -> Result<(), DomainError> {
        check_index(index, self.arguments.len(), "Argument")?;
        self.arguments[index] = argument;
        self.touch();
        Ok(())
    }

    pub fn remove_argument(&mut self, index: usize) -> Result<TemplateArgument, DomainError> {
        check_index(index, self.arguments.len(), "Argument")?;
        let removed = self.arguments.remove(index);
        self.touch();
        Ok(removed)
    }

    pub fn replace_arguments(&mut self, arguments: Vec<TemplateArgument>) {
        if arguments != self.arguments {
            self.arguments = arguments;
            self.touch();
        }
    }
}

impl PartialEq for Template {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Template {}

impl std::hash::Hash for Template {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
