//! Template DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

use kura::{MessageRole, Template, TemplateArgument, TemplateMessage};

/// Speaker of a message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl From<Role> for MessageRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => MessageRole::User,
            Role::Assistant => MessageRole::Assistant,
            Role::System => MessageRole::System,
        }
    }
}

impl From<MessageRole> for Role {
    fn from(role: MessageRole) -> Self {
        match role {
            MessageRole::User => Role::User,
            MessageRole::Assistant => Role::Assistant,
            MessageRole::System => Role::System,
        }
    }
}

/// One conversation turn
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageDto {
    pub role: Role,
    pub content: String,
}

impl From<MessageDto> for TemplateMessage {
    fn from(dto: MessageDto) -> Self {
        TemplateMessage::new(dto.role.into(), dto.content)
    }
}

impl From<&TemplateMessage> for MessageDto {
    fn from(message: &TemplateMessage) -> Self {
        Self {
            role: message.role.into(),
            content: message.content.clone(),
        }
    }
}

/// Declared template argument
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ArgumentDto {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
}

impl From<ArgumentDto> for TemplateArgument {
    fn from(dto: ArgumentDto) -> Self {
        TemplateArgument {
            name: dto.name,
            description: dto.description,
            required: dto.required,
        }
    }
}

impl From<&TemplateArgument> for ArgumentDto {
    fn from(argument: &TemplateArgument) -> Self {
        Self {
            name: argument.name.clone(),
            description: argument.description.clone(),
            required: argument.required,
        }
    }
}

// ============================================
// Request/Response DTOs
// ============================================

/// Create template request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTemplateRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub messages: Vec<MessageDto>,
    #[serde(default)]
    pub arguments: Vec<ArgumentDto>,
}

/// Update template request (omitted fields are left unchanged)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTemplateRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub messages: Option<Vec<MessageDto>>,
    pub arguments: Option<Vec<ArgumentDto>>,
}

/// Render request: argument name to value
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RenderTemplateRequest {
    #[serde(default)]
    pub arguments: HashMap<String, String>,
}

/// Rendered messages, in template order
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RenderTemplateResponse {
    pub template_id: String,
    pub messages: Vec<MessageDto>,
}

/// Template response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TemplateResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub user_id: String,
    pub is_public: bool,
    pub messages: Vec<MessageDto>,
    pub arguments: Vec<ArgumentDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Template> for TemplateResponse {
    fn from(template: &Template) -> Self {
        Self {
            id: template.id().to_string(),
            name: template.name().to_string(),
            description: template.description().map(str::to_string),
            user_id: template.user_id().to_string(),
            is_public: template.is_public(),
            messages: template.messages().iter().map(Into::into).collect(),
            arguments: template.arguments().iter().map(Into::into).collect(),
            created_at: template.created_at(),
            updated_at: template.updated_at(),
        }
    }
}
