//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use crate::models::{
    ArgumentDto, CreateTemplateRequest, MessageDto, RenderTemplateRequest,
    RenderTemplateResponse, Role, TemplateResponse, UpdateTemplateRequest,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::template::list_my_templates,
        super::template::list_public_templates,
        super::template::create_template,
        super::template::get_template,
        super::template::update_template,
        super::template::delete_template,
        super::template::publish_template,
        super::template::unpublish_template,
        super::template::fork_template,
        super::template::render_template,
    ),
    info(
        title = "Kura API",
        version = "0.1.0",
        description = "Prompt template store: owned, shareable and renderable message templates"
    ),
    tags(
        (name = "Template", description = "Prompt template management")
    ),
    components(schemas(
        Role,
        MessageDto,
        ArgumentDto,
        CreateTemplateRequest,
        UpdateTemplateRequest,
        RenderTemplateRequest,
        RenderTemplateResponse,
        TemplateResponse,
    ))
)]
pub struct ApiDoc;
