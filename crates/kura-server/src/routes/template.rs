//! Template Routes - Prompt template management
//!
//! HTTP handlers that delegate to TemplateService for business logic.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use kura::{DomainError, TemplateDraft, TemplateId};

use crate::application::TemplateChanges;
use crate::identity::ActingUser;
use crate::models::{
    CreateTemplateRequest, RenderTemplateRequest, RenderTemplateResponse, TemplateResponse,
    UpdateTemplateRequest,
};
use crate::AppState;

type ApiError = (StatusCode, String);

/// Map domain errors onto HTTP status codes
fn api_error(e: DomainError) -> ApiError {
    let status = match &e {
        DomainError::InvalidIdentifier(_)
        | DomainError::InvalidTemplate(_)
        | DomainError::Render(_) => StatusCode::BAD_REQUEST,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("Template request failed: {}", e);
    }

    (status, e.to_string())
}

fn parse_id(raw: &str) -> Result<TemplateId, ApiError> {
    TemplateId::new(raw).map_err(api_error)
}

/// List the acting user's templates
#[utoipa::path(
    get,
    path = "/kura/templates",
    params(
        ("x-user-id" = String, Header, description = "Acting user ID")
    ),
    responses(
        (status = 200, description = "Owned templates, newest first", body = Vec<TemplateResponse>),
        (status = 401, description = "Missing user header")
    ),
    tag = "Template"
)]
pub async fn list_my_templates(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
) -> Json<Vec<TemplateResponse>> {
    let templates = state.template_service.list_for_user(&user).await;
    Json(templates.iter().map(TemplateResponse::from).collect())
}

/// List public templates
#[utoipa::path(
    get,
    path = "/kura/templates/public",
    responses(
        (status = 200, description = "Public templates, newest first", body = Vec<TemplateResponse>)
    ),
    tag = "Template"
)]
pub async fn list_public_templates(State(state): State<AppState>) -> Json<Vec<TemplateResponse>> {
    let templates = state.template_service.list_public().await;
    Json(templates.iter().map(TemplateResponse::from).collect())
}

/// Create new template
#[utoipa::path(
    post,
    path = "/kura/templates",
    params(
        ("x-user-id" = String, Header, description = "Acting user ID")
    ),
    request_body = CreateTemplateRequest,
    responses(
        (status = 201, description = "Template created", body = TemplateResponse),
        (status = 400, description = "Invalid template"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Template"
)]
pub async fn create_template(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Json(payload): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<TemplateResponse>), ApiError> {
    let mut draft = TemplateDraft::new(user, payload.name)
        .with_messages(payload.messages.into_iter().map(Into::into).collect())
        .with_arguments(payload.arguments.into_iter().map(Into::into).collect());
    draft.description = payload.description;
    draft.is_public = payload.is_public;

    let template = state
        .template_service
        .create(draft)
        .await
        .map_err(api_error)?;

    Ok((StatusCode::CREATED, Json(TemplateResponse::from(&template))))
}

/// Get template by ID
#[utoipa::path(
    get,
    path = "/kura/templates/{id}",
    params(
        ("id" = String, Path, description = "Template ID"),
        ("x-user-id" = String, Header, description = "Acting user ID")
    ),
    responses(
        (status = 200, description = "Template found", body = TemplateResponse),
        (status = 404, description = "Template not found")
    ),
    tag = "Template"
)]
pub async fn get_template(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Path(id): Path<String>,
) -> Result<Json<TemplateResponse>, ApiError> {
    let id = parse_id(&id)?;
    let template = state
        .template_service
        .get(&user, &id)
        .await
        .map_err(api_error)?;

    Ok(Json(TemplateResponse::from(&template)))
}

/// Update template
#[utoipa::path(
    put,
    path = "/kura/templates/{id}",
    params(
        ("id" = String, Path, description = "Template ID"),
        ("x-user-id" = String, Header, description = "Acting user ID")
    ),
    request_body = UpdateTemplateRequest,
    responses(
        (status = 200, description = "Template updated", body = TemplateResponse),
        (status = 400, description = "Invalid template"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Template not found")
    ),
    tag = "Template"
)]
pub async fn update_template(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateTemplateRequest>,
) -> Result<Json<TemplateResponse>, ApiError> {
    let id = parse_id(&id)?;
    let changes = TemplateChanges {
        name: payload.name,
        description: payload.description,
        messages: payload
            .messages
            .map(|messages| messages.into_iter().map(Into::into).collect()),
        arguments: payload
            .arguments
            .map(|arguments| arguments.into_iter().map(Into::into).collect()),
    };

    let template = state
        .template_service
        .update(&user, &id, changes)
        .await
        .map_err(api_error)?;

    Ok(Json(TemplateResponse::from(&template)))
}

/// Delete template
#[utoipa::path(
    delete,
    path = "/kura/templates/{id}",
    params(
        ("id" = String, Path, description = "Template ID"),
        ("x-user-id" = String, Header, description = "Acting user ID")
    ),
    responses(
        (status = 200, description = "Template deleted"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Template not found")
    ),
    tag = "Template"
)]
pub async fn delete_template(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_id(&id)?;
    state
        .template_service
        .delete(&user, &id)
        .await
        .map_err(api_error)?;

    Ok(Json(serde_json::json!({
        "status": "ok",
        "message": "Template deleted"
    })))
}

/// Make template public
#[utoipa::path(
    post,
    path = "/kura/templates/{id}/publish",
    params(
        ("id" = String, Path, description = "Template ID"),
        ("x-user-id" = String, Header, description = "Acting user ID")
    ),
    responses(
        (status = 200, description = "Template published", body = TemplateResponse),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Template not found")
    ),
    tag = "Template"
)]
pub async fn publish_template(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Path(id): Path<String>,
) -> Result<Json<TemplateResponse>, ApiError> {
    set_visibility(state, user, id, true).await
}

/// Make template private
#[utoipa::path(
    post,
    path = "/kura/templates/{id}/unpublish",
    params(
        ("id" = String, Path, description = "Template ID"),
        ("x-user-id" = String, Header, description = "Acting user ID")
    ),
    responses(
        (status = 200, description = "Template unpublished", body = TemplateResponse),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Template not found")
    ),
    tag = "Template"
)]
pub async fn unpublish_template(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Path(id): Path<String>,
) -> Result<Json<TemplateResponse>, ApiError> {
    set_visibility(state, user, id, false).await
}

async fn set_visibility(
    state: AppState,
    user: kura::UserId,
    id: String,
    is_public: bool,
) -> Result<Json<TemplateResponse>, ApiError> {
    let id = parse_id(&id)?;
    let template = state
        .template_service
        .set_visibility(&user, &id, is_public)
        .await
        .map_err(api_error)?;

    Ok(Json(TemplateResponse::from(&template)))
}

/// Copy template into the acting user's library
#[utoipa::path(
    post,
    path = "/kura/templates/{id}/fork",
    params(
        ("id" = String, Path, description = "Template ID"),
        ("x-user-id" = String, Header, description = "Acting user ID")
    ),
    responses(
        (status = 201, description = "Template copied", body = TemplateResponse),
        (status = 404, description = "Template not found")
    ),
    tag = "Template"
)]
pub async fn fork_template(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<TemplateResponse>), ApiError> {
    let id = parse_id(&id)?;
    let fork = state
        .template_service
        .fork(&user, &id)
        .await
        .map_err(api_error)?;

    Ok((StatusCode::CREATED, Json(TemplateResponse::from(&fork))))
}

/// Render template messages with argument values
#[utoipa::path(
    post,
    path = "/kura/templates/{id}/render",
    params(
        ("id" = String, Path, description = "Template ID"),
        ("x-user-id" = String, Header, description = "Acting user ID")
    ),
    request_body = RenderTemplateRequest,
    responses(
        (status = 200, description = "Rendered messages", body = RenderTemplateResponse),
        (status = 400, description = "Missing required arguments"),
        (status = 404, description = "Template not found")
    ),
    tag = "Template"
)]
pub async fn render_template(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Path(id): Path<String>,
    Json(payload): Json<RenderTemplateRequest>,
) -> Result<Json<RenderTemplateResponse>, ApiError> {
    let id = parse_id(&id)?;
    let messages = state
        .template_service
        .render(&user, &id, &payload.arguments)
        .await
        .map_err(api_error)?;

    Ok(Json(RenderTemplateResponse {
        template_id: id.to_string(),
        messages: messages.iter().map(Into::into).collect(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/kura/templates",
            get(list_my_templates).post(create_template),
        )
        .route("/kura/templates/public", get(list_public_templates))
        .route(
            "/kura/templates/:id",
            get(get_template)
                .put(update_template)
                .delete(delete_template),
        )
        .route("/kura/templates/:id/publish", post(publish_template))
        .route("/kura/templates/:id/unpublish", post(unpublish_template))
        .route("/kura/templates/:id/fork", post(fork_template))
        .route("/kura/templates/:id/render", post(render_template))
}
