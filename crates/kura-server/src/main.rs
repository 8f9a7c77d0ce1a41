use axum::{routing::get, Json, Router};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod adapters;
mod application;
mod config;
mod identity;
mod models;
mod routes;
mod services;
mod telemetry;
mod wiring;

use application::TemplateService;
use config::{StorageBackend, StorageSettings};
use kura::{Container, DomainError};

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub container: Arc<Container>,
    pub template_service: Arc<TemplateService>,
}

impl AppState {
    /// Resolve the services routes need up front so misconfiguration
    /// surfaces at startup rather than on the first request
    pub fn from_container(container: Arc<Container>) -> Result<Self, DomainError> {
        let template_service = container.resolve(wiring::keys::TEMPLATE_SERVICE)?;
        Ok(Self {
            container,
            template_service,
        })
    }
}

#[derive(Serialize)]
struct HealthCheck {
    status: String,
    message: String,
    version: String,
}

async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        message: "Kura API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[shuttle_runtime::main]
async fn main(
    #[shuttle_shared_db::Postgres] pool: PgPool,
    #[shuttle_runtime::Secrets] secrets: shuttle_runtime::SecretStore,
) -> shuttle_axum::ShuttleAxum {
    telemetry::init_tracing();
    dotenvy::dotenv().ok();

    tracing::info!("Kura API initializing...");

    let settings = StorageSettings::from_secrets(&secrets).map_err(anyhow::Error::from)?;
    tracing::info!(backend = %settings.backend, "Storage backend selected");

    if settings.backend == StorageBackend::Postgres {
        sqlx::migrate!()
            .run(&pool)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to run database migrations: {e}"))?;
        tracing::info!("Database migrations completed");
    }

    let container = Arc::new(wiring::build_container(settings, Some(pool)));
    let state = AppState::from_container(container).map_err(anyhow::Error::from)?;
    tracing::debug!(container = ?state.container, "Services wired");

    // OpenAPI documentation
    let openapi = routes::swagger::ApiDoc::openapi();

    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .route("/health", get(health_check))
        .merge(routes::template::router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    tracing::info!("Swagger UI: /swagger-ui");
    tracing::info!("Kura API ready");

    Ok(router.into())
}
