pub mod api;
pub mod config;
pub mod models;
pub mod services;
pub mod utils;

use crate::api::handlers::{auth, health, materials, upload};
use crate::api::middleware::auth::require_admin;
use crate::config::AppConfig;
use crate::services::admin_directory::AdminDirectory;
use crate::services::registry::MaterialRegistry;
use crate::services::storage::LocalStorage;
use crate::services::token_store::TokenStore;
use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};
use chrono::Duration;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::auth::signup,
        api::handlers::auth::login,
        api::handlers::auth::logout,
        api::handlers::health::health_check,
        api::handlers::upload::upload_single,
        api::handlers::upload::upload_multiple,
        api::handlers::materials::list_materials,
        api::handlers::materials::get_material,
        api::handlers::materials::delete_material,
        api::handlers::materials::download_file,
    ),
    components(
        schemas(
            api::handlers::auth::SignupRequest,
            api::handlers::auth::LoginRequest,
            api::handlers::auth::AuthResponse,
            api::handlers::health::HealthResponse,
            models::Material,
            models::MaterialType,
            models::AdminUser,
        )
    ),
    tags(
        (name = "auth", description = "Admin authentication endpoints"),
        (name = "upload", description = "Admin-only file upload endpoints"),
        (name = "materials", description = "Public material listing and download"),
        (name = "system", description = "Health and diagnostics")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub admins: Arc<AdminDirectory>,
    pub tokens: Arc<TokenStore>,
    pub registry: Arc<MaterialRegistry>,
    pub storage: Arc<LocalStorage>,
}

impl AppState {
    /// Builds the process-wide stores and seeds the default admin account.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let storage = Arc::new(LocalStorage::new(&config.upload_dir)?);

        let admins = Arc::new(AdminDirectory::new());
        admins.add(&config.admin_email, &config.admin_password)?;

        let tokens = Arc::new(TokenStore::new(Duration::hours(config.token_ttl_hours)));

        Ok(Self {
            config,
            admins,
            tokens,
            registry: Arc::new(MaterialRegistry::new()),
            storage,
        })
    }
}

pub fn create_app(state: AppState) -> Router {
    // Multipart overhead on top of the worst-case payload
    let body_limit =
        state.config.max_file_size * upload::MAX_FILES_PER_REQUEST + 10 * 1024 * 1024;

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(health::health_check))
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route(
            "/api/upload/single",
            post(upload::upload_single)
                .layer(from_fn_with_state(state.clone(), require_admin)),
        )
        .route(
            "/api/upload/multiple",
            post(upload::upload_multiple)
                .layer(from_fn_with_state(state.clone(), require_admin)),
        )
        .route("/api/materials", get(materials::list_materials))
        .route("/api/materials/:id", get(materials::get_material))
        .route(
            "/api/materials/:id",
            delete(materials::delete_material)
                .layer(from_fn_with_state(state.clone(), require_admin)),
        )
        .route("/api/download/:filename", get(materials::download_file))
        .nest_service("/uploads", ServeDir::new(state.storage.root()))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
