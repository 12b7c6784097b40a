use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod auth;
mod error;
mod photos;
mod types;
mod users;

pub use error::ApiError;
pub use types::*;

use crate::clients::cloudinary::{CloudinaryClient, CloudinaryConfig};
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, CloudinaryPhotoService, PhotoService, SeaOrmAuthService, TokenIssuer,
};

pub struct AppState {
    store: Store,

    pub config: Config,

    pub auth_service: Arc<dyn AuthService>,

    pub photo_service: Arc<dyn PhotoService>,

    pub tokens: TokenIssuer,
}

impl AppState {
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }
}

pub async fn create_app_state(config: Config) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    let cloudinary = CloudinaryClient::new(CloudinaryConfig {
        base_url: config.cloudinary.base_url.clone(),
        cloud_name: config.cloudinary.cloud_name.clone(),
        api_key: config.cloudinary.api_key.clone(),
        api_secret: config.cloudinary.api_secret.clone(),
    })?;

    let auth_service: Arc<dyn AuthService> = Arc::new(SeaOrmAuthService::new(store.clone()));
    let photo_service: Arc<dyn PhotoService> =
        Arc::new(CloudinaryPhotoService::new(store.clone(), cloudinary));

    let tokens = TokenIssuer::new(
        config.auth.token_secret.as_bytes(),
        config.auth.token_ttl_hours,
    );

    Ok(Arc::new(AppState {
        store,
        config,
        auth_service,
        photo_service,
        tokens,
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config.server.cors_allowed_origins.clone();

    let protected_routes = create_protected_router(state.clone());

    let api_router = Router::new()
        .merge(protected_routes)
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(users::list_users))
        .route("/users/{id}", get(users::get_user))
        .route("/users/{id}/photos", post(photos::add_photo))
        .route("/users/{id}/photos/{photo_id}", get(photos::get_photo))
        .layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
