use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::api::types::{LoginRequest, LoginResponse, RegisterRequest, UserDetailDto, UserListDto};

// ============================================================================
// Middleware
// ============================================================================

/// Identity extracted from a verified bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i32,
    pub username: String,
}

/// Authentication middleware: requires `Authorization: Bearer <token>` with a
/// valid signature and unexpired claims.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = bearer_token(request.headers()) else {
        return Err(ApiError::Unauthorized);
    };

    let claims = state
        .tokens
        .decode(&token)
        .map_err(|_| ApiError::Unauthorized)?;

    let user_id: i32 = claims.sub.parse().map_err(|_| ApiError::Unauthorized)?;

    tracing::Span::current().record("user_id", claims.sub.as_str());

    request.extensions_mut().insert(AuthUser {
        id: user_id,
        username: claims.name,
    });

    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/register
/// Create a new account; returns the detailed user representation.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.username.trim().is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let user = state
        .auth_service
        .register(&payload.username, &payload.password)
        .await?;

    let location = format!("/api/users/{}", user.id);

    // A freshly created account has no photos yet.
    let body = UserDetailDto::from_user(user, Vec::new());

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(body),
    ))
}

/// POST /auth/login
/// Verify credentials; returns a signed identity token and the user.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Some(user) = state
        .auth_service
        .login(&payload.username, &payload.password)
        .await?
    else {
        // Uniform failure: unknown user and wrong password look the same.
        return Err(ApiError::Unauthorized);
    };

    let token = state
        .tokens
        .issue(user.id, &user.username)
        .map_err(|e| ApiError::internal(format!("Failed to issue token: {e}")))?;

    let main_photo_url = state
        .store()
        .main_photo_for_user(user.id)
        .await?
        .map(|p| p.url);

    tracing::info!(user_id = user.id, "User logged in: {}", user.username);

    Ok(Json(LoginResponse {
        token,
        user: UserListDto::from_user(user, main_photo_url),
    }))
}
