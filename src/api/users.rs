use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::api::types::{UserDetailDto, UserListDto};

/// GET /users
/// List all users with their main photo.
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserListDto>>, ApiError> {
    let users = state.store().list_users().await?;

    let mut dtos = Vec::with_capacity(users.len());
    for user in users {
        let main_photo_url = state
            .store()
            .main_photo_for_user(user.id)
            .await?
            .map(|p| p.url);
        dtos.push(UserListDto::from_user(user, main_photo_url));
    }

    Ok(Json(dtos))
}

/// GET /users/{id}
/// Detailed user representation including the photo collection.
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<UserDetailDto>, ApiError> {
    let user = state
        .store()
        .get_user_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User", id))?;

    let photos = state.store().photos_for_user(id).await?;

    Ok(Json(UserDetailDto::from_user(user, photos)))
}
