use axum::{
    Extension, Json,
    extract::{Multipart, Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use std::sync::Arc;

use super::auth::AuthUser;
use super::{ApiError, AppState};
use crate::api::types::PhotoDto;

/// POST /users/{id}/photos
/// Multipart upload; the token subject must match the target user.
pub async fn add_photo(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
    Extension(auth_user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Invalid multipart payload: {e}")))?
    {
        if field.name() == Some("file") {
            let name = field.file_name().unwrap_or("upload").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::validation(format!("Failed to read file field: {e}")))?;
            file = Some((name, data.to_vec()));
        }
    }

    let (file_name, bytes) = file.ok_or_else(|| ApiError::validation("Missing file field"))?;

    let photo = state
        .photo_service
        .add_photo(user_id, auth_user.id, &file_name, bytes)
        .await?;

    let location = format!("/api/users/{user_id}/photos/{}", photo.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(PhotoDto::from(photo)),
    ))
}

/// GET /users/{id}/photos/{photo_id}
pub async fn get_photo(
    State(state): State<Arc<AppState>>,
    Path((user_id, photo_id)): Path<(i32, i32)>,
) -> Result<Json<PhotoDto>, ApiError> {
    let photo = state
        .photo_service
        .get_photo(photo_id)
        .await?
        .filter(|p| p.user_id == user_id)
        .ok_or_else(|| ApiError::not_found("Photo", photo_id))?;

    Ok(Json(PhotoDto::from(photo)))
}
