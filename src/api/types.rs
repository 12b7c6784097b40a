use serde::{Deserialize, Serialize};

use crate::db::{Photo, User};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserListDto,
}

/// Compact user representation for list contexts.
#[derive(Debug, Serialize)]
pub struct UserListDto {
    pub id: i32,
    pub username: String,
    pub main_photo_url: Option<String>,
}

impl UserListDto {
    #[must_use]
    pub fn from_user(user: User, main_photo_url: Option<String>) -> Self {
        Self {
            id: user.id,
            username: user.username,
            main_photo_url,
        }
    }
}

/// Full user representation including the photo collection.
#[derive(Debug, Serialize)]
pub struct UserDetailDto {
    pub id: i32,
    pub username: String,
    pub created_at: String,
    pub photos: Vec<PhotoDto>,
}

impl UserDetailDto {
    #[must_use]
    pub fn from_user(user: User, photos: Vec<Photo>) -> Self {
        Self {
            id: user.id,
            username: user.username,
            created_at: user.created_at,
            photos: photos.into_iter().map(PhotoDto::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PhotoDto {
    pub id: i32,
    pub url: String,
    pub public_id: String,
    pub is_main: bool,
    pub added_at: String,
}

impl From<Photo> for PhotoDto {
    fn from(photo: Photo) -> Self {
        Self {
            id: photo.id,
            url: photo.url,
            public_id: photo.public_id,
            is_main: photo.is_main,
            added_at: photo.added_at,
        }
    }
}
