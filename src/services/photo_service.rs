//! Domain service for attaching uploaded photos to user profiles.

use thiserror::Error;

use crate::db::Photo;

/// Errors specific to photo operations.
#[derive(Debug, Error)]
pub enum PhotoError {
    /// The caller tried to modify a profile that is not their own.
    #[error("Not allowed to modify this profile")]
    Forbidden,

    #[error("User {0} not found")]
    UserNotFound(i32),

    #[error("Image upload failed: {0}")]
    Upload(String),

    #[error("Could not add the photo")]
    Persist,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for PhotoError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for PhotoError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Domain service trait for photo association.
#[async_trait::async_trait]
pub trait PhotoService: Send + Sync {
    /// Uploads an image to the external host and records the returned
    /// reference on the user's profile. The first photo recorded for a user
    /// becomes the main photo.
    ///
    /// # Errors
    ///
    /// Returns [`PhotoError::Forbidden`] when `requesting_user_id` differs
    /// from `user_id`, [`PhotoError::Upload`] when no usable reference came
    /// back from the image host, and [`PhotoError::Persist`] when the row
    /// could not be stored.
    async fn add_photo(
        &self,
        user_id: i32,
        requesting_user_id: i32,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<Photo, PhotoError>;

    /// Fetches a single photo by id.
    async fn get_photo(&self, id: i32) -> Result<Option<Photo>, PhotoError>;
}
