//! Cloudinary-backed implementation of the `PhotoService` trait.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::clients::cloudinary::CloudinaryClient;
use crate::db::{NewPhoto, Photo, Store};
use crate::services::photo_service::{PhotoError, PhotoService};

pub struct CloudinaryPhotoService {
    store: Store,
    cloudinary: CloudinaryClient,
}

impl CloudinaryPhotoService {
    #[must_use]
    pub const fn new(store: Store, cloudinary: CloudinaryClient) -> Self {
        Self { store, cloudinary }
    }
}

#[async_trait]
impl PhotoService for CloudinaryPhotoService {
    async fn add_photo(
        &self,
        user_id: i32,
        requesting_user_id: i32,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<Photo, PhotoError> {
        if requesting_user_id != user_id {
            return Err(PhotoError::Forbidden);
        }

        let user = self
            .store
            .get_user_by_id(user_id)
            .await?
            .ok_or(PhotoError::UserNotFound(user_id))?;

        // An empty payload can never yield a usable reference.
        if bytes.is_empty() {
            return Err(PhotoError::Upload("empty image payload".to_string()));
        }

        let upload = self
            .cloudinary
            .upload(file_name, bytes)
            .await
            .map_err(|e| PhotoError::Upload(e.to_string()))?;

        let photo = self
            .store
            .insert_photo(NewPhoto {
                user_id,
                url: upload.secure_url,
                public_id: upload.public_id,
            })
            .await
            .map_err(|e| {
                warn!("Failed to persist photo for user {}: {e}", user.id);
                PhotoError::Persist
            })?;

        info!(
            user_id = user.id,
            photo_id = photo.id,
            is_main = photo.is_main,
            "Photo added"
        );

        Ok(photo)
    }

    async fn get_photo(&self, id: i32) -> Result<Option<Photo>, PhotoError> {
        Ok(self.store.get_photo(id).await?)
    }
}
