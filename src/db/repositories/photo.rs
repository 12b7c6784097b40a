use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::photos;

/// Photo data returned from the repository.
#[derive(Debug, Clone)]
pub struct Photo {
    pub id: i32,
    pub user_id: i32,
    pub url: String,
    pub public_id: String,
    pub is_main: bool,
    pub added_at: String,
}

impl From<photos::Model> for Photo {
    fn from(model: photos::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            url: model.url,
            public_id: model.public_id,
            is_main: model.is_main,
            added_at: model.added_at,
        }
    }
}

/// Insert payload for a freshly uploaded photo. Only constructed after the
/// external upload returned a usable reference.
#[derive(Debug)]
pub struct NewPhoto {
    pub user_id: i32,
    pub url: String,
    pub public_id: String,
}

pub struct PhotoRepository {
    conn: DatabaseConnection,
}

impl PhotoRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Insert a photo row. The row becomes the main photo when its owner has
    /// no main photo yet.
    pub async fn insert(&self, photo: NewPhoto) -> Result<Photo> {
        let has_main = self.has_main(photo.user_id).await?;
        let now = chrono::Utc::now().to_rfc3339();

        let active = photos::ActiveModel {
            user_id: Set(photo.user_id),
            url: Set(photo.url),
            public_id: Set(photo.public_id),
            is_main: Set(!has_main),
            added_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert photo")?;

        Ok(Photo::from(model))
    }

    /// Get photo by ID
    pub async fn get(&self, id: i32) -> Result<Option<Photo>> {
        let photo = photos::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query photo by ID")?;

        Ok(photo.map(Photo::from))
    }

    /// Whether the user already has a photo flagged main
    pub async fn has_main(&self, user_id: i32) -> Result<bool> {
        let count = photos::Entity::find()
            .filter(photos::Column::UserId.eq(user_id))
            .filter(photos::Column::IsMain.eq(true))
            .count(&self.conn)
            .await
            .context("Failed to count main photos")?;

        Ok(count > 0)
    }

    /// The user's main photo, if any
    pub async fn main_for_user(&self, user_id: i32) -> Result<Option<Photo>> {
        let photo = photos::Entity::find()
            .filter(photos::Column::UserId.eq(user_id))
            .filter(photos::Column::IsMain.eq(true))
            .one(&self.conn)
            .await
            .context("Failed to query main photo")?;

        Ok(photo.map(Photo::from))
    }

    /// All photos for a user, oldest first
    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<Photo>> {
        let rows = photos::Entity::find()
            .filter(photos::Column::UserId.eq(user_id))
            .order_by_asc(photos::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list photos for user")?;

        Ok(rows.into_iter().map(Photo::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::db::{NewUser, Store};

    use super::NewPhoto;

    async fn test_store() -> Store {
        Store::with_pool_options("sqlite::memory:", 1, 1)
            .await
            .expect("Failed to create in-memory store")
    }

    async fn seed_user(store: &Store, username: &str) -> i32 {
        store
            .create_user(NewUser {
                username: username.to_string(),
                password_hash: vec![0u8; 64],
                password_salt: vec![0u8; 128],
            })
            .await
            .expect("Failed to seed user")
            .id
    }

    #[tokio::test]
    async fn first_photo_becomes_main_second_does_not() {
        let store = test_store().await;
        let user_id = seed_user(&store, "alice").await;

        let first = store
            .insert_photo(NewPhoto {
                user_id,
                url: "https://img.example/one.jpg".to_string(),
                public_id: "one".to_string(),
            })
            .await
            .unwrap();

        let second = store
            .insert_photo(NewPhoto {
                user_id,
                url: "https://img.example/two.jpg".to_string(),
                public_id: "two".to_string(),
            })
            .await
            .unwrap();

        assert!(first.is_main);
        assert!(!second.is_main);

        let main = store.main_photo_for_user(user_id).await.unwrap().unwrap();
        assert_eq!(main.id, first.id);

        let all = store.photos_for_user(user_id).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all.iter().filter(|p| p.is_main).count(), 1);
    }

    #[tokio::test]
    async fn main_flags_are_tracked_per_user() {
        let store = test_store().await;
        let alice = seed_user(&store, "alice").await;
        let bob = seed_user(&store, "bob").await;

        store
            .insert_photo(NewPhoto {
                user_id: alice,
                url: "https://img.example/a.jpg".to_string(),
                public_id: "a".to_string(),
            })
            .await
            .unwrap();

        // Bob's first photo must go main regardless of Alice's photos.
        let bobs = store
            .insert_photo(NewPhoto {
                user_id: bob,
                url: "https://img.example/b.jpg".to_string(),
                public_id: "b".to_string(),
            })
            .await
            .unwrap();

        assert!(bobs.is_main);
    }
}
