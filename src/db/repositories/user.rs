use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::users;

/// User data returned from the repository (without credential material).
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub created_at: String,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            created_at: model.created_at,
        }
    }
}

/// Full credential row. Only handed out to the authentication boundary.
#[derive(Debug, Clone)]
pub struct CredentialRow {
    pub user: User,
    pub password_hash: Vec<u8>,
    pub password_salt: Vec<u8>,
}

/// Insert payload for a new account. The hash/salt pair is computed by the
/// auth service before it reaches the repository.
#[derive(Debug)]
pub struct NewUser {
    pub username: String,
    pub password_hash: Vec<u8>,
    pub password_salt: Vec<u8>,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Insert a new user row. A unique-constraint violation surfaces as a
    /// `sea_orm::DbErr` inside the returned error chain.
    pub async fn create(&self, new_user: NewUser) -> Result<User> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = users::ActiveModel {
            username: Set(new_user.username),
            password_hash: Set(new_user.password_hash),
            password_salt: Set(new_user.password_salt),
            created_at: Set(now),
            ..Default::default()
        };

        let model = active.insert(&self.conn).await?;

        Ok(User::from(model))
    }

    /// Get user by username
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")?;

        Ok(user.map(User::from))
    }

    /// Get user by username with the stored hash/salt pair
    pub async fn get_credentials(&self, username: &str) -> Result<Option<CredentialRow>> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query credentials by username")?;

        Ok(user.map(|u| CredentialRow {
            password_hash: u.password_hash.clone(),
            password_salt: u.password_salt.clone(),
            user: User::from(u),
        }))
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>> {
        let user = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    /// Existence check against the stored (lowercase) username
    pub async fn exists(&self, username: &str) -> Result<bool> {
        let count = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .count(&self.conn)
            .await
            .context("Failed to count users by username")?;

        Ok(count > 0)
    }

    /// All users, ordered by username
    pub async fn list(&self) -> Result<Vec<User>> {
        let rows = users::Entity::find()
            .order_by_asc(users::Column::Username)
            .all(&self.conn)
            .await
            .context("Failed to list users")?;

        Ok(rows.into_iter().map(User::from).collect())
    }
}
