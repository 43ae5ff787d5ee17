//! User repository for database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{roles, users};

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Login email. Unique.
    pub email: String,
    /// Argon2id PHC hash of the password.
    pub password_hash: String,
    /// Display name.
    pub full_name: String,
    /// Optional short username.
    pub username: Option<String>,
    /// Role reference.
    pub role_id: Uuid,
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds a user together with their role.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_with_role(
        &self,
        id: Uuid,
    ) -> Result<Option<(users::Model, Option<roles::Model>)>, DbErr> {
        users::Entity::find_by_id(id)
            .find_also_related(roles::Entity)
            .one(&self.db)
            .await
    }

    /// Lists users with their roles, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_with_roles(
        &self,
    ) -> Result<Vec<(users::Model, Option<roles::Model>)>, DbErr> {
        users::Entity::find()
            .order_by_desc(users::Column::CreatedAt)
            .find_also_related(roles::Entity)
            .all(&self.db)
            .await
    }

    /// Checks if an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails (including a duplicate
    /// email).
    pub async fn create(&self, input: CreateUserInput) -> Result<users::Model, DbErr> {
        let now = Utc::now().into();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(input.email),
            password_hash: Set(input.password_hash),
            full_name: Set(input.full_name),
            username: Set(input.username),
            role_id: Set(input.role_id),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        user.insert(&self.db).await
    }
}
