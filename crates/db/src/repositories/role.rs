//! Role repository for database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::roles;

/// Role repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct RoleRepository {
    db: DatabaseConnection,
}

impl RoleRepository {
    /// Creates a new role repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all roles ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<roles::Model>, DbErr> {
        roles::Entity::find()
            .order_by_asc(roles::Column::Name)
            .all(&self.db)
            .await
    }

    /// Finds a role by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<roles::Model>, DbErr> {
        roles::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds a role by its unique name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<roles::Model>, DbErr> {
        roles::Entity::find()
            .filter(roles::Column::Name.eq(name))
            .one(&self.db)
            .await
    }

    /// Creates a new role.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails (including a duplicate
    /// name).
    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<roles::Model, DbErr> {
        let role = roles::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            description: Set(description.map(ToString::to_string)),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
        };

        role.insert(&self.db).await
    }
}
