//! Category repository for database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::categories;

/// Category repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists active categories ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_active(&self) -> Result<Vec<categories::Model>, DbErr> {
        categories::Entity::find()
            .filter(categories::Column::IsActive.eq(true))
            .order_by_asc(categories::Column::Name)
            .all(&self.db)
            .await
    }

    /// Finds a category by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<categories::Model>, DbErr> {
        categories::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates a new category.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<categories::Model, DbErr> {
        let category = categories::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            description: Set(description.map(ToString::to_string)),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
        };

        category.insert(&self.db).await
    }
}
