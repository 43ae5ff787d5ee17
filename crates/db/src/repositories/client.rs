//! Client repository for database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::clients;

/// Input for creating a client.
#[derive(Debug, Clone, Default)]
pub struct CreateClientInput {
    /// Client name.
    pub name: String,
    /// Identity document type.
    pub document_type: Option<String>,
    /// Identity document number.
    pub document_number: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
}

/// Client repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    db: DatabaseConnection,
}

impl ClientRepository {
    /// Creates a new client repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists active clients ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_active(&self) -> Result<Vec<clients::Model>, DbErr> {
        clients::Entity::find()
            .filter(clients::Column::IsActive.eq(true))
            .order_by_asc(clients::Column::Name)
            .all(&self.db)
            .await
    }

    /// Finds a client by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<clients::Model>, DbErr> {
        clients::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: CreateClientInput) -> Result<clients::Model, DbErr> {
        let client = clients::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            document_type: Set(input.document_type),
            document_number: Set(input.document_number),
            phone: Set(input.phone),
            address: Set(input.address),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
        };

        client.insert(&self.db).await
    }
}
