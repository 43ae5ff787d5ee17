//! Supplier repository for database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::suppliers;

/// Input for creating a supplier.
#[derive(Debug, Clone, Default)]
pub struct CreateSupplierInput {
    /// Supplier legal or trade name.
    pub name: String,
    /// Identity document type.
    pub document_type: Option<String>,
    /// Identity document number.
    pub document_number: Option<String>,
    /// Contact person.
    pub contact_name: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Postal address.
    pub address: Option<String>,
}

/// Supplier repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    db: DatabaseConnection,
}

impl SupplierRepository {
    /// Creates a new supplier repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists active suppliers ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_active(&self) -> Result<Vec<suppliers::Model>, DbErr> {
        suppliers::Entity::find()
            .filter(suppliers::Column::IsActive.eq(true))
            .order_by_asc(suppliers::Column::Name)
            .all(&self.db)
            .await
    }

    /// Finds a supplier by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<suppliers::Model>, DbErr> {
        suppliers::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates a new supplier.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: CreateSupplierInput) -> Result<suppliers::Model, DbErr> {
        let supplier = suppliers::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            document_type: Set(input.document_type),
            document_number: Set(input.document_number),
            contact_name: Set(input.contact_name),
            phone: Set(input.phone),
            email: Set(input.email),
            address: Set(input.address),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
        };

        supplier.insert(&self.db).await
    }
}
