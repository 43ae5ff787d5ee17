//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations
//!
//! Every multi-step stock operation (purchases, sales, status changes,
//! manual adjustments) runs inside a single database transaction with the
//! affected product rows locked `FOR UPDATE`.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    CategoryRepository, ClientRepository, ProductRepository, PurchaseRepository, RoleRepository,
    SaleRepository, SupplierRepository, UserRepository,
};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
