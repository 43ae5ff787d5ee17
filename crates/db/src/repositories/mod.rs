//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations, hiding
//! the `SeaORM` implementation details from the rest of the application.
//! The stock-mutating repositories (products, purchases, sales) wrap every
//! multi-step operation in a single database transaction and lock product
//! rows `FOR UPDATE` before reading stock.

pub mod category;
pub mod client;
pub mod product;
pub mod purchase;
pub mod role;
pub mod sale;
pub mod supplier;
pub mod user;

pub use category::CategoryRepository;
pub use client::{ClientRepository, CreateClientInput};
pub use product::{CreateProductInput, ProductError, ProductRepository};
pub use purchase::{CreatePurchaseInput, PurchaseError, PurchaseRepository, PurchaseWithLines};
pub use role::RoleRepository;
pub use sale::{CreateSaleInput, SaleError, SaleRepository, SaleWithLines, StatusChange};
pub use supplier::{CreateSupplierInput, SupplierRepository};
pub use user::{CreateUserInput, UserRepository};

use sea_orm::{ConnectionTrait, DatabaseTransaction, DbErr};

/// Upper bound on how long a stock-mutating transaction may wait for a
/// product row lock. Keeps a hot product from starving concurrent sales.
const LOCK_TIMEOUT_SQL: &str = "SET LOCAL lock_timeout = '5s'";

/// Applies the row-lock wait bound to the current transaction.
pub(crate) async fn set_lock_timeout(txn: &DatabaseTransaction) -> Result<(), DbErr> {
    txn.execute_unprepared(LOCK_TIMEOUT_SQL).await?;
    Ok(())
}
