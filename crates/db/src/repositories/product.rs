//! Product repository: catalog CRUD plus the stock ledger.
//!
//! The stock ledger is the only place that writes `products.stock`. Deltas
//! are applied with the row locked `FOR UPDATE` inside the caller's
//! transaction, so two concurrent operations on the same product cannot
//! both pass the availability check and over-draw stock.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use stockbar_core::inventory::{InventoryError, StockDirection, checked_apply};

use crate::entities::{categories, products};

/// Error types for product and stock ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    /// Product not found.
    #[error("Product not found: {0}")]
    NotFound(Uuid),

    /// Not enough stock to apply a negative delta.
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        /// Product whose stock blocked the operation.
        product_id: Uuid,
        /// Units currently in stock.
        available: i32,
        /// Units the operation asked for.
        requested: i32,
    },

    /// Input rejected before any side effect.
    #[error("Invalid stock operation: {0}")]
    Validation(InventoryError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<InventoryError> for ProductError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::InsufficientStock {
                product_id,
                available,
                requested,
            } => Self::InsufficientStock {
                product_id,
                available,
                requested,
            },
            other => Self::Validation(other),
        }
    }
}

/// Input for creating a product.
#[derive(Debug, Clone)]
pub struct CreateProductInput {
    /// Product name.
    pub name: String,
    /// Optional category reference.
    pub category_id: Option<Uuid>,
    /// Opening stock. Must not be negative.
    pub stock: i32,
    /// Purchase price per unit.
    pub purchase_price: Decimal,
    /// Sale price per unit.
    pub sale_price: Decimal,
}

/// Product repository for catalog operations and stock adjustments.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    db: DatabaseConnection,
}

impl ProductRepository {
    /// Creates a new product repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists active products with their category, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_active(
        &self,
    ) -> Result<Vec<(products::Model, Option<categories::Model>)>, DbErr> {
        products::Entity::find()
            .filter(products::Column::IsActive.eq(true))
            .order_by_asc(products::Column::Name)
            .find_also_related(categories::Entity)
            .all(&self.db)
            .await
    }

    /// Finds a product by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<products::Model>, DbErr> {
        products::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates a new product.
    ///
    /// # Errors
    ///
    /// Returns an error if the opening stock is negative or the insert
    /// fails.
    pub async fn create(&self, input: CreateProductInput) -> Result<products::Model, ProductError> {
        if input.stock < 0 {
            return Err(ProductError::Validation(
                InventoryError::NonPositiveQuantity {
                    product_id: Uuid::nil(),
                    quantity: input.stock,
                },
            ));
        }

        let now = Utc::now().into();
        let product = products::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            category_id: Set(input.category_id),
            stock: Set(input.stock),
            purchase_price: Set(input.purchase_price),
            sale_price: Set(input.sale_price),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(product.insert(&self.db).await?)
    }

    /// Applies a signed stock delta to a product inside the caller's
    /// transaction.
    ///
    /// The product row is read with `FOR UPDATE`, so the availability check
    /// and the write are serialized against concurrent operations on the
    /// same product. This function never commits; the caller owns the
    /// transaction boundary.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::NotFound` if the product does not exist and
    /// `ProductError::InsufficientStock` if a negative delta exceeds the
    /// current stock. Either way the transaction has seen no stock write
    /// from this call.
    pub async fn apply_stock_delta(
        txn: &DatabaseTransaction,
        product_id: Uuid,
        delta: i32,
    ) -> Result<products::Model, ProductError> {
        let product = products::Entity::find_by_id(product_id)
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or(ProductError::NotFound(product_id))?;

        let updated_stock = checked_apply(product_id, product.stock, delta)?;

        let mut active: products::ActiveModel = product.into();
        active.stock = Set(updated_stock);
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(txn).await?)
    }

    /// Manually adjusts a product's stock outside the purchase/sale flow.
    ///
    /// Used for corrections (breakage, recounts). Runs in its own
    /// transaction with the same row-locked check as every other ledger
    /// write.
    ///
    /// # Errors
    ///
    /// Returns a validation error for non-positive quantities, `NotFound`
    /// for a missing product, and `InsufficientStock` when a decrease
    /// exceeds the current stock.
    pub async fn adjust_stock(
        &self,
        product_id: Uuid,
        quantity: i32,
        direction: StockDirection,
    ) -> Result<products::Model, ProductError> {
        if quantity <= 0 {
            return Err(ProductError::Validation(
                InventoryError::NonPositiveQuantity {
                    product_id,
                    quantity,
                },
            ));
        }

        let txn = self.db.begin().await?;
        super::set_lock_timeout(&txn).await?;

        let product = Self::apply_stock_delta(&txn, product_id, direction.signed(quantity)).await?;

        txn.commit().await?;
        Ok(product)
    }
}
