//! Purchase repository: records incoming inventory.
//!
//! Creating a purchase inserts the header and lines and applies a positive
//! stock delta per line, all inside one transaction. Any failure rolls back
//! the whole purchase.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use stockbar_core::inventory::{InventoryError, LineItem, validate_line_items};

use crate::entities::{purchase_lines, purchases, suppliers};
use crate::repositories::product::{ProductError, ProductRepository};

/// Error types for purchase operations.
#[derive(Debug, thiserror::Error)]
pub enum PurchaseError {
    /// Purchase not found.
    #[error("Purchase not found: {0}")]
    NotFound(Uuid),

    /// Supplier not found.
    #[error("Supplier not found: {0}")]
    SupplierNotFound(Uuid),

    /// Input rejected before any transaction side effect.
    #[error("Invalid purchase: {0}")]
    Validation(#[from] InventoryError),

    /// Stock ledger failure (missing product).
    #[error(transparent)]
    Stock(#[from] ProductError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a purchase.
#[derive(Debug, Clone)]
pub struct CreatePurchaseInput {
    /// Supplier reference.
    pub supplier_id: Uuid,
    /// Purchase date; defaults to now.
    pub purchase_date: Option<chrono::DateTime<Utc>>,
    /// Header total as reported by the caller.
    pub total: Decimal,
    /// Optional supplier invoice number.
    pub invoice_number: Option<String>,
    /// Purchase lines.
    pub lines: Vec<LineItem>,
}

/// A purchase header with its lines.
#[derive(Debug, Clone)]
pub struct PurchaseWithLines {
    /// Purchase header.
    pub purchase: purchases::Model,
    /// Purchase lines.
    pub lines: Vec<purchase_lines::Model>,
}

/// Purchase repository.
#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    db: DatabaseConnection,
}

impl PurchaseRepository {
    /// Creates a new purchase repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a purchase and stocks in every line.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty line list or non-positive
    /// quantities, `SupplierNotFound`/`Stock` for missing references, and
    /// `Database` on storage failure. Every failure leaves no trace: the
    /// header, lines, and stock deltas commit together or not at all.
    pub async fn create_purchase(
        &self,
        input: CreatePurchaseInput,
    ) -> Result<PurchaseWithLines, PurchaseError> {
        validate_line_items(&input.lines)?;

        let supplier = suppliers::Entity::find_by_id(input.supplier_id)
            .one(&self.db)
            .await?;
        if supplier.is_none() {
            return Err(PurchaseError::SupplierNotFound(input.supplier_id));
        }

        let txn = self.db.begin().await?;
        super::set_lock_timeout(&txn).await?;

        let purchase = Self::insert_header(&txn, &input).await?;
        let lines = Self::insert_lines(&txn, purchase.id, &input.lines).await?;

        txn.commit().await?;

        debug!(purchase_id = %purchase.id, line_count = lines.len(), "purchase recorded");

        Ok(PurchaseWithLines { purchase, lines })
    }

    /// Inserts the purchase header.
    async fn insert_header(
        txn: &DatabaseTransaction,
        input: &CreatePurchaseInput,
    ) -> Result<purchases::Model, PurchaseError> {
        let now = Utc::now();
        let purchase = purchases::ActiveModel {
            id: Set(Uuid::new_v4()),
            supplier_id: Set(input.supplier_id),
            purchase_date: Set(input.purchase_date.unwrap_or(now).into()),
            total: Set(input.total),
            invoice_number: Set(input.invoice_number.clone()),
            created_at: Set(now.into()),
        };

        Ok(purchase.insert(txn).await?)
    }

    /// Inserts the lines and applies a positive stock delta per line.
    async fn insert_lines(
        txn: &DatabaseTransaction,
        purchase_id: Uuid,
        lines: &[LineItem],
    ) -> Result<Vec<purchase_lines::Model>, PurchaseError> {
        let mut inserted = Vec::with_capacity(lines.len());

        for line in lines {
            let row = purchase_lines::ActiveModel {
                id: Set(Uuid::new_v4()),
                purchase_id: Set(purchase_id),
                product_id: Set(line.product_id),
                quantity: Set(line.quantity),
                unit_price: Set(line.unit_price),
                subtotal: Set(line.subtotal),
            };
            inserted.push(row.insert(txn).await?);

            // Purchases always stock in; a positive delta cannot be short.
            ProductRepository::apply_stock_delta(txn, line.product_id, line.quantity).await?;
        }

        Ok(inserted)
    }

    /// Lists purchases with their supplier, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_purchases(
        &self,
    ) -> Result<Vec<(purchases::Model, Option<suppliers::Model>)>, DbErr> {
        purchases::Entity::find()
            .order_by_desc(purchases::Column::PurchaseDate)
            .find_also_related(suppliers::Entity)
            .all(&self.db)
            .await
    }

    /// Gets a purchase by ID with all its lines.
    ///
    /// # Errors
    ///
    /// Returns `PurchaseError::NotFound` if the purchase does not exist.
    pub async fn get_purchase(&self, purchase_id: Uuid) -> Result<PurchaseWithLines, PurchaseError> {
        let purchase = purchases::Entity::find_by_id(purchase_id)
            .one(&self.db)
            .await?
            .ok_or(PurchaseError::NotFound(purchase_id))?;

        let lines = purchase_lines::Entity::find()
            .filter(purchase_lines::Column::PurchaseId.eq(purchase_id))
            .all(&self.db)
            .await?;

        Ok(PurchaseWithLines { purchase, lines })
    }
}
