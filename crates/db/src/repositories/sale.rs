//! Sale repository: records outgoing inventory and drives the sale state
//! machine.
//!
//! A sale's lines hold stock while the sale is in any non-Voided status.
//! Every operation here (create, status change, delete) runs in one
//! transaction: product rows are locked `FOR UPDATE` and availability is
//! checked for every line before any stock write, so a failing line leaves
//! nothing behind.

use std::collections::BTreeMap;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use stockbar_core::inventory::{InventoryError, LineItem, checked_apply, validate_line_items};
use stockbar_core::sales::{SaleStatus, StockEffect, creation_deducts_stock, transition_effect};

use crate::entities::{clients, products, sale_lines, sales};
use crate::repositories::product::{ProductError, ProductRepository};

/// Error types for sale operations.
#[derive(Debug, thiserror::Error)]
pub enum SaleError {
    /// Sale not found.
    #[error("Sale not found: {0}")]
    NotFound(Uuid),

    /// Client not found.
    #[error("Client not found: {0}")]
    ClientNotFound(Uuid),

    /// The persisted status value is outside the known encoding.
    #[error("Sale {sale_id} has unrecognized status value {value}")]
    CorruptedStatus {
        /// The sale carrying the bad value.
        sale_id: Uuid,
        /// The raw persisted value.
        value: i16,
    },

    /// Input rejected before any transaction side effect.
    #[error("Invalid sale: {0}")]
    Validation(#[from] InventoryError),

    /// Stock ledger failure (missing product or insufficient stock).
    #[error(transparent)]
    Stock(#[from] ProductError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a sale.
#[derive(Debug, Clone)]
pub struct CreateSaleInput {
    /// Client reference.
    pub client_id: Uuid,
    /// Sale date; defaults to now.
    pub sale_date: Option<chrono::DateTime<Utc>>,
    /// Header total as reported by the caller.
    pub total: Decimal,
    /// Initial status. A sale created Voided never deducts stock.
    pub status: SaleStatus,
    /// Sale lines. Immutable after creation.
    pub lines: Vec<LineItem>,
}

/// A sale header with its lines.
#[derive(Debug, Clone)]
pub struct SaleWithLines {
    /// Sale header.
    pub sale: sales::Model,
    /// Sale lines.
    pub lines: Vec<sale_lines::Model>,
}

/// Result of a status change.
#[derive(Debug, Clone)]
pub struct StatusChange {
    /// The sale header after the change.
    pub sale: sales::Model,
    /// Status before the change.
    pub previous_status: SaleStatus,
    /// Status after the change.
    pub new_status: SaleStatus,
}

/// Sale repository.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    db: DatabaseConnection,
}

impl SaleRepository {
    /// Creates a new sale repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a sale, deducting stock for every line unless the initial
    /// status is Voided.
    ///
    /// Availability is checked for all lines (with the product rows locked)
    /// before any stock write. If any line is short, the whole operation
    /// fails with `InsufficientStock` and nothing is persisted.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty line list or non-positive
    /// quantities, `ClientNotFound`/`Stock` for missing references,
    /// `Stock(InsufficientStock)` when availability fails, and `Database`
    /// on storage failure.
    pub async fn create_sale(&self, input: CreateSaleInput) -> Result<SaleWithLines, SaleError> {
        validate_line_items(&input.lines)?;

        let client = clients::Entity::find_by_id(input.client_id)
            .one(&self.db)
            .await?;
        if client.is_none() {
            return Err(SaleError::ClientNotFound(input.client_id));
        }

        let txn = self.db.begin().await?;
        super::set_lock_timeout(&txn).await?;

        let requested = aggregate_quantities(input.lines.iter().map(|l| (l.product_id, l.quantity)));

        if creation_deducts_stock(input.status) {
            deduct_stock(&txn, &requested).await?;
        } else {
            // Voided at creation: no stock held, but the products must exist.
            for &product_id in requested.keys() {
                products::Entity::find_by_id(product_id)
                    .one(&txn)
                    .await?
                    .ok_or(ProductError::NotFound(product_id))?;
            }
        }

        let sale = Self::insert_header(&txn, &input).await?;
        let lines = Self::insert_lines(&txn, sale.id, &input.lines).await?;

        txn.commit().await?;

        debug!(sale_id = %sale.id, status = %input.status, line_count = lines.len(), "sale recorded");

        Ok(SaleWithLines { sale, lines })
    }

    /// Inserts the sale header.
    async fn insert_header(
        txn: &DatabaseTransaction,
        input: &CreateSaleInput,
    ) -> Result<sales::Model, SaleError> {
        let now = Utc::now();
        let sale = sales::ActiveModel {
            id: Set(Uuid::new_v4()),
            client_id: Set(input.client_id),
            sale_date: Set(input.sale_date.unwrap_or(now).into()),
            total: Set(input.total),
            status: Set(input.status.as_i16()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        Ok(sale.insert(txn).await?)
    }

    /// Inserts the sale lines.
    async fn insert_lines(
        txn: &DatabaseTransaction,
        sale_id: Uuid,
        lines: &[LineItem],
    ) -> Result<Vec<sale_lines::Model>, SaleError> {
        let mut inserted = Vec::with_capacity(lines.len());

        for line in lines {
            let row = sale_lines::ActiveModel {
                id: Set(Uuid::new_v4()),
                sale_id: Set(sale_id),
                product_id: Set(line.product_id),
                quantity: Set(line.quantity),
                unit_price: Set(line.unit_price),
                subtotal: Set(line.subtotal),
            };
            inserted.push(row.insert(txn).await?);
        }

        Ok(inserted)
    }

    /// Moves a sale to a new status, applying the compensating stock deltas.
    ///
    /// The header is read with `FOR UPDATE` before the branch is decided,
    /// so concurrent transitions on the same sale serialize and each one
    /// sees the status the previous one committed.
    ///
    /// Voiding returns every line quantity to stock; reactivating a Voided
    /// sale re-deducts them and fails with `InsufficientStock` (aborting
    /// the whole transition) if any product is short. Transitions between
    /// Pending and Completed move no stock, and Voided -> Voided is an
    /// idempotent no-op.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing sale, `Stock(InsufficientStock)`
    /// when reactivation fails availability, and `Database` on storage
    /// failure.
    pub async fn change_sale_status(
        &self,
        sale_id: Uuid,
        new_status: SaleStatus,
    ) -> Result<StatusChange, SaleError> {
        let txn = self.db.begin().await?;
        super::set_lock_timeout(&txn).await?;

        let sale = sales::Entity::find_by_id(sale_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(SaleError::NotFound(sale_id))?;

        let previous_status = SaleStatus::from_i16(sale.status).ok_or(SaleError::CorruptedStatus {
            sale_id,
            value: sale.status,
        })?;

        let effect = transition_effect(previous_status, new_status);
        if effect != StockEffect::None {
            let requested = Self::line_quantities(&txn, sale_id).await?;
            match effect {
                StockEffect::ReturnToStock => return_stock(&txn, &requested).await?,
                StockEffect::DeductFromStock => deduct_stock(&txn, &requested).await?,
                StockEffect::None => {}
            }
        }

        let sale = if previous_status == new_status {
            sale
        } else {
            let mut active: sales::ActiveModel = sale.into();
            active.status = Set(new_status.as_i16());
            active.updated_at = Set(Utc::now().into());
            active.update(&txn).await?
        };

        txn.commit().await?;

        debug!(%sale_id, from = %previous_status, to = %new_status, "sale status changed");

        Ok(StatusChange {
            sale,
            previous_status,
            new_status,
        })
    }

    /// Deletes a sale, returning its stock exactly once.
    ///
    /// Stock is returned only when the sale currently holds it (any
    /// non-Voided status); deleting an already-Voided sale must not return
    /// stock a second time. Lines are removed first, then the header.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing sale and `Database` on storage
    /// failure.
    pub async fn delete_sale(&self, sale_id: Uuid) -> Result<(), SaleError> {
        let txn = self.db.begin().await?;
        super::set_lock_timeout(&txn).await?;

        let sale = sales::Entity::find_by_id(sale_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(SaleError::NotFound(sale_id))?;

        let status = SaleStatus::from_i16(sale.status).ok_or(SaleError::CorruptedStatus {
            sale_id,
            value: sale.status,
        })?;

        if status.holds_stock() {
            let requested = Self::line_quantities(&txn, sale_id).await?;
            return_stock(&txn, &requested).await?;
        }

        sale_lines::Entity::delete_many()
            .filter(sale_lines::Column::SaleId.eq(sale_id))
            .exec(&txn)
            .await?;
        sales::Entity::delete_by_id(sale_id).exec(&txn).await?;

        txn.commit().await?;

        debug!(%sale_id, %status, "sale deleted");

        Ok(())
    }

    /// Loads a sale's line quantities aggregated per product.
    async fn line_quantities(
        txn: &DatabaseTransaction,
        sale_id: Uuid,
    ) -> Result<BTreeMap<Uuid, i32>, SaleError> {
        let lines = sale_lines::Entity::find()
            .filter(sale_lines::Column::SaleId.eq(sale_id))
            .all(txn)
            .await?;

        Ok(aggregate_quantities(
            lines.into_iter().map(|l| (l.product_id, l.quantity)),
        ))
    }

    /// Lists sales with their client, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_sales(
        &self,
    ) -> Result<Vec<(sales::Model, Option<clients::Model>)>, DbErr> {
        sales::Entity::find()
            .order_by_desc(sales::Column::SaleDate)
            .find_also_related(clients::Entity)
            .all(&self.db)
            .await
    }

    /// Gets a sale by ID with all its lines.
    ///
    /// # Errors
    ///
    /// Returns `SaleError::NotFound` if the sale does not exist.
    pub async fn get_sale(&self, sale_id: Uuid) -> Result<SaleWithLines, SaleError> {
        let sale = sales::Entity::find_by_id(sale_id)
            .one(&self.db)
            .await?
            .ok_or(SaleError::NotFound(sale_id))?;

        let lines = sale_lines::Entity::find()
            .filter(sale_lines::Column::SaleId.eq(sale_id))
            .all(&self.db)
            .await?;

        Ok(SaleWithLines { sale, lines })
    }

    /// Lists a sale's lines with their product, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `SaleError::NotFound` if the sale does not exist.
    pub async fn list_sale_lines(
        &self,
        sale_id: Uuid,
    ) -> Result<Vec<(sale_lines::Model, Option<products::Model>)>, SaleError> {
        let sale = sales::Entity::find_by_id(sale_id).one(&self.db).await?;
        if sale.is_none() {
            return Err(SaleError::NotFound(sale_id));
        }

        Ok(sale_lines::Entity::find()
            .filter(sale_lines::Column::SaleId.eq(sale_id))
            .find_also_related(products::Entity)
            .all(&self.db)
            .await?)
    }
}

/// Sums line quantities per product. The `BTreeMap` keeps products in
/// ascending id order, which is also the lock order; concurrent multi-line
/// sales therefore acquire row locks in a consistent order.
fn aggregate_quantities(items: impl Iterator<Item = (Uuid, i32)>) -> BTreeMap<Uuid, i32> {
    let mut totals = BTreeMap::new();
    for (product_id, quantity) in items {
        *totals.entry(product_id).or_insert(0) += quantity;
    }
    totals
}

/// Deducts the requested quantities, checking availability for every
/// product before writing any stock.
///
/// Pass one locks each product row (`FOR UPDATE`, ascending id order) and
/// verifies the aggregated quantity fits; pass two applies the staged
/// values. A shortfall in pass one means no stock write has happened when
/// the transaction rolls back.
async fn deduct_stock(
    txn: &DatabaseTransaction,
    requested: &BTreeMap<Uuid, i32>,
) -> Result<(), SaleError> {
    let mut staged = Vec::with_capacity(requested.len());

    for (&product_id, &quantity) in requested {
        let product = products::Entity::find_by_id(product_id)
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or(ProductError::NotFound(product_id))?;

        let updated_stock =
            checked_apply(product_id, product.stock, -quantity).map_err(ProductError::from)?;
        staged.push((product, updated_stock));
    }

    for (product, updated_stock) in staged {
        let mut active: products::ActiveModel = product.into();
        active.stock = Set(updated_stock);
        active.updated_at = Set(Utc::now().into());
        active.update(txn).await?;
    }

    Ok(())
}

/// Returns the requested quantities to stock. Positive deltas cannot fail
/// availability, so a single locked pass per product suffices.
async fn return_stock(
    txn: &DatabaseTransaction,
    requested: &BTreeMap<Uuid, i32>,
) -> Result<(), SaleError> {
    for (&product_id, &quantity) in requested {
        ProductRepository::apply_stock_delta(txn, product_id, quantity).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_merges_duplicate_products() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let totals = aggregate_quantities(vec![(a, 2), (b, 5), (a, 4)].into_iter());

        assert_eq!(totals.len(), 2);
        assert_eq!(totals[&a], 6);
        assert_eq!(totals[&b], 5);
    }

    #[test]
    fn test_aggregate_orders_by_product_id() {
        let mut ids = vec![Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        let totals = aggregate_quantities(ids.iter().map(|&id| (id, 1)));

        ids.sort();
        let keys: Vec<Uuid> = totals.keys().copied().collect();
        assert_eq!(keys, ids);
    }
}
