//! `SeaORM` Entity for the products table.
//!
//! The `stock` column is the authoritative quantity for the inventory
//! ledger. It is mutated only through row-locked deltas inside a
//! transaction, never overwritten with an absolute value by a sale or
//! purchase path.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub category_id: Option<Uuid>,
    pub stock: i32,
    pub purchase_price: Decimal,
    pub sale_price: Decimal,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Categories,
    #[sea_orm(has_many = "super::purchase_lines::Entity")]
    PurchaseLines,
    #[sea_orm(has_many = "super::sale_lines::Entity")]
    SaleLines,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl Related<super::purchase_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseLines.def()
    }
}

impl Related<super::sale_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SaleLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
