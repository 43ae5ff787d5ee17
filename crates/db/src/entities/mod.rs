//! `SeaORM` entity definitions.
//!
//! One module per table. The `sales.status` column is a SMALLINT whose
//! values map to `stockbar_core::sales::SaleStatus` (0 = pending,
//! 1 = completed, 2 = voided); conversion happens at the repository
//! boundary.

pub mod categories;
pub mod clients;
pub mod products;
pub mod purchase_lines;
pub mod purchases;
pub mod roles;
pub mod sale_lines;
pub mod sales;
pub mod suppliers;
pub mod users;
