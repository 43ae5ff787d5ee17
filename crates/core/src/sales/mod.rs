//! Sale statuses and the transitions that move stock.
//!
//! A sale's lines hold stock while the sale is in any non-Voided status.
//! Moving between statuses therefore has exactly three possible stock
//! effects: none, return everything, or deduct everything again. The pure
//! decision lives here; applying the deltas is `stockbar-db`'s job.

pub mod machine;
pub mod status;

#[cfg(test)]
mod machine_props;

pub use machine::{StockEffect, creation_deducts_stock, transition_effect};
pub use status::SaleStatus;
