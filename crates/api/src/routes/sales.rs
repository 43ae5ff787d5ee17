//! Sale routes: creation, status transitions, and deletion.
//!
//! Every stock-moving endpoint maps `InsufficientStock` to 409 with the
//! exact shortfall so the client can report which product blocked the
//! operation.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use stockbar_core::inventory::LineItem;
use stockbar_core::sales::SaleStatus;
use stockbar_db::entities::{clients, products, sale_lines, sales};
use stockbar_db::repositories::{CreateSaleInput, SaleError, SaleRepository, SaleWithLines};

/// Creates the sale routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sales", get(list_sales))
        .route("/sales", post(create_sale))
        .route("/sales/{sale_id}", get(get_sale))
        .route("/sales/{sale_id}", delete(delete_sale))
        .route("/sales/{sale_id}/lines", get(list_sale_lines))
        .route("/sales/{sale_id}/status", patch(change_sale_status))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a sale.
#[derive(Debug, Deserialize)]
pub struct CreateSaleRequest {
    /// Client reference.
    pub client_id: Uuid,
    /// Sale date; defaults to now.
    pub sale_date: Option<DateTime<Utc>>,
    /// Header total.
    pub total: Decimal,
    /// Initial status: "pending" (default), "completed", or "voided".
    pub status: Option<String>,
    /// Sale lines.
    pub lines: Vec<LineItem>,
}

/// Request body for a status change.
#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    /// Target status: "pending", "completed", or "voided".
    pub status: String,
}

/// Response for a sale header.
#[derive(Debug, Serialize)]
pub struct SaleResponse {
    /// Sale ID.
    pub id: Uuid,
    /// Client ID.
    pub client_id: Uuid,
    /// Client name, when the client is loaded.
    pub client_name: Option<String>,
    /// Sale date.
    pub sale_date: String,
    /// Header total.
    pub total: String,
    /// Status name.
    pub status: String,
    /// Created at timestamp.
    pub created_at: String,
}

impl SaleResponse {
    fn from_model(sale: sales::Model, client: Option<clients::Model>) -> Self {
        let status = SaleStatus::from_i16(sale.status)
            .map_or_else(|| sale.status.to_string(), |s| s.to_string());
        Self {
            id: sale.id,
            client_id: sale.client_id,
            client_name: client.map(|c| c.name),
            sale_date: sale.sale_date.to_rfc3339(),
            total: sale.total.to_string(),
            status,
            created_at: sale.created_at.to_rfc3339(),
        }
    }
}

/// Response for a sale line.
#[derive(Debug, Serialize)]
pub struct SaleLineResponse {
    /// Line ID.
    pub id: Uuid,
    /// Product ID.
    pub product_id: Uuid,
    /// Product name, when the product is loaded.
    pub product_name: Option<String>,
    /// Units sold.
    pub quantity: i32,
    /// Price per unit.
    pub unit_price: String,
    /// Line subtotal.
    pub subtotal: String,
}

impl SaleLineResponse {
    fn from_model(line: sale_lines::Model, product: Option<products::Model>) -> Self {
        Self {
            id: line.id,
            product_id: line.product_id,
            product_name: product.map(|p| p.name),
            quantity: line.quantity,
            unit_price: line.unit_price.to_string(),
            subtotal: line.subtotal.to_string(),
        }
    }
}

fn sale_with_lines_json(result: SaleWithLines) -> serde_json::Value {
    let lines: Vec<SaleLineResponse> = result
        .lines
        .into_iter()
        .map(|l| SaleLineResponse::from_model(l, None))
        .collect();
    json!({
        "sale": SaleResponse::from_model(result.sale, None),
        "lines": lines,
    })
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /sales - List sales with their client, newest first.
async fn list_sales(State(state): State<AppState>) -> impl IntoResponse {
    let repo = SaleRepository::new((*state.db).clone());

    match repo.list_sales().await {
        Ok(items) => {
            let sales: Vec<SaleResponse> = items
                .into_iter()
                .map(|(sale, client)| SaleResponse::from_model(sale, client))
                .collect();
            (StatusCode::OK, Json(json!({ "sales": sales }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list sales");
            internal_error()
        }
    }
}

/// POST /sales - Create a sale.
///
/// Deducts stock for every line unless the initial status is "voided". A
/// shortfall on any line rejects the whole sale with nothing persisted.
async fn create_sale(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateSaleRequest>,
) -> impl IntoResponse {
    let status = match payload.status.as_deref() {
        None => SaleStatus::Pending,
        Some(raw) => match raw.parse::<SaleStatus>() {
            Ok(s) => s,
            Err(()) => return invalid_status(raw),
        },
    };

    let repo = SaleRepository::new((*state.db).clone());

    match repo
        .create_sale(CreateSaleInput {
            client_id: payload.client_id,
            sale_date: payload.sale_date,
            total: payload.total,
            status,
            lines: payload.lines,
        })
        .await
    {
        Ok(result) => {
            info!(user_id = %auth.user_id(), sale_id = %result.sale.id, "Sale created");
            (StatusCode::CREATED, Json(sale_with_lines_json(result))).into_response()
        }
        Err(e) => sale_error_response(e),
    }
}

/// GET /sales/{sale_id} - Get a sale with its lines.
async fn get_sale(State(state): State<AppState>, Path(sale_id): Path<Uuid>) -> impl IntoResponse {
    let repo = SaleRepository::new((*state.db).clone());

    match repo.get_sale(sale_id).await {
        Ok(result) => (StatusCode::OK, Json(sale_with_lines_json(result))).into_response(),
        Err(e) => sale_error_response(e),
    }
}

/// GET /sales/{sale_id}/lines - List a sale's lines with product names.
async fn list_sale_lines(
    State(state): State<AppState>,
    Path(sale_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = SaleRepository::new((*state.db).clone());

    match repo.list_sale_lines(sale_id).await {
        Ok(items) => {
            let lines: Vec<SaleLineResponse> = items
                .into_iter()
                .map(|(line, product)| SaleLineResponse::from_model(line, product))
                .collect();
            (StatusCode::OK, Json(json!({ "lines": lines }))).into_response()
        }
        Err(e) => sale_error_response(e),
    }
}

/// PATCH /sales/{sale_id}/status - Move a sale to a new status.
///
/// Voiding returns the lines' stock; reactivating a voided sale re-deducts
/// it and fails with 409 if any product is short.
async fn change_sale_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(sale_id): Path<Uuid>,
    Json(payload): Json<ChangeStatusRequest>,
) -> impl IntoResponse {
    let Ok(new_status) = payload.status.parse::<SaleStatus>() else {
        return invalid_status(&payload.status);
    };

    let repo = SaleRepository::new((*state.db).clone());

    match repo.change_sale_status(sale_id, new_status).await {
        Ok(change) => {
            info!(
                user_id = %auth.user_id(),
                %sale_id,
                from = %change.previous_status,
                to = %change.new_status,
                "Sale status changed"
            );
            (
                StatusCode::OK,
                Json(json!({
                    "previous_status": change.previous_status.to_string(),
                    "new_status": change.new_status.to_string(),
                    "sale": SaleResponse::from_model(change.sale, None),
                })),
            )
                .into_response()
        }
        Err(e) => sale_error_response(e),
    }
}

/// DELETE /sales/{sale_id} - Delete a sale.
///
/// Returns the lines' stock exactly once (not again for already-voided
/// sales), then removes lines and header.
async fn delete_sale(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(sale_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = SaleRepository::new((*state.db).clone());

    match repo.delete_sale(sale_id).await {
        Ok(()) => {
            info!(user_id = %auth.user_id(), %sale_id, "Sale deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => sale_error_response(e),
    }
}

// ============================================================================
// Error Mapping
// ============================================================================

fn sale_error_response(err: SaleError) -> axum::response::Response {
    match err {
        SaleError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "sale_not_found",
                "message": format!("Sale not found: {id}")
            })),
        )
            .into_response(),
        SaleError::ClientNotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "client_not_found",
                "message": format!("Client not found: {id}")
            })),
        )
            .into_response(),
        SaleError::Validation(e) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": e.to_string()
            })),
        )
            .into_response(),
        SaleError::Stock(e) => super::products::product_error_response(e),
        SaleError::CorruptedStatus { sale_id, value } => {
            error!(%sale_id, value, "Sale has unrecognized persisted status");
            internal_error()
        }
        SaleError::Database(e) => {
            error!(error = %e, "Database error in sale operation");
            internal_error()
        }
    }
}

fn invalid_status(raw: &str) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "invalid_status",
            "message": format!("Unknown sale status: {raw}")
        })),
    )
        .into_response()
}

fn internal_error() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": "An error occurred"
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing_matches_wire_names() {
        assert_eq!("pending".parse::<SaleStatus>(), Ok(SaleStatus::Pending));
        assert_eq!("completed".parse::<SaleStatus>(), Ok(SaleStatus::Completed));
        assert_eq!("voided".parse::<SaleStatus>(), Ok(SaleStatus::Voided));
        assert!("anulada".parse::<SaleStatus>().is_err());
    }
}
