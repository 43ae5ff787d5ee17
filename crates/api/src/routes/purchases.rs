//! Purchase routes.
//!
//! Creating a purchase stocks in every line atomically with the header and
//! detail rows.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use stockbar_core::inventory::LineItem;
use stockbar_db::entities::{purchase_lines, purchases, suppliers};
use stockbar_db::repositories::{
    CreatePurchaseInput, PurchaseError, PurchaseRepository, PurchaseWithLines,
};

/// Creates the purchase routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/purchases", get(list_purchases))
        .route("/purchases", post(create_purchase))
        .route("/purchases/{purchase_id}", get(get_purchase))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a purchase.
#[derive(Debug, Deserialize)]
pub struct CreatePurchaseRequest {
    /// Supplier reference.
    pub supplier_id: Uuid,
    /// Purchase date; defaults to now.
    pub purchase_date: Option<DateTime<Utc>>,
    /// Header total.
    pub total: Decimal,
    /// Optional supplier invoice number.
    pub invoice_number: Option<String>,
    /// Purchase lines.
    pub lines: Vec<LineItem>,
}

/// Response for a purchase header.
#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    /// Purchase ID.
    pub id: Uuid,
    /// Supplier ID.
    pub supplier_id: Uuid,
    /// Supplier name, when the supplier is loaded.
    pub supplier_name: Option<String>,
    /// Purchase date.
    pub purchase_date: String,
    /// Header total.
    pub total: String,
    /// Supplier invoice number.
    pub invoice_number: Option<String>,
    /// Created at timestamp.
    pub created_at: String,
}

impl PurchaseResponse {
    fn from_model(purchase: purchases::Model, supplier: Option<suppliers::Model>) -> Self {
        Self {
            id: purchase.id,
            supplier_id: purchase.supplier_id,
            supplier_name: supplier.map(|s| s.name),
            purchase_date: purchase.purchase_date.to_rfc3339(),
            total: purchase.total.to_string(),
            invoice_number: purchase.invoice_number,
            created_at: purchase.created_at.to_rfc3339(),
        }
    }
}

/// Response for a purchase line.
#[derive(Debug, Serialize)]
pub struct PurchaseLineResponse {
    /// Line ID.
    pub id: Uuid,
    /// Product ID.
    pub product_id: Uuid,
    /// Units bought.
    pub quantity: i32,
    /// Price per unit.
    pub unit_price: String,
    /// Line subtotal.
    pub subtotal: String,
}

impl From<purchase_lines::Model> for PurchaseLineResponse {
    fn from(line: purchase_lines::Model) -> Self {
        Self {
            id: line.id,
            product_id: line.product_id,
            quantity: line.quantity,
            unit_price: line.unit_price.to_string(),
            subtotal: line.subtotal.to_string(),
        }
    }
}

fn purchase_with_lines_json(result: PurchaseWithLines) -> serde_json::Value {
    let lines: Vec<PurchaseLineResponse> =
        result.lines.into_iter().map(PurchaseLineResponse::from).collect();
    json!({
        "purchase": PurchaseResponse::from_model(result.purchase, None),
        "lines": lines,
    })
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /purchases - List purchases with their supplier, newest first.
async fn list_purchases(State(state): State<AppState>) -> impl IntoResponse {
    let repo = PurchaseRepository::new((*state.db).clone());

    match repo.list_purchases().await {
        Ok(items) => {
            let purchases: Vec<PurchaseResponse> = items
                .into_iter()
                .map(|(purchase, supplier)| PurchaseResponse::from_model(purchase, supplier))
                .collect();
            (StatusCode::OK, Json(json!({ "purchases": purchases }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list purchases");
            internal_error()
        }
    }
}

/// POST /purchases - Create a purchase and stock in its lines.
async fn create_purchase(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreatePurchaseRequest>,
) -> impl IntoResponse {
    let repo = PurchaseRepository::new((*state.db).clone());

    match repo
        .create_purchase(CreatePurchaseInput {
            supplier_id: payload.supplier_id,
            purchase_date: payload.purchase_date,
            total: payload.total,
            invoice_number: payload.invoice_number,
            lines: payload.lines,
        })
        .await
    {
        Ok(result) => {
            info!(user_id = %auth.user_id(), purchase_id = %result.purchase.id, "Purchase created");
            (StatusCode::CREATED, Json(purchase_with_lines_json(result))).into_response()
        }
        Err(e) => purchase_error_response(e),
    }
}

/// GET /purchases/{purchase_id} - Get a purchase with its lines.
async fn get_purchase(
    State(state): State<AppState>,
    Path(purchase_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = PurchaseRepository::new((*state.db).clone());

    match repo.get_purchase(purchase_id).await {
        Ok(result) => (StatusCode::OK, Json(purchase_with_lines_json(result))).into_response(),
        Err(e) => purchase_error_response(e),
    }
}

// ============================================================================
// Error Mapping
// ============================================================================

fn purchase_error_response(err: PurchaseError) -> axum::response::Response {
    match err {
        PurchaseError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "purchase_not_found",
                "message": format!("Purchase not found: {id}")
            })),
        )
            .into_response(),
        PurchaseError::SupplierNotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "supplier_not_found",
                "message": format!("Supplier not found: {id}")
            })),
        )
            .into_response(),
        PurchaseError::Validation(e) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": e.to_string()
            })),
        )
            .into_response(),
        PurchaseError::Stock(e) => super::products::product_error_response(e),
        PurchaseError::Database(e) => {
            error!(error = %e, "Database error in purchase operation");
            internal_error()
        }
    }
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
