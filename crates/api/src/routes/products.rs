//! Product catalog routes, including manual stock adjustments.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use stockbar_core::inventory::StockDirection;
use stockbar_db::entities::{categories, products};
use stockbar_db::repositories::{CreateProductInput, ProductError, ProductRepository};

/// Creates the product routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products", post(create_product))
        .route("/products/{product_id}", get(get_product))
        .route("/products/{product_id}/stock-adjustments", post(adjust_stock))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a product.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    /// Product name.
    pub name: String,
    /// Optional category reference.
    pub category_id: Option<Uuid>,
    /// Opening stock (defaults to 0).
    #[serde(default)]
    pub stock: i32,
    /// Purchase price per unit (defaults to 0).
    #[serde(default)]
    pub purchase_price: Decimal,
    /// Sale price per unit.
    pub sale_price: Decimal,
}

/// Request body for a manual stock adjustment.
#[derive(Debug, Deserialize)]
pub struct StockAdjustmentRequest {
    /// Units to add or remove. Must be positive.
    pub quantity: i32,
    /// Direction of the adjustment.
    pub direction: StockDirection,
}

/// Response for a product.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    /// Product ID.
    pub id: Uuid,
    /// Product name.
    pub name: String,
    /// Category ID.
    pub category_id: Option<Uuid>,
    /// Category name, when the category is loaded.
    pub category_name: Option<String>,
    /// Current stock.
    pub stock: i32,
    /// Purchase price per unit.
    pub purchase_price: String,
    /// Sale price per unit.
    pub sale_price: String,
    /// Active flag.
    pub is_active: bool,
    /// Created at timestamp.
    pub created_at: String,
}

impl ProductResponse {
    fn from_model(product: products::Model, category: Option<categories::Model>) -> Self {
        Self {
            id: product.id,
            name: product.name,
            category_id: product.category_id,
            category_name: category.map(|c| c.name),
            stock: product.stock,
            purchase_price: product.purchase_price.to_string(),
            sale_price: product.sale_price.to_string(),
            is_active: product.is_active,
            created_at: product.created_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /products - List active products with their category.
async fn list_products(State(state): State<AppState>) -> impl IntoResponse {
    let repo = ProductRepository::new((*state.db).clone());

    match repo.list_active().await {
        Ok(items) => {
            let products: Vec<ProductResponse> = items
                .into_iter()
                .map(|(product, category)| ProductResponse::from_model(product, category))
                .collect();
            (StatusCode::OK, Json(json!({ "products": products }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list products");
            internal_error()
        }
    }
}

/// POST /products - Create a product.
async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> impl IntoResponse {
    if payload.name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_name",
                "message": "Product name is required"
            })),
        )
            .into_response();
    }

    let repo = ProductRepository::new((*state.db).clone());

    match repo
        .create(CreateProductInput {
            name: payload.name,
            category_id: payload.category_id,
            stock: payload.stock,
            purchase_price: payload.purchase_price,
            sale_price: payload.sale_price,
        })
        .await
    {
        Ok(product) => (
            StatusCode::CREATED,
            Json(json!({ "product": ProductResponse::from_model(product, None) })),
        )
            .into_response(),
        Err(e) => product_error_response(e),
    }
}

/// GET /products/{product_id} - Get a product by ID.
async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ProductRepository::new((*state.db).clone());

    match repo.find_by_id(product_id).await {
        Ok(Some(product)) => (
            StatusCode::OK,
            Json(json!({ "product": ProductResponse::from_model(product, None) })),
        )
            .into_response(),
        Ok(None) => product_not_found(product_id),
        Err(e) => {
            error!(error = %e, "Failed to get product");
            internal_error()
        }
    }
}

/// POST /products/{product_id}/stock-adjustments - Manually adjust stock.
///
/// Corrections outside the purchase/sale flow (breakage, recounts). A
/// decrease that exceeds the current stock is rejected with the exact
/// shortfall.
async fn adjust_stock(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<StockAdjustmentRequest>,
) -> impl IntoResponse {
    let repo = ProductRepository::new((*state.db).clone());

    match repo
        .adjust_stock(product_id, payload.quantity, payload.direction)
        .await
    {
        Ok(product) => {
            info!(
                user_id = %auth.user_id(),
                %product_id,
                quantity = payload.quantity,
                direction = ?payload.direction,
                stock = product.stock,
                "Stock adjusted"
            );
            (
                StatusCode::OK,
                Json(json!({ "product": ProductResponse::from_model(product, None) })),
            )
                .into_response()
        }
        Err(e) => product_error_response(e),
    }
}

// ============================================================================
// Error Mapping
// ============================================================================

pub(crate) fn product_error_response(err: ProductError) -> axum::response::Response {
    match err {
        ProductError::NotFound(id) => product_not_found(id),
        ProductError::InsufficientStock {
            product_id,
            available,
            requested,
        } => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "insufficient_stock",
                "message": format!(
                    "Insufficient stock for product {product_id}: available {available}, requested {requested}"
                ),
                "product_id": product_id,
                "available": available,
                "requested": requested,
            })),
        )
            .into_response(),
        ProductError::Validation(e) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": e.to_string()
            })),
        )
            .into_response(),
        ProductError::Database(e) => {
            error!(error = %e, "Database error in product operation");
            internal_error()
        }
    }
}

fn product_not_found(id: Uuid) -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "product_not_found",
            "message": format!("Product not found: {id}")
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
