//! Supplier routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::AppState;
use stockbar_db::SupplierRepository;
use stockbar_db::repositories::CreateSupplierInput;

/// Creates the supplier routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/suppliers", get(list_suppliers))
        .route("/suppliers", post(create_supplier))
        .route("/suppliers/{supplier_id}", get(get_supplier))
}

/// Request body for creating a supplier.
#[derive(Debug, Deserialize)]
pub struct CreateSupplierRequest {
    /// Supplier legal or trade name.
    pub name: String,
    /// Identity document type.
    pub document_type: Option<String>,
    /// Identity document number.
    pub document_number: Option<String>,
    /// Contact person.
    pub contact_name: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Postal address.
    pub address: Option<String>,
}

/// GET /suppliers - List active suppliers.
async fn list_suppliers(State(state): State<AppState>) -> impl IntoResponse {
    let repo = SupplierRepository::new((*state.db).clone());

    match repo.list_active().await {
        Ok(suppliers) => (StatusCode::OK, Json(json!({ "suppliers": suppliers }))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list suppliers");
            internal_error()
        }
    }
}

/// POST /suppliers - Create a supplier.
async fn create_supplier(
    State(state): State<AppState>,
    Json(payload): Json<CreateSupplierRequest>,
) -> impl IntoResponse {
    if payload.name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_name",
                "message": "Supplier name is required"
            })),
        )
            .into_response();
    }

    let repo = SupplierRepository::new((*state.db).clone());

    match repo
        .create(CreateSupplierInput {
            name: payload.name,
            document_type: payload.document_type,
            document_number: payload.document_number,
            contact_name: payload.contact_name,
            phone: payload.phone,
            email: payload.email,
            address: payload.address,
        })
        .await
    {
        Ok(supplier) => (StatusCode::CREATED, Json(json!({ "supplier": supplier }))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to create supplier");
            internal_error()
        }
    }
}

/// GET /suppliers/{supplier_id} - Get a supplier by ID.
async fn get_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = SupplierRepository::new((*state.db).clone());

    match repo.find_by_id(supplier_id).await {
        Ok(Some(supplier)) => (StatusCode::OK, Json(json!({ "supplier": supplier }))).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "supplier_not_found",
                "message": format!("Supplier not found: {supplier_id}")
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to get supplier");
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
