//! Client routes.

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
use stockbar_db::ClientRepository;
use stockbar_db::repositories::CreateClientInput;

/// Creates the client routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/clients", get(list_clients))
        .route("/clients", post(create_client))
        .route("/clients/{client_id}", get(get_client))
}

/// Request body for creating a client.
#[derive(Debug, Deserialize)]
pub struct CreateClientRequest {
    /// Client name.
    pub name: String,
    /// Identity document type.
    pub document_type: Option<String>,
    /// Identity document number.
    pub document_number: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
}

/// GET /clients - List active clients.
async fn list_clients(State(state): State<AppState>) -> impl IntoResponse {
    let repo = ClientRepository::new((*state.db).clone());

    match repo.list_active().await {
        Ok(clients) => (StatusCode::OK, Json(json!({ "clients": clients }))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list clients");
            internal_error()
        }
    }
}

/// POST /clients - Create a client.
async fn create_client(
    State(state): State<AppState>,
    Json(payload): Json<CreateClientRequest>,
) -> impl IntoResponse {
    if payload.name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_name",
                "message": "Client name is required"
            })),
        )
            .into_response();
    }

    let repo = ClientRepository::new((*state.db).clone());

    match repo
        .create(CreateClientInput {
            name: payload.name,
            document_type: payload.document_type,
            document_number: payload.document_number,
            phone: payload.phone,
            address: payload.address,
        })
        .await
    {
        Ok(client) => (StatusCode::CREATED, Json(json!({ "client": client }))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to create client");
            internal_error()
        }
    }
}

/// GET /clients/{client_id} - Get a client by ID.
async fn get_client(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ClientRepository::new((*state.db).clone());

    match repo.find_by_id(client_id).await {
        Ok(Some(client)) => (StatusCode::OK, Json(json!({ "client": client }))).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "client_not_found",
                "message": format!("Client not found: {client_id}")
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to get client");
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
