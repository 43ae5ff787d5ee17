//! Role routes.

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
use stockbar_db::RoleRepository;

/// Creates the role routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/roles", get(list_roles))
        .route("/roles", post(create_role))
        .route("/roles/{role_id}", get(get_role))
}

/// Request body for creating a role.
#[derive(Debug, Deserialize)]
pub struct CreateRoleRequest {
    /// Role name. Unique.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

/// GET /roles - List roles.
async fn list_roles(State(state): State<AppState>) -> impl IntoResponse {
    let repo = RoleRepository::new((*state.db).clone());

    match repo.list().await {
        Ok(roles) => (StatusCode::OK, Json(json!({ "roles": roles }))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list roles");
            internal_error()
        }
    }
}

/// POST /roles - Create a role.
async fn create_role(
    State(state): State<AppState>,
    Json(payload): Json<CreateRoleRequest>,
) -> impl IntoResponse {
    if payload.name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_name",
                "message": "Role name is required"
            })),
        )
            .into_response();
    }

    let repo = RoleRepository::new((*state.db).clone());

    // Unique name: report a conflict instead of a bare database error.
    match repo.find_by_name(&payload.name).await {
        Ok(Some(_)) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "role_exists",
                    "message": format!("Role already exists: {}", payload.name)
                })),
            )
                .into_response();
        }
        Ok(None) => {}
        Err(e) => {
            error!(error = %e, "Failed to check role name");
            return internal_error();
        }
    }

    match repo
        .create(&payload.name, payload.description.as_deref())
        .await
    {
        Ok(role) => (StatusCode::CREATED, Json(json!({ "role": role }))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to create role");
            internal_error()
        }
    }
}

/// GET /roles/{role_id} - Get a role by ID.
async fn get_role(State(state): State<AppState>, Path(role_id): Path<Uuid>) -> impl IntoResponse {
    let repo = RoleRepository::new((*state.db).clone());

    match repo.find_by_id(role_id).await {
        Ok(Some(role)) => (StatusCode::OK, Json(json!({ "role": role }))).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "role_not_found",
                "message": format!("Role not found: {role_id}")
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to get role");
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
