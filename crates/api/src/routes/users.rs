//! User management routes.
//!
//! Password hashes never leave the database layer serialized; responses
//! carry only public profile fields.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::AppState;
use stockbar_core::auth::hash_password;
use stockbar_db::entities::{roles, users};
use stockbar_db::repositories::CreateUserInput;
use stockbar_db::{RoleRepository, UserRepository};

/// Creates the user routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users", post(create_user))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a user.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    /// Login email.
    pub email: String,
    /// Password.
    pub password: String,
    /// Password confirmation; must match `password`.
    pub confirm_password: String,
    /// Display name.
    pub full_name: String,
    /// Optional short username.
    pub username: Option<String>,
    /// Role name; defaults to "cashier".
    pub role: Option<String>,
}

/// Response for a user. Excludes the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Login email.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Short username.
    pub username: Option<String>,
    /// Role name, when the role is loaded.
    pub role: Option<String>,
    /// Active flag.
    pub is_active: bool,
    /// Created at timestamp.
    pub created_at: String,
}

impl UserResponse {
    fn from_model(user: users::Model, role: Option<roles::Model>) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            username: user.username,
            role: role.map(|r| r.name),
            is_active: user.is_active,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /users - List users with their role, newest first.
async fn list_users(State(state): State<AppState>) -> impl IntoResponse {
    let repo = UserRepository::new((*state.db).clone());

    match repo.list_with_roles().await {
        Ok(items) => {
            let users: Vec<UserResponse> = items
                .into_iter()
                .map(|(user, role)| UserResponse::from_model(user, role))
                .collect();
            (StatusCode::OK, Json(json!({ "users": users }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list users");
            internal_error()
        }
    }
}

/// POST /users - Create a user.
async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> impl IntoResponse {
    if payload.email.trim().is_empty()
        || payload.password.is_empty()
        || payload.full_name.trim().is_empty()
    {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "missing_fields",
                "message": "email, password, and full_name are required"
            })),
        )
            .into_response();
    }

    if payload.password != payload.confirm_password {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "password_mismatch",
                "message": "Passwords do not match"
            })),
        )
            .into_response();
    }

    let user_repo = UserRepository::new((*state.db).clone());

    match user_repo.email_exists(&payload.email).await {
        Ok(true) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "email_exists",
                    "message": "A user with this email already exists"
                })),
            )
                .into_response();
        }
        Ok(false) => {}
        Err(e) => {
            error!(error = %e, "Failed to check email");
            return internal_error();
        }
    }

    // Resolve the role by name
    let role_repo = RoleRepository::new((*state.db).clone());
    let role_name = payload.role.as_deref().unwrap_or("cashier");
    let role = match role_repo.find_by_name(role_name).await {
        Ok(Some(r)) => r,
        Ok(None) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "unknown_role",
                    "message": format!("Unknown role: {role_name}")
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Failed to load role");
            return internal_error();
        }
    };

    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return internal_error();
        }
    };

    match user_repo
        .create(CreateUserInput {
            email: payload.email,
            password_hash,
            full_name: payload.full_name,
            username: payload.username,
            role_id: role.id,
        })
        .await
    {
        Ok(user) => (
            StatusCode::CREATED,
            Json(json!({ "user": UserResponse::from_model(user, Some(role)) })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to create user");
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
