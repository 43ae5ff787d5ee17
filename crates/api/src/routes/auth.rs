//! Authentication routes.
//!
//! Login verifies the Argon2id password hash and issues a signed, expiring
//! JWT. The legacy deployment's reversible `id:timestamp` token is gone on
//! purpose.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use serde_json::json;
use tracing::{error, info};

use crate::AppState;
use stockbar_core::auth::verify_password;
use stockbar_db::{RoleRepository, UserRepository};
use stockbar_shared::auth::{LoginRequest, LoginResponse, UserInfo};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// POST /auth/login - Authenticate user and return a token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    // Find user by email
    let user = match user_repo.find_by_email(&payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            info!(email = %payload.email, "Login attempt for non-existent user");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "invalid_credentials",
                    "message": "Invalid email or password"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return internal_error();
        }
    };

    // Check if user is active
    if !user.is_active {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "account_disabled",
                "message": "This account has been disabled"
            })),
        )
            .into_response();
    }

    // Verify password
    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Failed login attempt - invalid password");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "invalid_credentials",
                    "message": "Invalid email or password"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return internal_error();
        }
    }

    // Resolve the role name for the claims
    let role_repo = RoleRepository::new((*state.db).clone());
    let role_name = match role_repo.find_by_id(user.role_id).await {
        Ok(Some(role)) => role.name,
        Ok(None) => {
            error!(user_id = %user.id, role_id = %user.role_id, "User references missing role");
            return internal_error();
        }
        Err(e) => {
            error!(error = %e, "Failed to load role");
            return internal_error();
        }
    };

    // Generate token
    let access_token = match state.jwt_service.generate_access_token(user.id, &role_name) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate access token");
            return internal_error();
        }
    };

    info!(user_id = %user.id, "Login successful");

    let response = LoginResponse {
        user: UserInfo {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: role_name,
        },
        access_token,
        expires_in: state.jwt_service.access_token_expires_in(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

fn internal_error() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": "An error occurred during login"
        })),
    )
        .into_response()
}
