//! Category routes.

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
use stockbar_db::CategoryRepository;

/// Creates the category routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/categories", post(create_category))
        .route("/categories/{category_id}", get(get_category))
}

/// Request body for creating a category.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    /// Category name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

/// GET /categories - List active categories.
async fn list_categories(State(state): State<AppState>) -> impl IntoResponse {
    let repo = CategoryRepository::new((*state.db).clone());

    match repo.list_active().await {
        Ok(categories) => {
            (StatusCode::OK, Json(json!({ "categories": categories }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list categories");
            internal_error()
        }
    }
}

/// POST /categories - Create a category.
async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryRequest>,
) -> impl IntoResponse {
    if payload.name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_name",
                "message": "Category name is required"
            })),
        )
            .into_response();
    }

    let repo = CategoryRepository::new((*state.db).clone());

    match repo
        .create(&payload.name, payload.description.as_deref())
        .await
    {
        Ok(category) => (StatusCode::CREATED, Json(json!({ "category": category }))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to create category");
            internal_error()
        }
    }
}

/// GET /categories/{category_id} - Get a category by ID.
async fn get_category(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = CategoryRepository::new((*state.db).clone());

    match repo.find_by_id(category_id).await {
        Ok(Some(category)) => (StatusCode::OK, Json(json!({ "category": category }))).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "category_not_found",
                "message": format!("Category not found: {category_id}")
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to get category");
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
