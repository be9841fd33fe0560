use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{CreateCategoryRequest, CreatedCategoryResponse};
use super::repo_types::Category;
use crate::{
    auth::{dto::MessageResponse, AuthUser},
    error::{ApiError, ApiResult},
    state::AppState,
};

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/expenses/categories",
            get(list_categories).post(create_category),
        )
        .route("/expenses/categories/:id", delete(delete_category))
}

#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<Vec<Category>>> {
    let categories = state.categories.list_visible(user_id).await?;
    Ok(Json(categories))
}

#[instrument(skip(state, payload))]
pub async fn create_category(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<CreateCategoryRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreatedCategoryResponse>)> {
    let Json(payload) = payload?;
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("Category name is required".into()));
    }

    let category = state.categories.create(user_id, name).await?;

    info!(user_id, category_id = category.id, "category created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedCategoryResponse {
            id: category.id,
            name: category.name,
        }),
    ))
}

/// Owner-scoped: deleting someone else's (or a shared) category is a no-op.
#[instrument(skip(state, id))]
pub async fn delete_category(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Path(id) = id?;
    let affected = state.categories.delete(user_id, id).await?;
    info!(user_id, category_id = id, affected, "category delete");
    Ok(Json(MessageResponse {
        message: "Category deleted successfully",
    }))
}
