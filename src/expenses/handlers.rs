use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{CreatedExpenseResponse, ExpenseRequest, SummaryQuery};
use super::repo_types::{ExpenseInput, ExpenseRow};
use super::summary::{summarize, Summary, YearMonth};
use crate::{
    auth::{dto::MessageResponse, AuthUser},
    error::{ApiError, ApiResult},
    state::AppState,
};

pub fn expense_routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(list_expenses).post(create_expense))
        .route("/expenses/summary", get(get_summary))
        .route("/expenses/:id", put(update_expense).delete(delete_expense))
}

#[instrument(skip(state))]
pub async fn list_expenses(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<Vec<ExpenseRow>>> {
    let rows = state.expenses.list_by_user(user_id).await?;
    Ok(Json(rows))
}

#[instrument(skip(state, payload))]
pub async fn create_expense(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<ExpenseRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreatedExpenseResponse>)> {
    let Json(payload) = payload?;
    let input = ExpenseInput::try_from(payload)?;

    let id = state.expenses.create(user_id, &input).await?;

    info!(user_id, expense_id = id, amount = %input.amount, "expense created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedExpenseResponse::new(id, input)),
    ))
}

/// Full replace. Updating an expense the caller does not own affects no rows
/// and still answers 200.
#[instrument(skip(state, id, payload))]
pub async fn update_expense(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ExpenseRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let input = ExpenseInput::try_from(payload)?;

    let affected = state.expenses.update(user_id, id, &input).await?;

    info!(user_id, expense_id = id, affected, "expense update");
    Ok(Json(MessageResponse {
        message: "Expense updated successfully",
    }))
}

/// Same ownership scoping as [`update_expense`].
#[instrument(skip(state, id))]
pub async fn delete_expense(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Path(id) = id?;

    let affected = state.expenses.delete(user_id, id).await?;

    info!(user_id, expense_id = id, affected, "expense delete");
    Ok(Json(MessageResponse {
        message: "Expense deleted successfully",
    }))
}

#[instrument(skip(state, query))]
pub async fn get_summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> ApiResult<Json<Summary>> {
    let Query(query) = query?;
    let month = query
        .month
        .filter(|m| !m.trim().is_empty())
        .map(|m| m.parse::<YearMonth>())
        .transpose()
        .map_err(ApiError::Validation)?;

    let rows = state.expenses.list_by_user(user_id).await?;
    Ok(Json(summarize(&rows, month, state.config.spending_limit)))
}
