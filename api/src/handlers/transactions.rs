use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    db::transactions,
    error::AppError,
    extractors::CurrentUser,
    models::transaction::{
        validate_amount, CreateExpense, CreateIncome, Expense, Income, Pagination, Summary,
    },
    AppState,
};

pub async fn add_income(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Json(payload), _): WithRejection<Json<CreateIncome>, AppError>,
) -> Result<(StatusCode, Json<Income>), AppError> {
    validate_amount("Income", payload.amount).map_err(AppError::Validation)?;

    let income = transactions::create_income(&state.db, user.id, &payload).await?;
    tracing::debug!(user_id = user.id, income_id = income.id, "income recorded");

    Ok((StatusCode::CREATED, Json(income)))
}

pub async fn add_expense(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Json(payload), _): WithRejection<Json<CreateExpense>, AppError>,
) -> Result<(StatusCode, Json<Expense>), AppError> {
    validate_amount("Expense", payload.amount).map_err(AppError::Validation)?;

    let expense = transactions::create_expense(&state.db, user.id, &payload).await?;
    tracing::debug!(user_id = user.id, expense_id = expense.id, "expense recorded");

    Ok((StatusCode::CREATED, Json(expense)))
}

pub async fn list_incomes(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Query(page), _): WithRejection<Query<Pagination>, AppError>,
) -> Result<Json<Vec<Income>>, AppError> {
    page.validate().map_err(AppError::Validation)?;
    Ok(Json(
        transactions::list_incomes(&state.db, user.id, page).await?,
    ))
}

pub async fn list_expenses(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Query(page), _): WithRejection<Query<Pagination>, AppError>,
) -> Result<Json<Vec<Expense>>, AppError> {
    page.validate().map_err(AppError::Validation)?;
    Ok(Json(
        transactions::list_expenses(&state.db, user.id, page).await?,
    ))
}

/// Totals cover every transaction; the lists are paginated.
pub async fn summary(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Query(page), _): WithRejection<Query<Pagination>, AppError>,
) -> Result<Json<Summary>, AppError> {
    page.validate().map_err(AppError::Validation)?;

    let incomes = transactions::list_incomes(&state.db, user.id, page).await?;
    let expenses = transactions::list_expenses(&state.db, user.id, page).await?;
    let (total_income, total_expenses) = transactions::totals(&state.db, user.id).await?;

    Ok(Json(Summary {
        total_income,
        total_expenses,
        balance: total_income - total_expenses,
        incomes,
        expenses,
    }))
}
