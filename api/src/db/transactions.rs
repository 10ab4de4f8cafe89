//! Income and expense queries. Every query is scoped to one owner.

use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::transaction::{CreateExpense, CreateIncome, Expense, Income, Pagination};

pub async fn create_income(
    pool: &SqlitePool,
    owner_id: i64,
    income: &CreateIncome,
) -> Result<Income, sqlx::Error> {
    sqlx::query_as::<_, Income>(
        "INSERT INTO incomes (description, amount, date, owner_id) VALUES (?, ?, ?, ?) \
         RETURNING id, description, amount, date, owner_id",
    )
    .bind(&income.description)
    .bind(income.amount)
    .bind(Utc::now())
    .bind(owner_id)
    .fetch_one(pool)
    .await
}

pub async fn create_expense(
    pool: &SqlitePool,
    owner_id: i64,
    expense: &CreateExpense,
) -> Result<Expense, sqlx::Error> {
    sqlx::query_as::<_, Expense>(
        "INSERT INTO expenses (description, amount, category, date, owner_id) \
         VALUES (?, ?, ?, ?, ?) \
         RETURNING id, description, amount, category, date, owner_id",
    )
    .bind(&expense.description)
    .bind(expense.amount)
    .bind(&expense.category)
    .bind(Utc::now())
    .bind(owner_id)
    .fetch_one(pool)
    .await
}

/// Newest first.
pub async fn list_incomes(
    pool: &SqlitePool,
    owner_id: i64,
    page: Pagination,
) -> Result<Vec<Income>, sqlx::Error> {
    sqlx::query_as::<_, Income>(
        "SELECT id, description, amount, date, owner_id FROM incomes \
         WHERE owner_id = ? ORDER BY date DESC, id DESC LIMIT ? OFFSET ?",
    )
    .bind(owner_id)
    .bind(page.sql_limit())
    .bind(page.skip)
    .fetch_all(pool)
    .await
}

/// Newest first.
pub async fn list_expenses(
    pool: &SqlitePool,
    owner_id: i64,
    page: Pagination,
) -> Result<Vec<Expense>, sqlx::Error> {
    sqlx::query_as::<_, Expense>(
        "SELECT id, description, amount, category, date, owner_id FROM expenses \
         WHERE owner_id = ? ORDER BY date DESC, id DESC LIMIT ? OFFSET ?",
    )
    .bind(owner_id)
    .bind(page.sql_limit())
    .bind(page.skip)
    .fetch_all(pool)
    .await
}

/// `(total_income, total_expenses)` over every row the owner has, in one query.
pub async fn totals(pool: &SqlitePool, owner_id: i64) -> Result<(f64, f64), sqlx::Error> {
    sqlx::query_as::<_, (f64, f64)>(
        "SELECT \
           CAST(COALESCE((SELECT SUM(amount) FROM incomes WHERE owner_id = ?), 0) AS REAL), \
           CAST(COALESCE((SELECT SUM(amount) FROM expenses WHERE owner_id = ?), 0) AS REAL)",
    )
    .bind(owner_id)
    .bind(owner_id)
    .fetch_one(pool)
    .await
}
