use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::{
    handlers::{auth, transactions},
    AppState,
};

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/users/signup", post(auth::signup))
        .route("/users/login", post(auth::login))
        .route("/users/me", get(auth::me))
        .route(
            "/transactions/income",
            post(transactions::add_income).get(transactions::list_incomes),
        )
        .route("/transactions/expense", post(transactions::add_expense))
        .route("/transactions/expenses", get(transactions::list_expenses))
        .route("/transactions/summary", get(transactions::summary))
        .route("/health", get(health))
        .with_state(state)
}
