use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Income {
    pub id: i64,
    pub description: Option<String>,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub owner_id: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Expense {
    pub id: i64,
    pub description: Option<String>,
    pub amount: f64,
    pub category: Option<String>,
    pub date: DateTime<Utc>,
    pub owner_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateIncome {
    pub description: Option<String>,
    pub amount: f64,
}

#[derive(Debug, Deserialize)]
pub struct CreateExpense {
    pub description: Option<String>,
    pub amount: f64,
    pub category: Option<String>,
}

pub fn validate_amount(kind: &str, amount: f64) -> Result<(), String> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(format!("{kind} amount must be positive."))
    }
}

/// `?skip=&limit=`; a `limit` of zero returns every row.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub skip: i64,
    pub limit: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: 100,
        }
    }
}

impl Pagination {
    pub fn validate(&self) -> Result<(), String> {
        if self.skip < 0 || self.limit < 0 {
            return Err("skip and limit must not be negative".to_string());
        }
        Ok(())
    }

    /// Value bound to SQLite's `LIMIT`, where -1 means unbounded.
    pub fn sql_limit(&self) -> i64 {
        if self.limit == 0 {
            -1
        } else {
            self.limit
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub balance: f64,
    pub incomes: Vec<Income>,
    pub expenses: Vec<Expense>,
}
