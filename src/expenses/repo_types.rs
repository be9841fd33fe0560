use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};

/// An expense joined with the name of its category.
///
/// `category_name` is `None` when the expense is uncategorized or its
/// category was deleted.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ExpenseRow {
    pub id: i64,
    pub user_id: i64,
    pub category_id: Option<i64>,
    pub amount: Decimal,
    pub description: Option<String>,
    pub date: Date,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub category_name: Option<String>,
}

/// The user-editable fields of an expense. Used for both insert and full
/// replace.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseInput {
    pub amount: Decimal,
    pub description: Option<String>,
    pub date: Date,
    pub category_id: Option<i64>,
}
