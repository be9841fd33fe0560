use serde::Serialize;
use sqlx::FromRow;

/// A category label. `user_id` is `None` for shared categories.
#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub user_id: Option<i64>,
}
