use async_trait::async_trait;

use crate::db::PgStore;
use crate::error::StoreError;
use crate::expenses::repo_types::{ExpenseInput, ExpenseRow};

/// Every mutation is scoped by `(id, user_id)`. A mismatch affects zero rows
/// and is not an error.
#[async_trait]
pub trait ExpenseRepo: Send + Sync {
    /// Newest date first, ties broken by id descending.
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<ExpenseRow>, StoreError>;

    /// `category_id` is passed through unchecked; only the foreign key applies.
    async fn create(&self, user_id: i64, input: &ExpenseInput) -> Result<i64, StoreError>;

    async fn update(&self, user_id: i64, id: i64, input: &ExpenseInput)
        -> Result<u64, StoreError>;

    async fn delete(&self, user_id: i64, id: i64) -> Result<u64, StoreError>;
}

#[async_trait]
impl ExpenseRepo for PgStore {
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<ExpenseRow>, StoreError> {
        let rows = sqlx::query_as::<_, ExpenseRow>(
            r#"
            SELECT e.id, e.user_id, e.category_id, e.amount, e.description, e.date,
                   e.created_at, c.name AS category_name
            FROM expenses e
            LEFT JOIN categories c ON e.category_id = c.id
            WHERE e.user_id = $1
            ORDER BY e.date DESC, e.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    async fn create(&self, user_id: i64, input: &ExpenseInput) -> Result<i64, StoreError> {
        let (id,) = sqlx::query_as::<_, (i64,)>(
            r#"
            INSERT INTO expenses (user_id, amount, description, date, category_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(input.amount)
        .bind(&input.description)
        .bind(input.date)
        .bind(input.category_id)
        .fetch_one(self.pool())
        .await?;
        Ok(id)
    }

    async fn update(
        &self,
        user_id: i64,
        id: i64,
        input: &ExpenseInput,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE expenses
            SET amount = $1, description = $2, date = $3, category_id = $4
            WHERE id = $5 AND user_id = $6
            "#,
        )
        .bind(input.amount)
        .bind(&input.description)
        .bind(input.date)
        .bind(input.category_id)
        .bind(id)
        .bind(user_id)
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, user_id: i64, id: i64) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected())
    }
}
