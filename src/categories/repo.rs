use async_trait::async_trait;

use crate::categories::repo_types::Category;
use crate::db::PgStore;
use crate::error::StoreError;

#[async_trait]
pub trait CategoryRepo: Send + Sync {
    /// Categories owned by `user_id` plus every shared category.
    async fn list_visible(&self, user_id: i64) -> Result<Vec<Category>, StoreError>;

    async fn create(&self, user_id: i64, name: &str) -> Result<Category, StoreError>;

    /// Deletes only when both `id` and owner match. Expenses pointing at the
    /// category keep existing with their reference cleared.
    async fn delete(&self, user_id: i64, id: i64) -> Result<u64, StoreError>;
}

#[async_trait]
impl CategoryRepo for PgStore {
    async fn list_visible(&self, user_id: i64) -> Result<Vec<Category>, StoreError> {
        let rows = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, user_id
            FROM categories
            WHERE user_id = $1 OR user_id IS NULL
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows)
    }

    async fn create(&self, user_id: i64, name: &str) -> Result<Category, StoreError> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, user_id)
            VALUES ($1, $2)
            RETURNING id, name, user_id
            "#,
        )
        .bind(name)
        .bind(user_id)
        .fetch_one(self.pool())
        .await?;
        Ok(row)
    }

    async fn delete(&self, user_id: i64, id: i64) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected())
    }
}
