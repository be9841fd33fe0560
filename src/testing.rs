//! In-memory repositories and HTTP helpers for handler tests.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use axum::http::{header::AUTHORIZATION, HeaderName, HeaderValue};
use axum_test::TestServer;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use time::OffsetDateTime;

use crate::{
    app::build_app,
    auth::{
        repo::UserRepo,
        repo_types::{NewUser, User},
    },
    categories::{repo::CategoryRepo, repo_types::Category},
    config::{AppConfig, DatabaseConfig, JwtConfig},
    error::StoreError,
    expenses::{
        repo::ExpenseRepo,
        repo_types::{ExpenseInput, ExpenseRow},
    },
    state::AppState,
};

#[derive(Debug, Clone)]
struct StoredExpense {
    id: i64,
    user_id: i64,
    input: ExpenseInput,
    created_at: OffsetDateTime,
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    categories: Vec<Category>,
    expenses: Vec<StoredExpense>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn check_expense_refs(&self, user_id: i64, category_id: Option<i64>) -> Result<(), StoreError> {
        if !self.users.iter().any(|u| u.id == user_id) {
            return Err(StoreError::ForeignKeyViolation(
                "insert or update on table \"expenses\" violates foreign key constraint \"expenses_user_id_fkey\"".into(),
            ));
        }
        if let Some(category_id) = category_id {
            if !self.categories.iter().any(|c| c.id == category_id) {
                return Err(StoreError::ForeignKeyViolation(
                    "insert or update on table \"expenses\" violates foreign key constraint \"expenses_category_id_fkey\"".into(),
                ));
            }
        }
        Ok(())
    }

    /// ON DELETE SET NULL for `expenses.category_id`.
    fn clear_category_refs(&mut self, removed: &[i64]) {
        for expense in &mut self.expenses {
            if expense.input.category_id.is_some_and(|id| removed.contains(&id)) {
                expense.input.category_id = None;
            }
        }
    }
}

/// Mirrors the Postgres schema's UNIQUE, FOREIGN KEY, CASCADE and SET NULL
/// rules.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().expect("memory store poisoned")
    }

    pub fn insert_shared_category(&self, name: &str) -> i64 {
        let mut t = self.tables();
        let id = t.next_id();
        t.categories.push(Category {
            id,
            name: name.into(),
            user_id: None,
        });
        id
    }

    /// Number of (categories, expenses) owned by `user_id`.
    pub fn count_owned_by(&self, user_id: i64) -> (usize, usize) {
        let t = self.tables();
        (
            t.categories
                .iter()
                .filter(|c| c.user_id == Some(user_id))
                .count(),
            t.expenses.iter().filter(|e| e.user_id == user_id).count(),
        )
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let mut t = self.tables();
        if t.users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::UniqueViolation(
                "duplicate key value violates unique constraint \"users_username_key\"".into(),
            ));
        }
        if t.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::UniqueViolation(
                "duplicate key value violates unique constraint \"users_email_key\"".into(),
            ));
        }
        let user = User {
            id: t.next_id(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: OffsetDateTime::now_utc(),
        };
        t.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.tables().users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.tables().users.iter().find(|u| u.id == id).cloned())
    }

    async fn delete(&self, id: i64) -> Result<u64, StoreError> {
        let mut t = self.tables();
        let before = t.users.len();
        t.users.retain(|u| u.id != id);
        let deleted = (before - t.users.len()) as u64;

        let removed: Vec<i64> = t
            .categories
            .iter()
            .filter(|c| c.user_id == Some(id))
            .map(|c| c.id)
            .collect();
        t.categories.retain(|c| c.user_id != Some(id));
        t.expenses.retain(|e| e.user_id != id);
        t.clear_category_refs(&removed);
        Ok(deleted)
    }
}

#[async_trait]
impl CategoryRepo for MemoryStore {
    async fn list_visible(&self, user_id: i64) -> Result<Vec<Category>, StoreError> {
        Ok(self
            .tables()
            .categories
            .iter()
            .filter(|c| c.user_id.map_or(true, |owner| owner == user_id))
            .cloned()
            .collect())
    }

    async fn create(&self, user_id: i64, name: &str) -> Result<Category, StoreError> {
        let mut t = self.tables();
        let category = Category {
            id: t.next_id(),
            name: name.into(),
            user_id: Some(user_id),
        };
        t.categories.push(category.clone());
        Ok(category)
    }

    async fn delete(&self, user_id: i64, id: i64) -> Result<u64, StoreError> {
        let mut t = self.tables();
        let before = t.categories.len();
        t.categories
            .retain(|c| !(c.id == id && c.user_id == Some(user_id)));
        let deleted = before - t.categories.len();
        if deleted > 0 {
            t.clear_category_refs(&[id]);
        }
        Ok(deleted as u64)
    }
}

#[async_trait]
impl ExpenseRepo for MemoryStore {
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<ExpenseRow>, StoreError> {
        let t = self.tables();
        let mut rows: Vec<ExpenseRow> = t
            .expenses
            .iter()
            .filter(|e| e.user_id == user_id)
            .map(|e| ExpenseRow {
                id: e.id,
                user_id: e.user_id,
                category_id: e.input.category_id,
                amount: e.input.amount,
                description: e.input.description.clone(),
                date: e.input.date,
                created_at: e.created_at,
                category_name: e.input.category_id.and_then(|cid| {
                    t.categories
                        .iter()
                        .find(|c| c.id == cid)
                        .map(|c| c.name.clone())
                }),
            })
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn create(&self, user_id: i64, input: &ExpenseInput) -> Result<i64, StoreError> {
        let mut t = self.tables();
        t.check_expense_refs(user_id, input.category_id)?;
        let id = t.next_id();
        t.expenses.push(StoredExpense {
            id,
            user_id,
            input: input.clone(),
            created_at: OffsetDateTime::now_utc(),
        });
        Ok(id)
    }

    async fn update(
        &self,
        user_id: i64,
        id: i64,
        input: &ExpenseInput,
    ) -> Result<u64, StoreError> {
        let mut t = self.tables();
        if !t.expenses.iter().any(|e| e.id == id && e.user_id == user_id) {
            return Ok(0);
        }
        t.check_expense_refs(user_id, input.category_id)?;
        let mut affected = 0;
        for expense in t
            .expenses
            .iter_mut()
            .filter(|e| e.id == id && e.user_id == user_id)
        {
            expense.input = input.clone();
            affected += 1;
        }
        Ok(affected)
    }

    async fn delete(&self, user_id: i64, id: i64) -> Result<u64, StoreError> {
        let mut t = self.tables();
        let before = t.expenses.len();
        t.expenses.retain(|e| !(e.id == id && e.user_id == user_id));
        Ok((before - t.expenses.len()) as u64)
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database: DatabaseConfig {
            url: None,
            host: "localhost".into(),
            port: 5432,
            user: "postgres".into(),
            password: String::new(),
            name: "expenses_test".into(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: "test-secret".into(),
            ttl_minutes: None,
        },
        host: "127.0.0.1".into(),
        port: 0,
        spending_limit: Decimal::new(1_264_500, 2),
    }
}

pub fn test_state() -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let state = AppState::from_parts(
        store.clone(),
        store.clone(),
        store.clone(),
        Arc::new(test_config()),
    );
    (state, store)
}

/// The full router over a fresh [`MemoryStore`].
pub fn test_server() -> (TestServer, Arc<MemoryStore>) {
    let (state, store) = test_state();
    let server = TestServer::new(build_app(state)).expect("Could not create test server.");
    (server, store)
}

/// Registers `username` with password `pw123456`, returning token and id.
pub async fn register_user(server: &TestServer, username: &str, email: &str) -> (String, i64) {
    let body: Value = server
        .post("/api/auth/register")
        .json(&json!({ "username": username, "email": email, "password": "pw123456" }))
        .await
        .json();
    (
        body["token"].as_str().expect("token").to_string(),
        body["userId"].as_i64().expect("userId"),
    )
}

pub fn auth_header(token: &str) -> (HeaderName, HeaderValue) {
    (
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).expect("valid header value"),
    )
}
