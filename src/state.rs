use std::sync::Arc;

use crate::auth::repo::UserRepo;
use crate::categories::repo::CategoryRepo;
use crate::config::AppConfig;
use crate::db::PgStore;
use crate::expenses::repo::ExpenseRepo;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepo>,
    pub categories: Arc<dyn CategoryRepo>,
    pub expenses: Arc<dyn ExpenseRepo>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: PgStore, config: AppConfig) -> Self {
        let store = Arc::new(store);
        Self::from_parts(store.clone(), store.clone(), store, Arc::new(config))
    }

    pub fn from_parts(
        users: Arc<dyn UserRepo>,
        categories: Arc<dyn CategoryRepo>,
        expenses: Arc<dyn ExpenseRepo>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            users,
            categories,
            expenses,
            config,
        }
    }
}
