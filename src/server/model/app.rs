use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::server::{config::Config, service::media::storage::StorageService};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    pub storage: StorageService,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config, storage: StorageService) -> Self {
        Self {
            db,
            config: Arc::new(config),
            storage,
        }
    }
}
