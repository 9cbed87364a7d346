use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::config::Config;
use crate::services::session::SessionManager;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    pub sessions: SessionManager,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config, sessions: SessionManager) -> Self {
        Self {
            db,
            config: Arc::new(config),
            sessions,
        }
    }
}
