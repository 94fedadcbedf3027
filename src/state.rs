use crate::config::AppConfig;
use crate::db::{DbPool, OrmConn};

/// Shared handler state: both storage handles plus the startup-validated
/// config (the token secret is read from here, never from the environment
/// at request time).
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(pool: DbPool, orm: OrmConn, config: AppConfig) -> Self {
        Self { pool, orm, config }
    }
}
