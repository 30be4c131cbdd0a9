use std::sync::Arc;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::rates::RateClient;

pub type DbPool = Pool<SqliteConnectionManager>;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Config,
    pub catalog: Arc<Catalog>,
    pub rates: RateClient,
}
