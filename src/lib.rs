pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod payment;
pub mod routes;
pub mod seed;
pub mod utils;

use sea_orm::DatabaseConnection;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use payment::PaymentClient;

#[cfg_attr(not(feature = "mock"), derive(Clone))]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Config,
    pub payments: PaymentClient,
}

// With sea-orm's `mock` feature enabled, `DatabaseConnection` does not derive
// `Clone`, so clone each variant manually; the mock variant is an `Arc`, so
// clones share the same underlying connection and transaction log.
#[cfg(feature = "mock")]
impl Clone for AppState {
    fn clone(&self) -> Self {
        let db = match &self.db {
            DatabaseConnection::SqlxPostgresPoolConnection(conn) => {
                DatabaseConnection::SqlxPostgresPoolConnection(conn.clone())
            }
            DatabaseConnection::MockDatabaseConnection(conn) => {
                DatabaseConnection::MockDatabaseConnection(std::sync::Arc::clone(conn))
            }
            DatabaseConnection::Disconnected => DatabaseConnection::Disconnected,
        };
        Self {
            db,
            config: self.config.clone(),
            payments: self.payments.clone(),
        }
    }
}
