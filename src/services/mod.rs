// Service exports
pub mod backend;
pub mod cache;
pub mod postgres;

pub use backend::{BackendClient, BackendError, BackendTables};
pub use cache::{CacheError, CacheKey, CacheManager};
pub use postgres::{PostgresClient, PostgresError, ReviewDecision, ReviewRecord};
