// Service exports
pub mod cache;
pub mod notify;
pub mod postgres;
pub mod store;

pub use cache::{CacheError, CacheKey, CacheManager};
pub use notify::{MatchAlert, NotifierClient, NotifyError};
pub use postgres::{AlertStats, NotificationLog, PostgresError};
pub use store::{PetStoreClient, StoreCollections, StoreError};
