// Service exports
pub mod cache;
pub mod memory;
pub mod postgres;
pub mod store;

pub use cache::{CacheKey, SnapshotCache};
pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use store::{CandidateFilter, ProfileStore, RecommendationSummary, Retrying, StoreError};
