pub mod memory_store;
pub mod models;
pub mod pg_store;

pub use memory_store::MemoryStore;
pub use pg_store::PgStore;
