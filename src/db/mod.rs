//! Database layer: account repository trait, PostgreSQL and in-memory implementations.

mod memory;
mod pool;
mod repositories;

pub use memory::MemoryAccountRepository;
pub use pool::{create_pool, run_migrations, DbPool};
pub use repositories::*;
