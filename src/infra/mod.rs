//! Infrastructure layer - storage abstraction
//!
//! The repository contract the domain expects from the system of record,
//! plus an in-memory implementation for tests and scaffolded applications.

pub mod memory;
pub mod repository;

pub use memory::MemoryIdentityStore;
pub use repository::{IdentityRepository, StoreError, StoreResult, UniqueField};
