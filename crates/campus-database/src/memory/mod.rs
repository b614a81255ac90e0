//! In-memory store implementations for single-process development and tests.

pub mod directory;
pub mod store;

pub use directory::MemoryDirectory;
pub use store::MemoryStore;
