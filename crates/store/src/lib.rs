//! Document store implementations for the session tracker.

pub mod memory;

pub use memory::MemoryStore;
