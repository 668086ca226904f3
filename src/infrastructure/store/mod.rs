//! Backing store implementations.

pub mod inmemory;

pub use inmemory::InMemoryBackingStore;
