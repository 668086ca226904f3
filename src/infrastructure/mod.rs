//! Infrastructure layer.
//!
//! Concrete implementations of the backing store contract defined by the
//! domain layer, plus the wire DTOs for stored records.

pub mod dto;
pub mod store;

pub use store::InMemoryBackingStore;
