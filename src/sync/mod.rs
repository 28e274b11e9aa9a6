//! Concurrency-safe containers.

mod map;

pub use map::SyncMap;
