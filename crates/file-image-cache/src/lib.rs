//! File-backed image cache
//!
//! Stores one file per cache key (`<key>.jpg`) in a single directory.
//! Writes go through a temporary file and a rename, so a reader sees either
//! the previous entry or the new one in full.

mod cache;
mod error;
mod types;

pub use cache::ImageCache;
pub use error::{CacheError, Result};
pub use types::CacheStats;
