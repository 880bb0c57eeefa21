//! Image cache server library
//!
//! Provides the router and request dispatch for the write-through image cache.

pub mod config;
pub mod error;
pub mod server;
pub mod types;

pub use config::Config;
pub use error::{Result, ServerError};
pub use server::{create_router, start_server, ServerState, SharedState};
pub use types::*;
