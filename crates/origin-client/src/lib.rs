//! Origin client for the image cache
//!
//! Fetches an image from the remote origin by cache key. A single request is
//! made per fetch; retries are left to the caller.
//!
//! # Example
//!
//! ```no_run
//! use cache_key::CacheKey;
//! use origin_client::{Origin, OriginClient};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), origin_client::OriginError> {
//! let client = OriginClient::new(OriginClient::DEFAULT_BASE_URL, Duration::from_secs(10))?;
//! let key: CacheKey = "200".parse().expect("valid key");
//! let image = client.fetch(&key).await?;
//! println!("{} bytes", image.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;

pub use client::{Origin, OriginClient};
pub use error::{OriginError, Result};
