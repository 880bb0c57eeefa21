//! Command-line configuration

use clap::{ArgAction, Parser};
use origin_client::OriginClient;
use std::path::PathBuf;
use std::time::Duration;

/// Default request body limit for PUT (16 MiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Server configuration, parsed once at startup
#[derive(Debug, Clone, Parser)]
#[command(
    name = "image-cache-server",
    version,
    about = "Write-through HTTP cache in front of an image origin",
    disable_help_flag = true
)]
pub struct Config {
    /// Address to listen on
    #[arg(short = 'h', long, env = "IMAGE_CACHE_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "IMAGE_CACHE_PORT")]
    pub port: u16,

    /// Directory holding cached images
    #[arg(short = 'c', long = "cache", env = "IMAGE_CACHE_DIR")]
    pub cache_dir: PathBuf,

    /// Base URL of the image origin
    #[arg(long = "origin", env = "ORIGIN_URL", default_value = OriginClient::DEFAULT_BASE_URL)]
    pub origin_url: String,

    /// Timeout for a single origin fetch
    #[arg(long, env = "ORIGIN_TIMEOUT_SECS", default_value_t = 10)]
    pub origin_timeout_secs: u64,

    /// Largest accepted PUT body
    #[arg(long, env = "MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Print help (`-h` is taken by --host)
    #[arg(long, action = ArgAction::Help)]
    #[allow(dead_code)]
    help: Option<bool>,
}

impl Config {
    pub fn origin_timeout(&self) -> Duration {
        Duration::from_secs(self.origin_timeout_secs)
    }

    /// Address string suitable for binding a listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
