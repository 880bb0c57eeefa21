//! Cache keys for the image cache
//!
//! A key is a non-empty run of ASCII decimal digits. Requests address a key
//! with a path of the form `/<digits>`; anything else is an invalid path.

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static KEY_PATH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^/([0-9]+)$").unwrap());

static KEY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());

/// A validated cache key.
///
/// The digit string is kept verbatim and never interpreted as a number, so
/// `"007"` and `"7"` are different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Parse a request path like `/200` into a key
    pub fn from_path(path: &str) -> Result<Self, InvalidPath> {
        let caps = KEY_PATH_RE
            .captures(path)
            .ok_or_else(|| InvalidPath::new(path))?;
        Ok(Self(caps[1].to_string()))
    }

    /// Parse a bare digit string like `200` into a key
    pub fn parse(digits: &str) -> Result<Self, InvalidPath> {
        if KEY_RE.is_match(digits) {
            Ok(Self(digits.to_string()))
        } else {
            Err(InvalidPath::new(digits))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CacheKey {
    type Err = InvalidPath;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The input did not have the shape of a cache key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPath {
    path: String,
}

impl InvalidPath {
    fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }

    /// The rejected input
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for InvalidPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid path {:?}: expected '/' followed by one or more digits",
            self.path
        )
    }
}

impl std::error::Error for InvalidPath {}
