//! # Run ID Tracking
//!
//! Identifiers that correlate every log line emitted by one migration run.
//! Uses CUID2 for collision-resistant, URL-safe identifiers.

use std::{fmt, str::FromStr};

/// A migration run identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunId(String);

impl RunId {
    /// Generate a new random run ID.
    #[inline]
    pub fn new() -> Self { Self(cuid2::create_id()) }

    /// Get the run ID as a string.
    #[inline]
    pub fn as_str(&self) -> &str { &self.0 }
}

impl Default for RunId {
    #[inline]
    fn default() -> Self { Self::new() }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl FromStr for RunId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid_len = (20 ..= 32).contains(&s.len());
        if valid_len && s.chars().all(|c| c.is_ascii_alphanumeric()) {
            Ok(Self(s.to_string()))
        }
        else {
            Err(format!("Invalid run ID format: {s}"))
        }
    }
}
