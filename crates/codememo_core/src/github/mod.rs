//! Repository hosting integration (GitHub REST API).
//!
//! # Responsibility
//! - Parse repository URLs into `owner/name` identifiers.
//! - Fetch repository metadata, masking contributor-count failures.
//! - Provide a blocking HTTP client implementing the provider contracts.
//!
//! # Invariants
//! - Nothing in this module touches storage; callers fetch before opening
//!   any transaction.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod client;
pub mod config;
pub mod metadata;
pub mod repo_url;

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Failure reported by a repository hosting provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Connection, TLS or timeout failure before a response arrived.
    Transport(String),
    /// Provider answered with a non-success status.
    Status { code: u16, message: String },
    /// Response body did not match the expected shape.
    Decode(String),
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "provider transport failure: {message}"),
            Self::Status { code, message } => {
                write!(f, "provider returned status {code}: {message}")
            }
            Self::Decode(message) => write!(f, "provider response decode failure: {message}"),
        }
    }
}

impl Error for ProviderError {}
