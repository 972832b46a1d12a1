//! Service-level error shared by note and memo use-cases.

use crate::github::repo_url::RepoUrlError;
use crate::github::ProviderError;
use crate::model::EntityKind;
use crate::repo::RepoError;
use crate::snapshot::SnapshotError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    /// Member, note or memo does not exist.
    NotFound { kind: EntityKind, id: i64 },
    /// Caller input rejected before any storage access.
    InvalidArgument(String),
    /// Repository hosting API failure that is not masked by a fallback.
    ExternalService(ProviderError),
    /// File snapshot could not be built; the imported note was rolled back.
    Snapshot(SnapshotError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl ServiceError {
    pub fn not_found(kind: EntityKind, id: i64) -> Self {
        Self::NotFound { kind, id }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            Self::ExternalService(err) => write!(f, "external service failure: {err}"),
            Self::Snapshot(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ExternalService(err) => Some(err),
            Self::Snapshot(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::NotFound { .. } | Self::InvalidArgument(_) => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { kind, id } => Self::NotFound { kind, id },
            other => Self::Repo(other),
        }
    }
}

impl From<rusqlite::Error> for ServiceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(value.into())
    }
}

impl From<RepoUrlError> for ServiceError {
    fn from(value: RepoUrlError) -> Self {
        Self::InvalidArgument(value.to_string())
    }
}

impl From<ProviderError> for ServiceError {
    fn from(value: ProviderError) -> Self {
        Self::ExternalService(value)
    }
}

impl From<SnapshotError> for ServiceError {
    fn from(value: SnapshotError) -> Self {
        Self::Snapshot(value)
    }
}
