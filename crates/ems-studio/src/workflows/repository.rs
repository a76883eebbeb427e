use std::sync::atomic::{AtomicU64, Ordering};

use axum::http::StatusCode;

/// Error enumeration for repository failures shared by every workflow store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    pub(crate) fn status_code(&self) -> StatusCode {
        match self {
            RepositoryError::Conflict => StatusCode::CONFLICT,
            RepositoryError::NotFound => StatusCode::NOT_FOUND,
            RepositoryError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Monotonic identifier source producing `prefix-000001` style ids.
pub(crate) struct IdSequence {
    prefix: &'static str,
    next: AtomicU64,
}

impl IdSequence {
    pub(crate) const fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            next: AtomicU64::new(1),
        }
    }

    pub(crate) fn next_value(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    pub(crate) fn format(&self, value: u64) -> String {
        format!("{}-{value:06}", self.prefix)
    }

    pub(crate) fn next_id(&self) -> String {
        let value = self.next_value();
        self.format(value)
    }
}
