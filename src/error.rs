//! Store-level error taxonomy.
//!
//! ERROR HANDLING
//! ==============
//! Every variant wraps the transport failure that caused it. Store operations
//! report these through the notifier before returning them, so the UI never
//! sees an unreported failure.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use crate::api::ApiError;
use crate::model::ElementId;

/// Errors produced by `PresentationStore` operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The initial load of a presentation failed.
    #[error("failed to load presentation: {0}")]
    Fetch(#[source] ApiError),

    /// The server rejected a create (slide or element).
    #[error("failed to create: {0}")]
    Create(#[source] ApiError),

    /// The server rejected a delete (slide or element).
    #[error("failed to delete: {0}")]
    Delete(#[source] ApiError),

    /// The server rejected a rename or background change.
    #[error("failed to update: {0}")]
    Update(#[source] ApiError),

    /// The server rejected a new slide order.
    #[error("failed to reorder slides: {0}")]
    Reorder(#[source] ApiError),

    /// A requested slide order is not a permutation of the current slides.
    #[error("slide order must list every slide exactly once")]
    InvalidOrder,

    /// One element of a batched update could not be saved.
    #[error("failed to save element {id}: {source}")]
    Persistence {
        id: ElementId,
        #[source]
        source: ApiError,
    },
}

impl StoreError {
    /// The underlying transport error, if the failure came from the service.
    #[must_use]
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Fetch(e) | Self::Create(e) | Self::Delete(e) | Self::Update(e) | Self::Reorder(e) => Some(e),
            Self::Persistence { source, .. } => Some(source),
            Self::InvalidOrder => None,
        }
    }

    /// Stable machine-readable code for logs.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "E_FETCH",
            Self::Create(_) => "E_CREATE",
            Self::Delete(_) => "E_DELETE",
            Self::Update(_) => "E_UPDATE",
            Self::Reorder(_) => "E_REORDER",
            Self::InvalidOrder => "E_INVALID_ORDER",
            Self::Persistence { .. } => "E_PERSISTENCE",
        }
    }
}
