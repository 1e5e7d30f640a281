//! Presentation service contract.
//!
//! DESIGN
//! ======
//! The store talks to the service only through [`PresentationApi`]. The
//! production implementation is [`http::HttpApi`]; tests substitute a
//! recording mock. Responses that the store does not use (update and delete
//! acknowledgements) are reduced to `()`.

pub mod http;

use async_trait::async_trait;

use crate::model::{
    BackgroundPatch, ElementId, NewElement, PartialElement, Presentation, PresentationId, Slide, SlideElement, SlideId,
};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by presentation service calls.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout).
    #[error("request failed: {0}")]
    Request(String),

    /// The credential was missing or rejected.
    #[error("unauthorized")]
    Unauthorized,

    /// The service returned a non-success status.
    #[error("server responded with status {status}")]
    Status { status: u16, message: Option<String> },

    /// The response body could not be deserialized.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ApiError {
    /// Human-readable message sent by the service, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

// =============================================================================
// CONTRACT
// =============================================================================

/// The REST operations the editor consumes.
#[async_trait]
pub trait PresentationApi: Send + Sync {
    /// `GET /presentations/{id}`
    async fn fetch_presentation(&self, id: PresentationId) -> Result<Presentation, ApiError>;

    /// `PUT /presentations/{id}` with `{title}`
    async fn rename_presentation(&self, id: PresentationId, title: &str) -> Result<(), ApiError>;

    /// `POST /presentations/{id}/slides`
    async fn create_slide(&self, presentation: PresentationId) -> Result<Slide, ApiError>;

    /// `DELETE /slides/{id}`
    async fn delete_slide(&self, slide: SlideId) -> Result<(), ApiError>;

    /// `PUT /presentations/{id}/slides/reorder` with `{slide_ids}`
    async fn reorder_slides(&self, presentation: PresentationId, slide_ids: &[SlideId]) -> Result<(), ApiError>;

    /// `PUT /slides/{id}` with `{background_color}` or `{background_image}`
    async fn update_slide(&self, slide: SlideId, patch: &BackgroundPatch) -> Result<(), ApiError>;

    /// `POST /slides/{id}/elements`
    async fn create_element(&self, slide: SlideId, element: &NewElement) -> Result<SlideElement, ApiError>;

    /// `PUT /elements/{id}` with the present fields of `partial`
    async fn update_element(&self, id: ElementId, partial: &PartialElement) -> Result<(), ApiError>;

    /// `DELETE /elements/{id}`
    async fn delete_element(&self, id: ElementId) -> Result<(), ApiError>;
}
