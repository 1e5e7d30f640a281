//! `reqwest` client for the presentation service.
//!
//! Thin HTTP wrapper: path building and error-body parsing are pure
//! functions so they can be tested without a server.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{ApiError, PresentationApi};
use crate::auth::CredentialProvider;
use crate::config::EditorConfig;
use crate::model::{
    BackgroundPatch, ElementId, NewElement, PartialElement, Presentation, PresentationId, Slide, SlideElement, SlideId,
};

// =============================================================================
// CLIENT
// =============================================================================

pub struct HttpApi {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl HttpApi {
    /// Build a client for `config.api_url`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::HttpClientBuild` if the HTTP client cannot be built.
    pub fn new(config: &EditorConfig, credentials: Arc<dyn CredentialProvider>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.api_url.clone(), credentials })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        debug!(%method, %url, "api request");
        let builder = self.http.request(method, url);
        match self.credentials.bearer_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await.map_err(|e| ApiError::Request(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            self.credentials.invalidate();
            return Err(ApiError::Unauthorized);
        }
        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), "api request rejected");
        Err(ApiError::Status { status: status.as_u16(), message: parse_error_message(&body) })
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(builder).await?;
        let text = response.text().await.map_err(|e| ApiError::Request(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn send_unit(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        self.send(builder).await.map(drop)
    }

    fn with_body<B: Serialize + ?Sized>(&self, method: Method, path: &str, body: &B) -> RequestBuilder {
        self.request(method, path).json(body)
    }
}

#[async_trait]
impl PresentationApi for HttpApi {
    async fn fetch_presentation(&self, id: PresentationId) -> Result<Presentation, ApiError> {
        self.send_json(self.request(Method::GET, &presentation_path(id))).await
    }

    async fn rename_presentation(&self, id: PresentationId, title: &str) -> Result<(), ApiError> {
        let body = RenameBody { title };
        self.send_unit(self.with_body(Method::PUT, &presentation_path(id), &body)).await
    }

    async fn create_slide(&self, presentation: PresentationId) -> Result<Slide, ApiError> {
        self.send_json(self.request(Method::POST, &slides_path(presentation))).await
    }

    async fn delete_slide(&self, slide: SlideId) -> Result<(), ApiError> {
        self.send_unit(self.request(Method::DELETE, &slide_path(slide))).await
    }

    async fn reorder_slides(&self, presentation: PresentationId, slide_ids: &[SlideId]) -> Result<(), ApiError> {
        let body = ReorderBody { slide_ids };
        self.send_unit(self.with_body(Method::PUT, &reorder_path(presentation), &body)).await
    }

    async fn update_slide(&self, slide: SlideId, patch: &BackgroundPatch) -> Result<(), ApiError> {
        self.send_unit(self.with_body(Method::PUT, &slide_path(slide), patch)).await
    }

    async fn create_element(&self, slide: SlideId, element: &NewElement) -> Result<SlideElement, ApiError> {
        self.send_json(self.with_body(Method::POST, &elements_path(slide), element)).await
    }

    async fn update_element(&self, id: ElementId, partial: &PartialElement) -> Result<(), ApiError> {
        self.send_unit(self.with_body(Method::PUT, &element_path(id), partial)).await
    }

    async fn delete_element(&self, id: ElementId) -> Result<(), ApiError> {
        self.send_unit(self.request(Method::DELETE, &element_path(id))).await
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct RenameBody<'a> {
    title: &'a str,
}

#[derive(Serialize)]
struct ReorderBody<'a> {
    slide_ids: &'a [SlideId],
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

// =============================================================================
// PATHS
// =============================================================================

fn presentation_path(id: PresentationId) -> String {
    format!("/presentations/{id}")
}

fn slides_path(presentation: PresentationId) -> String {
    format!("/presentations/{presentation}/slides")
}

fn reorder_path(presentation: PresentationId) -> String {
    format!("/presentations/{presentation}/slides/reorder")
}

fn slide_path(slide: SlideId) -> String {
    format!("/slides/{slide}")
}

fn elements_path(slide: SlideId) -> String {
    format!("/slides/{slide}/elements")
}

fn element_path(id: ElementId) -> String {
    format!("/elements/{id}")
}

/// Extract `message` from a JSON error body; anything else yields `None`.
fn parse_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .map(|parsed| parsed.message)
        .unwrap_or_default()
        .filter(|message| !message.trim().is_empty())
}
