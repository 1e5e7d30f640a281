//! Document model: presentations, slides, slide elements, and sparse edits.
//!
//! This module defines the wire types returned by the presentation service
//! (`Presentation`, `Slide`, `SlideElement`), the sparse-update type used for
//! incremental element edits (`PartialElement`), the slide background state
//! (`Background`, `BackgroundPatch`), and the creation payload for new
//! elements (`NewElement`).
//!
//! Data flows into this layer from the network (JSON deserialization) and
//! from the editor (mutations). The store owns the only mutable copy.

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{
    DEFAULT_ELEMENT_WIDTH, DEFAULT_FONT_SIZE, DEFAULT_MEDIA_HEIGHT, DEFAULT_TEXT_CONTENT, DEFAULT_TEXT_HEIGHT,
};
use crate::debounce::Coalesce;
use crate::geometry::{Point, Rect};

/// Unique identifier for a presentation.
pub type PresentationId = Uuid;

/// Server-assigned identifier for a slide.
pub type SlideId = i64;

/// Unique identifier for a slide element.
pub type ElementId = Uuid;

/// Background color the server assigns to new slides.
pub const DEFAULT_BACKGROUND_COLOR: &str = "#FFFFFF";

// =============================================================================
// ELEMENT
// =============================================================================

/// The kind of a slide element. `content` is interpreted per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElementType {
    /// Literal text body.
    Text,
    /// Image URL.
    Image,
    /// YouTube video identifier.
    YoutubeVideo,
    /// URL of a video file uploaded to the service.
    UploadedVideo,
    /// URL of an audio file.
    Audio,
}

impl ElementType {
    /// Whether `autoplay` / `muted` apply to this kind.
    #[must_use]
    pub fn is_playable(self) -> bool {
        matches!(self, Self::YoutubeVideo | Self::UploadedVideo | Self::Audio)
    }

    /// Default box for a newly created element of this kind.
    #[must_use]
    pub fn default_size(self) -> (f64, f64) {
        match self {
            Self::Text => (DEFAULT_ELEMENT_WIDTH, DEFAULT_TEXT_HEIGHT),
            Self::Image | Self::YoutubeVideo | Self::UploadedVideo | Self::Audio => {
                (DEFAULT_ELEMENT_WIDTH, DEFAULT_MEDIA_HEIGHT)
            }
        }
    }

    /// Parse the wire name (`"TEXT"`, `"YOUTUBE_VIDEO"`, ...), case-insensitively.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_uppercase().as_str() {
            "TEXT" => Some(Self::Text),
            "IMAGE" => Some(Self::Image),
            "YOUTUBE_VIDEO" => Some(Self::YoutubeVideo),
            "UPLOADED_VIDEO" => Some(Self::UploadedVideo),
            "AUDIO" => Some(Self::Audio),
            _ => None,
        }
    }
}

/// One placeable content unit on a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideElement {
    pub id: ElementId,
    pub element_type: ElementType,
    /// Left edge in slide coordinates.
    pub pos_x: f64,
    /// Top edge in slide coordinates.
    pub pos_y: f64,
    pub width: f64,
    pub height: f64,
    /// Text body, media URL, or video identifier depending on `element_type`.
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    #[serde(default)]
    pub autoplay: bool,
    #[serde(default)]
    pub muted: bool,
    /// Preview image the service attaches to newly created YouTube elements.
    #[serde(default, rename = "thumbnailUrl", skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

fn default_font_size() -> u32 {
    DEFAULT_FONT_SIZE
}

impl SlideElement {
    /// Top-left corner.
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.pos_x, self.pos_y)
    }

    /// Bounding box in slide coordinates.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos_x, self.pos_y, self.width, self.height)
    }

    /// Merge a sparse edit into this element. Absent fields are left alone.
    pub fn apply(&mut self, partial: &PartialElement) {
        if let Some(x) = partial.pos_x {
            self.pos_x = x;
        }
        if let Some(y) = partial.pos_y {
            self.pos_y = y;
        }
        if let Some(w) = partial.width {
            self.width = w;
        }
        if let Some(h) = partial.height {
            self.height = h;
        }
        if let Some(ref content) = partial.content {
            self.content = Some(content.clone());
        }
        if let Some(size) = partial.font_size {
            self.font_size = size;
        }
        if let Some(autoplay) = partial.autoplay {
            self.autoplay = autoplay;
        }
        if let Some(muted) = partial.muted {
            self.muted = muted;
        }
    }
}

/// Sparse update for a slide element. Only present fields are applied or sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialElement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoplay: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub muted: Option<bool>,
}

impl PartialElement {
    /// A move to `point`.
    #[must_use]
    pub fn position(point: Point) -> Self {
        Self { pos_x: Some(point.x), pos_y: Some(point.y), ..Self::default() }
    }

    /// A move-and-resize to `rect`.
    #[must_use]
    pub fn bounds(rect: Rect) -> Self {
        Self {
            pos_x: Some(rect.x),
            pos_y: Some(rect.y),
            width: Some(rect.width),
            height: Some(rect.height),
            ..Self::default()
        }
    }

    /// A text body replacement.
    #[must_use]
    pub fn content(text: impl Into<String>) -> Self {
        Self { content: Some(text.into()), ..Self::default() }
    }

    /// `true` when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Drop every field that `other` sets. Used when a newer write for the
    /// same fields has already been issued elsewhere.
    pub fn clear_fields_of(&mut self, other: &PartialElement) {
        if other.pos_x.is_some() {
            self.pos_x = None;
        }
        if other.pos_y.is_some() {
            self.pos_y = None;
        }
        if other.width.is_some() {
            self.width = None;
        }
        if other.height.is_some() {
            self.height = None;
        }
        if other.content.is_some() {
            self.content = None;
        }
        if other.font_size.is_some() {
            self.font_size = None;
        }
        if other.autoplay.is_some() {
            self.autoplay = None;
        }
        if other.muted.is_some() {
            self.muted = None;
        }
    }
}

impl Coalesce for PartialElement {
    /// Field-wise last-write-wins: fields set in `newer` replace ours, the
    /// rest are kept.
    fn coalesce(&mut self, newer: Self) {
        let PartialElement { pos_x, pos_y, width, height, content, font_size, autoplay, muted } = newer;
        self.pos_x = pos_x.or(self.pos_x);
        self.pos_y = pos_y.or(self.pos_y);
        self.width = width.or(self.width);
        self.height = height.or(self.height);
        self.content = content.or(self.content.take());
        self.font_size = font_size.or(self.font_size);
        self.autoplay = autoplay.or(self.autoplay);
        self.muted = muted.or(self.muted);
    }
}

/// Creation payload for `POST /slides/{id}/elements`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewElement {
    pub element_type: ElementType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub width: f64,
    pub height: f64,
}

impl NewElement {
    /// Type-appropriate defaults. Text gets a starter body when none is
    /// supplied; media keeps whatever content the caller passed.
    #[must_use]
    pub fn for_type(element_type: ElementType, content: Option<String>) -> Self {
        let (width, height) = element_type.default_size();
        let content = match element_type {
            ElementType::Text => Some(content.unwrap_or_else(|| DEFAULT_TEXT_CONTENT.to_owned())),
            _ => content,
        };
        Self { element_type, content, width, height }
    }
}

// =============================================================================
// SLIDE
// =============================================================================

/// Effective fill of a slide. An image, when present, wins over the color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Background {
    Color(String),
    Image(String),
}

/// A background change. Serializes to the `PUT /slides/{id}` body:
/// `{"background_color": "#hex"}` or `{"background_image": url | null}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackgroundPatch {
    /// Fill with a color; clears any image.
    #[serde(rename = "background_color")]
    Color(String),
    /// Set the image, or remove it with `None` (revealing the color).
    #[serde(rename = "background_image")]
    Image(Option<String>),
}

/// A single slide and its elements, in draw order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub id: SlideId,
    pub slide_number: u32,
    #[serde(default = "default_background_color")]
    pub background_color: String,
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(default)]
    pub elements: Vec<SlideElement>,
}

fn default_background_color() -> String {
    DEFAULT_BACKGROUND_COLOR.to_owned()
}

impl Slide {
    /// Current effective background.
    #[must_use]
    pub fn background(&self) -> Background {
        match &self.background_image {
            Some(url) => Background::Image(url.clone()),
            None => Background::Color(self.background_color.clone()),
        }
    }

    /// Apply a background change. Setting a color clears the image.
    pub fn apply_background(&mut self, patch: &BackgroundPatch) {
        match patch {
            BackgroundPatch::Color(hex) => {
                self.background_color.clone_from(hex);
                self.background_image = None;
            }
            BackgroundPatch::Image(url) => {
                self.background_image.clone_from(url);
            }
        }
    }

    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&SlideElement> {
        self.elements.iter().find(|e| e.id == *id)
    }

    pub fn element_mut(&mut self, id: &ElementId) -> Option<&mut SlideElement> {
        self.elements.iter_mut().find(|e| e.id == *id)
    }
}

// =============================================================================
// PRESENTATION
// =============================================================================

/// A presentation and its ordered slides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    pub id: PresentationId,
    pub title: String,
    #[serde(default)]
    pub slides: Vec<Slide>,
}

impl Presentation {
    #[must_use]
    pub fn slide(&self, id: SlideId) -> Option<&Slide> {
        self.slides.iter().find(|s| s.id == id)
    }

    pub fn slide_mut(&mut self, id: SlideId) -> Option<&mut Slide> {
        self.slides.iter_mut().find(|s| s.id == id)
    }

    #[must_use]
    pub fn slide_index(&self, id: SlideId) -> Option<usize> {
        self.slides.iter().position(|s| s.id == id)
    }

    /// Slide IDs in presentation order.
    #[must_use]
    pub fn slide_ids(&self) -> Vec<SlideId> {
        self.slides.iter().map(|s| s.id).collect()
    }

    /// Whether `order` lists every current slide exactly once.
    #[must_use]
    pub fn is_permutation(&self, order: &[SlideId]) -> bool {
        let current: HashSet<SlideId> = self.slides.iter().map(|s| s.id).collect();
        let requested: HashSet<SlideId> = order.iter().copied().collect();
        order.len() == self.slides.len() && requested.len() == order.len() && requested == current
    }

    /// Rearrange slides to follow `order`. Returns `false` (and leaves the
    /// slides untouched) unless `order` is a permutation of the current IDs.
    pub fn reorder(&mut self, order: &[SlideId]) -> bool {
        if !self.is_permutation(order) {
            return false;
        }
        let mut by_id: HashMap<SlideId, Slide> = self.slides.drain(..).map(|s| (s.id, s)).collect();
        self.slides = order.iter().filter_map(|id| by_id.remove(id)).collect();
        for (index, slide) in self.slides.iter_mut().enumerate() {
            slide.slide_number = u32::try_from(index + 1).unwrap_or(u32::MAX);
        }
        true
    }
}
