//! Render model for one slide at one instant.
//!
//! `compose` is pure: it reads a slide and the gesture controller and
//! produces a `SlideFrame` the host can draw. Draft geometry from an open
//! drag or resize replaces the stored geometry, so the frame shows what the
//! user is doing before anything is saved. Hit-testing stays with the host.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use crate::geometry::Rect;
use crate::gesture::GestureController;
use crate::model::{Background, ElementId, ElementType, Slide, SlideElement};

const YOUTUBE_EMBED_BASE: &str = "https://www.youtube.com/embed/";
const YOUTUBE_WATCH_BASE: &str = "https://www.youtube.com/watch?v=";

/// What an element displays, resolved from its `content`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    Text(String),
    Image(String),
    YouTube { embed_url: String, watch_url: String },
    Video(String),
    Audio(String),
    /// Media element with no content yet.
    Empty,
}

impl MediaSource {
    #[must_use]
    pub fn resolve(element: &SlideElement) -> Self {
        let content = element.content.as_deref().map(str::trim).filter(|c| !c.is_empty());
        match (element.element_type, content) {
            (ElementType::Text, text) => Self::Text(text.map(str::to_owned).unwrap_or_default()),
            (_, None) => Self::Empty,
            (ElementType::Image, Some(url)) => Self::Image(url.to_owned()),
            (ElementType::YoutubeVideo, Some(video_id)) => Self::YouTube {
                embed_url: format!("{YOUTUBE_EMBED_BASE}{video_id}"),
                watch_url: format!("{YOUTUBE_WATCH_BASE}{video_id}"),
            },
            (ElementType::UploadedVideo, Some(url)) => Self::Video(url.to_owned()),
            (ElementType::Audio, Some(url)) => Self::Audio(url.to_owned()),
        }
    }
}

/// One element as it should be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedElement {
    pub id: ElementId,
    pub element_type: ElementType,
    /// Draft geometry if a gesture is moving or resizing it, else stored.
    pub rect: Rect,
    pub selected: bool,
    /// Drawn at draft geometry rather than stored geometry.
    pub is_draft: bool,
    pub media: MediaSource,
    pub font_size: u32,
    pub autoplay: bool,
    pub muted: bool,
    /// Whether embedded players receive pointer input. Selected players
    /// pass input through to the canvas so they can be dragged.
    pub interactive: bool,
}

/// A slide ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideFrame {
    pub background: Background,
    /// Elements in draw order.
    pub elements: Vec<RenderedElement>,
    /// Open marquee, if any.
    pub marquee: Option<Rect>,
}

#[must_use]
pub fn compose(slide: &Slide, gesture: &GestureController) -> SlideFrame {
    let elements = slide
        .elements
        .iter()
        .map(|element| {
            let draft = gesture.draft_rect(element);
            let selected = gesture.is_selected(&element.id);
            RenderedElement {
                id: element.id,
                element_type: element.element_type,
                rect: draft.unwrap_or_else(|| element.rect()),
                selected,
                is_draft: draft.is_some(),
                media: MediaSource::resolve(element),
                font_size: element.font_size,
                autoplay: element.autoplay,
                muted: element.muted,
                interactive: !(selected && element.element_type.is_playable()),
            }
        })
        .collect();

    SlideFrame { background: slide.background(), elements, marquee: gesture.marquee_rect() }
}
