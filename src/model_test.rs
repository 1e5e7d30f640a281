#![allow(clippy::float_cmp)]

use super::*;
use serde_json::json;

fn element_json() -> serde_json::Value {
    json!({
        "id": "6f1c2a9e-3b7d-4e0a-9c55-1d2e3f4a5b6c",
        "element_type": "YOUTUBE_VIDEO",
        "pos_x": 10.0,
        "pos_y": 20.5,
        "width": 400.0,
        "height": 225.0,
        "content": "dQw4w9WgXcQ",
        "thumbnailUrl": "https://img.youtube.com/vi/dQw4w9WgXcQ/0.jpg"
    })
}

fn slides(ids: &[SlideId]) -> Presentation {
    Presentation {
        id: Uuid::nil(),
        title: "Deck".into(),
        slides: ids
            .iter()
            .zip(1..)
            .map(|(id, n)| Slide {
                id: *id,
                slide_number: n,
                background_color: DEFAULT_BACKGROUND_COLOR.into(),
                background_image: None,
                elements: Vec::new(),
            })
            .collect(),
    }
}

// =============================================================
// ElementType
// =============================================================

#[test]
fn element_type_wire_names() {
    assert_eq!(serde_json::to_value(ElementType::YoutubeVideo).unwrap(), json!("YOUTUBE_VIDEO"));
    assert_eq!(serde_json::to_value(ElementType::UploadedVideo).unwrap(), json!("UPLOADED_VIDEO"));
    assert_eq!(ElementType::parse("audio"), Some(ElementType::Audio));
    assert_eq!(ElementType::parse("VIDEO"), None);
}

#[test]
fn default_sizes() {
    assert_eq!(ElementType::Text.default_size(), (400.0, 150.0));
    for kind in [ElementType::Image, ElementType::YoutubeVideo, ElementType::UploadedVideo, ElementType::Audio] {
        assert_eq!(kind.default_size(), (400.0, 225.0));
    }
}

#[test]
fn only_media_is_playable() {
    assert!(!ElementType::Text.is_playable());
    assert!(!ElementType::Image.is_playable());
    assert!(ElementType::Audio.is_playable());
}

// =============================================================
// SlideElement
// =============================================================

#[test]
fn element_deserializes_with_defaults() {
    let el: SlideElement = serde_json::from_value(element_json()).unwrap();
    assert_eq!(el.element_type, ElementType::YoutubeVideo);
    assert_eq!(el.font_size, 24);
    assert!(!el.autoplay);
    assert!(!el.muted);
    assert_eq!(el.thumbnail_url.as_deref(), Some("https://img.youtube.com/vi/dQw4w9WgXcQ/0.jpg"));
    assert_eq!(el.rect(), Rect::new(10.0, 20.5, 400.0, 225.0));
}

#[test]
fn apply_touches_only_present_fields() {
    let mut el: SlideElement = serde_json::from_value(element_json()).unwrap();
    el.apply(&PartialElement { width: Some(500.0), muted: Some(true), ..PartialElement::default() });
    assert_eq!(el.width, 500.0);
    assert!(el.muted);
    assert_eq!(el.height, 225.0);
    assert_eq!(el.content.as_deref(), Some("dQw4w9WgXcQ"));
}

// =============================================================
// PartialElement
// =============================================================

#[test]
fn partial_serializes_only_present_fields() {
    let partial = PartialElement::position(Point::new(1.0, 2.0));
    assert_eq!(serde_json::to_value(&partial).unwrap(), json!({ "pos_x": 1.0, "pos_y": 2.0 }));
    assert_eq!(serde_json::to_value(PartialElement::default()).unwrap(), json!({}));
}

#[test]
fn coalesce_is_field_wise_last_write_wins() {
    let mut older = PartialElement::content("old");
    older.pos_x = Some(5.0);
    let mut newer = PartialElement::content("new");
    newer.width = Some(300.0);
    older.coalesce(newer);
    assert_eq!(older.content.as_deref(), Some("new"));
    assert_eq!(older.pos_x, Some(5.0));
    assert_eq!(older.width, Some(300.0));
}

#[test]
fn clear_fields_of_removes_overlap() {
    let mut pending = PartialElement::bounds(Rect::new(1.0, 2.0, 3.0, 4.0));
    pending.content = Some("text".into());
    pending.clear_fields_of(&PartialElement::position(Point::new(0.0, 0.0)));
    assert_eq!(pending.pos_x, None);
    assert_eq!(pending.pos_y, None);
    assert_eq!(pending.width, Some(3.0));
    assert_eq!(pending.content.as_deref(), Some("text"));
    assert!(!pending.is_empty());
}

// =============================================================
// NewElement
// =============================================================

#[test]
fn new_text_gets_starter_body() {
    let payload = NewElement::for_type(ElementType::Text, None);
    assert_eq!(payload.content.as_deref(), Some(DEFAULT_TEXT_CONTENT));
    assert_eq!((payload.width, payload.height), (400.0, 150.0));
}

#[test]
fn new_media_keeps_supplied_content() {
    let payload = NewElement::for_type(ElementType::Image, Some("https://x/y.png".into()));
    assert_eq!(
        serde_json::to_value(&payload).unwrap(),
        json!({ "element_type": "IMAGE", "content": "https://x/y.png", "width": 400.0, "height": 225.0 })
    );
}

// =============================================================
// Background
// =============================================================

#[test]
fn background_patch_wire_shape() {
    assert_eq!(
        serde_json::to_value(BackgroundPatch::Color("#123456".into())).unwrap(),
        json!({ "background_color": "#123456" })
    );
    assert_eq!(serde_json::to_value(BackgroundPatch::Image(None)).unwrap(), json!({ "background_image": null }));
}

#[test]
fn color_and_image_are_exclusive() {
    let mut slide = slides(&[1]).slides.remove(0);
    slide.apply_background(&BackgroundPatch::Image(Some("bg.png".into())));
    assert_eq!(slide.background(), Background::Image("bg.png".into()));
    slide.apply_background(&BackgroundPatch::Color("#000000".into()));
    assert_eq!(slide.background(), Background::Color("#000000".into()));
    assert!(slide.background_image.is_none());
}

#[test]
fn removing_image_reveals_color() {
    let mut slide = slides(&[1]).slides.remove(0);
    slide.apply_background(&BackgroundPatch::Image(Some("bg.png".into())));
    slide.apply_background(&BackgroundPatch::Image(None));
    assert_eq!(slide.background(), Background::Color(DEFAULT_BACKGROUND_COLOR.into()));
}

// =============================================================
// Presentation::reorder
// =============================================================

#[test]
fn reorder_follows_order_and_renumbers() {
    let mut p = slides(&[10, 20, 30]);
    assert!(p.reorder(&[30, 10, 20]));
    assert_eq!(p.slide_ids(), vec![30, 10, 20]);
    assert_eq!(p.slides.iter().map(|s| s.slide_number).collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[test]
fn reorder_rejects_non_permutations() {
    let mut p = slides(&[10, 20, 30]);
    assert!(!p.reorder(&[10, 20]));
    assert!(!p.reorder(&[10, 20, 20]));
    assert!(!p.reorder(&[10, 20, 40]));
    assert_eq!(p.slide_ids(), vec![10, 20, 30]);
}

#[test]
fn presentation_deserializes_without_slides() {
    let p: Presentation = serde_json::from_value(json!({ "id": Uuid::nil(), "title": "Empty" })).unwrap();
    assert!(p.slides.is_empty());
}

#[test]
fn is_permutation_requires_every_slide_once() {
    let p = slides(&[10, 20, 30]);
    assert!(p.is_permutation(&[20, 30, 10]));
    assert!(!p.is_permutation(&[20, 30]));
    assert!(!p.is_permutation(&[20, 30, 30]));
    assert!(slides(&[]).is_permutation(&[]));
}
