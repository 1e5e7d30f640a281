//! Shared fixtures for unit tests: a scriptable service and a notifier that
//! remembers what it was told.

use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use crate::api::{ApiError, PresentationApi};
use crate::model::{
    BackgroundPatch, ElementId, ElementType, NewElement, PartialElement, Presentation, PresentationId, Slide,
    SlideElement, SlideId, DEFAULT_BACKGROUND_COLOR,
};
use crate::notify::{Notifier, Severity};

// =============================================================================
// MOCK SERVICE
// =============================================================================

/// A recorded service call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Fetch(PresentationId),
    Rename(String),
    CreateSlide,
    DeleteSlide(SlideId),
    Reorder(Vec<SlideId>),
    UpdateSlide(SlideId, BackgroundPatch),
    CreateElement(SlideId, NewElement),
    UpdateElement(ElementId, PartialElement),
    DeleteElement(ElementId),
}

/// Operations that can be scripted to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Fetch,
    Rename,
    CreateSlide,
    DeleteSlide,
    Reorder,
    UpdateSlide,
    CreateElement,
    UpdateElement,
    DeleteElement,
}

pub struct MockApi {
    presentation: Mutex<Presentation>,
    calls: Mutex<Vec<Call>>,
    failing: Mutex<HashSet<Op>>,
    failing_elements: Mutex<HashSet<ElementId>>,
    server_message: Mutex<Option<String>>,
    next_slide_id: AtomicI64,
}

impl MockApi {
    pub fn new(presentation: Presentation) -> Arc<Self> {
        let next = presentation.slides.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        Arc::new(Self {
            presentation: Mutex::new(presentation),
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
            failing_elements: Mutex::new(HashSet::new()),
            server_message: Mutex::new(None),
            next_slide_id: AtomicI64::new(next),
        })
    }

    pub fn fail(&self, op: Op) {
        self.failing.lock().unwrap().insert(op);
    }

    pub fn succeed(&self, op: Op) {
        self.failing.lock().unwrap().remove(&op);
    }

    /// Fail `update_element` for this element only.
    pub fn fail_element(&self, id: ElementId) {
        self.failing_elements.lock().unwrap().insert(id);
    }

    /// Message carried in the body of scripted failures.
    pub fn set_server_message(&self, message: &str) {
        *self.server_message.lock().unwrap() = Some(message.to_owned());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn element_updates(&self) -> Vec<(ElementId, PartialElement)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::UpdateElement(id, partial) => Some((id, partial)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, op: Op) -> Result<(), ApiError> {
        if self.failing.lock().unwrap().contains(&op) {
            return Err(ApiError::Status { status: 500, message: self.server_message.lock().unwrap().clone() });
        }
        Ok(())
    }
}

#[async_trait]
impl PresentationApi for MockApi {
    async fn fetch_presentation(&self, id: PresentationId) -> Result<Presentation, ApiError> {
        self.record(Call::Fetch(id));
        self.check(Op::Fetch)?;
        Ok(self.presentation.lock().unwrap().clone())
    }

    async fn rename_presentation(&self, _id: PresentationId, title: &str) -> Result<(), ApiError> {
        self.record(Call::Rename(title.to_owned()));
        self.check(Op::Rename)
    }

    async fn create_slide(&self, _presentation: PresentationId) -> Result<Slide, ApiError> {
        self.record(Call::CreateSlide);
        self.check(Op::CreateSlide)?;
        let id = self.next_slide_id.fetch_add(1, Ordering::SeqCst);
        Ok(slide(id, u32::try_from(id).unwrap(), Vec::new()))
    }

    async fn delete_slide(&self, slide: SlideId) -> Result<(), ApiError> {
        self.record(Call::DeleteSlide(slide));
        self.check(Op::DeleteSlide)
    }

    async fn reorder_slides(&self, _presentation: PresentationId, slide_ids: &[SlideId]) -> Result<(), ApiError> {
        self.record(Call::Reorder(slide_ids.to_vec()));
        self.check(Op::Reorder)
    }

    async fn update_slide(&self, slide: SlideId, patch: &BackgroundPatch) -> Result<(), ApiError> {
        self.record(Call::UpdateSlide(slide, patch.clone()));
        self.check(Op::UpdateSlide)
    }

    async fn create_element(&self, slide: SlideId, element: &NewElement) -> Result<SlideElement, ApiError> {
        self.record(Call::CreateElement(slide, element.clone()));
        self.check(Op::CreateElement)?;
        Ok(SlideElement {
            id: Uuid::new_v4(),
            element_type: element.element_type,
            pos_x: 100.0,
            pos_y: 100.0,
            width: element.width,
            height: element.height,
            content: element.content.clone(),
            font_size: 24,
            autoplay: false,
            muted: false,
            thumbnail_url: None,
        })
    }

    async fn update_element(&self, id: ElementId, partial: &PartialElement) -> Result<(), ApiError> {
        self.record(Call::UpdateElement(id, partial.clone()));
        self.check(Op::UpdateElement)?;
        if self.failing_elements.lock().unwrap().contains(&id) {
            return Err(ApiError::Status { status: 500, message: None });
        }
        Ok(())
    }

    async fn delete_element(&self, id: ElementId) -> Result<(), ApiError> {
        self.record(Call::DeleteElement(id));
        self.check(Op::DeleteElement)
    }
}

// =============================================================================
// NOTIFIER
// =============================================================================

#[derive(Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<(Severity, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn messages(&self) -> Vec<(Severity, String)> {
        self.seen.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages().into_iter().filter(|(s, _)| *s == Severity::Error).map(|(_, m)| m).collect()
    }

    pub fn successes(&self) -> Vec<String> {
        self.messages().into_iter().filter(|(s, _)| *s == Severity::Success).map(|(_, m)| m).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        self.seen.lock().unwrap().push((severity, message.to_owned()));
    }
}

// =============================================================================
// FIXTURES
// =============================================================================

pub fn text_element(x: f64, y: f64, width: f64, height: f64) -> SlideElement {
    SlideElement {
        id: Uuid::new_v4(),
        element_type: ElementType::Text,
        pos_x: x,
        pos_y: y,
        width,
        height,
        content: Some("Hello".to_owned()),
        font_size: 24,
        autoplay: false,
        muted: false,
        thumbnail_url: None,
    }
}

pub fn slide(id: SlideId, number: u32, elements: Vec<SlideElement>) -> Slide {
    Slide {
        id,
        slide_number: number,
        background_color: DEFAULT_BACKGROUND_COLOR.to_owned(),
        background_image: None,
        elements,
    }
}

pub fn presentation(slides: Vec<Slide>) -> Presentation {
    Presentation { id: Uuid::new_v4(), title: "Quarterly review".to_owned(), slides }
}

/// Three empty slides with IDs 1, 2, 3.
pub fn three_slides() -> Presentation {
    presentation(vec![slide(1, 1, Vec::new()), slide(2, 2, Vec::new()), slide(3, 3, Vec::new())])
}
