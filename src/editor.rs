//! Editor page: store, gesture controller and viewport wired together.
//!
//! The host forwards raw input here. Screen positions are converted to slide
//! coordinates through the `Viewport` before the gesture controller sees
//! them, and finished gestures are handed to the store. Whenever the active
//! slide changes, by any route, the selection and open gesture are reset.
//!
//! Debounced edits are saved only when the host calls `tick` (on each frame
//! or from a timer) or awaits `settle`/`close`.

#[cfg(test)]
#[path = "editor_test.rs"]
mod editor_test;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::api::PresentationApi;
use crate::error::StoreError;
use crate::geometry::{Point, Rect, Viewport};
use crate::gesture::{GestureController, Key};
use crate::model::{BackgroundPatch, ElementId, ElementType, PartialElement, PresentationId, SlideId};
use crate::notify::Notifier;
use crate::store::PresentationStore;
use crate::surface::{self, SlideFrame};

pub struct Editor {
    store: PresentationStore,
    gesture: GestureController,
    viewport: Viewport,
    /// Slide the current selection belongs to.
    shown_slide: Option<SlideId>,
}

impl Editor {
    #[must_use]
    pub fn new(api: Arc<dyn PresentationApi>, notifier: Arc<dyn Notifier>, debounce: Duration) -> Self {
        Self {
            store: PresentationStore::new(api, notifier, debounce),
            gesture: GestureController::new(),
            viewport: Viewport::default(),
            shown_slide: None,
        }
    }

    #[must_use]
    pub fn store(&self) -> &PresentationStore {
        &self.store
    }

    #[must_use]
    pub fn gesture(&self) -> &GestureController {
        &self.gesture
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Render model for the active slide.
    #[must_use]
    pub fn frame(&self) -> Option<SlideFrame> {
        self.store.active_slide().map(|slide| surface::compose(slide, &self.gesture))
    }

    /// The host container was resized.
    pub fn set_container_size(&mut self, width: f64, height: f64) {
        self.viewport = Viewport::fit(width, height);
    }

    // --- Presentation and slides ---

    /// # Errors
    ///
    /// See [`PresentationStore::load`].
    pub async fn load(&mut self, id: PresentationId) -> Result<(), StoreError> {
        let result = self.store.load(id).await;
        self.sync_selection();
        result
    }

    pub fn select_slide(&mut self, id: SlideId) -> bool {
        let found = self.store.select_slide(id);
        self.sync_selection();
        found
    }

    /// # Errors
    ///
    /// See [`PresentationStore::add_slide`].
    pub async fn add_slide(&mut self) -> Result<Option<SlideId>, StoreError> {
        let result = self.store.add_slide().await;
        self.sync_selection();
        result
    }

    /// # Errors
    ///
    /// See [`PresentationStore::delete_slide`].
    pub async fn delete_slide(&mut self, id: SlideId) -> Result<(), StoreError> {
        let result = self.store.delete_slide(id).await;
        self.sync_selection();
        result
    }

    /// # Errors
    ///
    /// See [`PresentationStore::reorder_slides`].
    pub async fn reorder_slides(&mut self, order: &[SlideId]) -> Result<(), StoreError> {
        let result = self.store.reorder_slides(order).await;
        self.sync_selection();
        result
    }

    /// # Errors
    ///
    /// See [`PresentationStore::rename_presentation`].
    pub async fn rename(&mut self, title: &str) -> Result<(), StoreError> {
        self.store.rename_presentation(title).await
    }

    /// Live preview while a picker is being dragged. Nothing is saved.
    pub fn preview_background(&mut self, slide: SlideId, patch: &BackgroundPatch) {
        self.store.update_slide_background_local(slide, patch);
    }

    /// # Errors
    ///
    /// See [`PresentationStore::update_slide_background`].
    pub async fn set_background(&mut self, slide: SlideId, patch: &BackgroundPatch) -> Result<(), StoreError> {
        self.store.update_slide_background(slide, patch).await
    }

    // --- Elements ---

    /// # Errors
    ///
    /// See [`PresentationStore::add_element`].
    pub async fn add_element(
        &mut self,
        element_type: ElementType,
        content: Option<String>,
    ) -> Result<Option<ElementId>, StoreError> {
        self.store.add_element(element_type, content).await
    }

    /// Replace a text body. Saved after typing pauses.
    pub fn edit_text(&mut self, id: ElementId, text: impl Into<String>) {
        self.store.update_elements(HashMap::from([(id, PartialElement::content(text))]), false);
    }

    /// Toggle playback flags. Saved right away.
    pub fn set_media_flags(&mut self, id: ElementId, autoplay: Option<bool>, muted: Option<bool>) {
        let partial = PartialElement { autoplay, muted, ..PartialElement::default() };
        self.store.update_element(id, partial);
    }

    /// Move elements to explicit positions and save right away.
    pub fn move_elements(&mut self, positions: HashMap<ElementId, Point>) {
        let writes = positions.into_iter().map(|(id, p)| (id, PartialElement::position(p))).collect();
        self.store.update_elements(writes, true);
    }

    // --- Pointer input ---

    pub fn click_element(&mut self, id: ElementId, additive: bool) {
        self.gesture.click(id, additive);
    }

    /// Press on empty canvas at a screen position.
    pub fn pointer_down_canvas(&mut self, screen: Point) {
        let at = self.viewport.screen_to_slide(screen);
        self.gesture.pointer_down_canvas(at);
    }

    pub fn pointer_move(&mut self, screen: Point) {
        let at = self.viewport.screen_to_slide(screen);
        self.gesture.pointer_move(at);
    }

    pub fn pointer_up(&mut self) {
        let elements = self.store.active_slide().map_or(&[][..], |s| s.elements.as_slice());
        self.gesture.pointer_up(elements);
    }

    pub fn begin_drag(&mut self, id: ElementId) {
        let elements = self.store.active_slide().map_or(&[][..], |s| s.elements.as_slice());
        self.gesture.begin_drag(id, elements);
    }

    /// The host moved the grabbed element's top-left corner to `position`
    /// (slide units).
    pub fn drag_to(&mut self, position: Point) {
        self.gesture.drag_to(position);
    }

    /// Release a drag, saving every moved element right away.
    pub fn end_drag(&mut self) {
        if let Some(writes) = self.gesture.end_drag() {
            debug!(count = writes.len(), "drag committed");
            self.store.update_elements(writes, true);
        }
    }

    /// Start a resize. Only selected elements have handles; returns `false`
    /// for anything else.
    pub fn begin_resize(&mut self, id: ElementId) -> bool {
        if !self.gesture.is_selected(&id) {
            return false;
        }
        self.gesture.begin_resize(id);
        true
    }

    pub fn resize_to(&mut self, bounds: Rect) {
        self.gesture.resize_to(bounds);
    }

    /// Release a resize, saving the new bounds right away.
    pub fn end_resize(&mut self) {
        if let Some((id, write)) = self.gesture.end_resize() {
            debug!(element_id = %id, "resize committed");
            self.store.update_element(id, write);
        }
    }

    /// Abandon the open gesture.
    pub fn cancel_gesture(&mut self) {
        self.gesture.cancel();
    }

    /// Keyboard input. Delete/Backspace outside a text field deletes the
    /// selection; each deletion reports its own failure.
    pub async fn key_down(&mut self, key: &Key, in_text_input: bool) {
        for id in self.gesture.key_down(key, in_text_input) {
            if let Err(e) = self.store.delete_element(id).await {
                debug!(element_id = %id, error = %e, "keyboard delete failed");
            }
        }
    }

    // --- Persistence ---

    /// Drive the debounce window. Returns `true` when a batch was released.
    ///
    /// Must be called periodically: a host that never ticks holds deferred
    /// edits until `settle` or `close`.
    pub fn tick(&mut self) -> bool {
        self.store.flush_due()
    }

    /// Wait until every edit is saved.
    pub async fn settle(&mut self) {
        self.store.settle().await;
    }

    /// Tear down: drop any open gesture, then flush and close the store.
    pub async fn close(&mut self) {
        self.gesture.cancel();
        self.store.close().await;
    }

    fn sync_selection(&mut self) {
        let current = self.store.active_slide_id();
        if current != self.shown_slide {
            debug!(from = ?self.shown_slide, to = ?current, "active slide changed; selection reset");
            self.gesture.reset_for_slide_change();
            self.shown_slide = current;
        }
    }
}
