//! Presentation store: the single owner of presentation state.
//!
//! DESIGN
//! ======
//! `PresentationStore` holds the in-memory mirror of one presentation and is
//! the only code that mutates it. Every operation follows one of three
//! disciplines:
//!
//! - **Confirm, then apply** (load, add/delete slide, add/delete element):
//!   local state changes only after the service accepts the request.
//! - **Optimistic with rollback** (reorder, background, rename): the change
//!   is applied immediately, the prior presentation is snapshotted, and the
//!   snapshot is restored if the service rejects the change. All three go
//!   through `optimistic` so rollback semantics cannot drift apart.
//! - **Fire-and-forget element writes** (`update_elements`): local state is
//!   merged synchronously; persistence is spawned onto a `JoinSet`, either
//!   one task per element (immediate) or one task per released debounce
//!   batch (deferred). Dropping the store detaches these tasks rather than
//!   aborting them, so a write already issued always reaches the service.
//!   Only edits still waiting in the debounce window are lost.
//!
//! Deferred edits are released by `flush_due`, which the host must call
//! periodically (the `Editor` exposes it as `tick`). Nothing else watches
//! the window: without polling, deferred edits wait until `settle` or
//! `close`.
//!
//! Operations take `&mut self`, so no other mutation can run between a
//! snapshot and its rollback.
//!
//! ERROR HANDLING
//! ==============
//! Failures are reported to the `Notifier` before the `Err` is returned.
//! Element write failures are reported per write and never roll back
//! sibling writes.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::task::{JoinError, JoinSet};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::api::{ApiError, PresentationApi};
use crate::debounce::{Debouncer, WindowState};
use crate::error::StoreError;
use crate::model::{
    BackgroundPatch, ElementId, ElementType, NewElement, PartialElement, Presentation, PresentationId, Slide, SlideId,
};
use crate::notify::{Notifier, Severity};

/// Which kind of spawned write finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteKind {
    Immediate,
    Batch,
}

/// Background fields as last confirmed by the service.
#[derive(Debug, Clone)]
struct ConfirmedBackground {
    color: String,
    image: Option<String>,
}

pub struct PresentationStore {
    api: Arc<dyn PresentationApi>,
    notifier: Arc<dyn Notifier>,
    presentation: Option<Presentation>,
    active_slide: Option<SlideId>,
    pending: Debouncer<ElementId, PartialElement>,
    writes: JoinSet<WriteKind>,
    /// Slides with a local-only background preview, keyed to what the
    /// service last confirmed.
    previews: HashMap<SlideId, ConfirmedBackground>,
}

impl PresentationStore {
    #[must_use]
    pub fn new(api: Arc<dyn PresentationApi>, notifier: Arc<dyn Notifier>, debounce: Duration) -> Self {
        Self {
            api,
            notifier,
            presentation: None,
            active_slide: None,
            pending: Debouncer::new(debounce),
            writes: JoinSet::new(),
            previews: HashMap::new(),
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn presentation(&self) -> Option<&Presentation> {
        self.presentation.as_ref()
    }

    #[must_use]
    pub fn active_slide_id(&self) -> Option<SlideId> {
        self.active_slide
    }

    #[must_use]
    pub fn active_slide(&self) -> Option<&Slide> {
        let id = self.active_slide?;
        self.presentation.as_ref()?.slide(id)
    }

    /// Deferred edits waiting for the debounce window.
    #[must_use]
    pub fn pending_updates(&self) -> &HashMap<ElementId, PartialElement> {
        self.pending.pending()
    }

    #[must_use]
    pub fn window_state(&self) -> WindowState {
        self.pending.state()
    }

    /// When the pending batch will be released, if anything is pending.
    #[must_use]
    pub fn next_flush_at(&self) -> Option<Instant> {
        self.pending.deadline()
    }

    /// Number of element writes spawned but not yet reaped.
    #[must_use]
    pub fn writes_in_flight(&self) -> usize {
        self.writes.len()
    }

    // --- Presentation ---

    /// Fetch a presentation and make its first slide active.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Fetch` if the service call fails; prior state is kept.
    pub async fn load(&mut self, id: PresentationId) -> Result<(), StoreError> {
        match self.api.fetch_presentation(id).await {
            Ok(presentation) => {
                info!(presentation_id = %id, slides = presentation.slides.len(), "presentation loaded");
                self.active_slide = presentation.slides.first().map(|s| s.id);
                self.presentation = Some(presentation);
                self.previews.clear();
                Ok(())
            }
            Err(e) => Err(self.report(StoreError::Fetch(e), "Failed to load presentation")),
        }
    }

    /// Rename the presentation.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Update` if the service rejects the title; the old
    /// title is restored.
    pub async fn rename_presentation(&mut self, title: &str) -> Result<(), StoreError> {
        let Some(id) = self.presentation.as_ref().map(|p| p.id) else {
            debug!("rename ignored: no presentation loaded");
            return Ok(());
        };
        let api = Arc::clone(&self.api);
        let owned = title.to_owned();
        let persist = async move { api.rename_presentation(id, &owned).await };
        let new_title = title.to_owned();
        match self.optimistic(|p| p.title = new_title, persist).await {
            Ok(()) => {
                info!(presentation_id = %id, "presentation renamed");
                self.notifier.notify(Severity::Success, "Presentation renamed");
                Ok(())
            }
            Err(e) => Err(self.report(StoreError::Update(e), "Failed to rename presentation")),
        }
    }

    // --- Slides ---

    /// Make `id` the active slide. Returns `false` if no such slide exists.
    pub fn select_slide(&mut self, id: SlideId) -> bool {
        let exists = self.presentation.as_ref().is_some_and(|p| p.slide(id).is_some());
        if exists {
            self.active_slide = Some(id);
        }
        exists
    }

    /// Append a new slide and make it active.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Create` if the service rejects the request.
    pub async fn add_slide(&mut self) -> Result<Option<SlideId>, StoreError> {
        let Some(presentation_id) = self.presentation.as_ref().map(|p| p.id) else {
            debug!("add slide ignored: no presentation loaded");
            return Ok(None);
        };
        match self.api.create_slide(presentation_id).await {
            Ok(slide) => {
                let id = slide.id;
                if let Some(presentation) = self.presentation.as_mut() {
                    presentation.slides.push(slide);
                }
                self.active_slide = Some(id);
                info!(slide_id = id, "slide added");
                self.notifier.notify(Severity::Success, "Slide added");
                Ok(Some(id))
            }
            Err(e) => Err(self.report(StoreError::Create(e), "Failed to add slide")),
        }
    }

    /// Delete a slide. If it was active, the slide before it (or the new
    /// first slide) becomes active.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Delete` if the service rejects the request; state
    /// is unchanged.
    pub async fn delete_slide(&mut self, id: SlideId) -> Result<(), StoreError> {
        if self.presentation.as_ref().and_then(|p| p.slide_index(id)).is_none() {
            debug!(slide_id = id, "delete slide ignored: unknown slide");
            return Ok(());
        }
        if let Err(e) = self.api.delete_slide(id).await {
            return Err(self.report(StoreError::Delete(e), "Failed to delete slide"));
        }
        if let Some(presentation) = self.presentation.as_mut() {
            if let Some(index) = presentation.slide_index(id) {
                presentation.slides.remove(index);
                if self.active_slide == Some(id) {
                    self.active_slide = presentation.slides.get(index.saturating_sub(1)).map(|s| s.id);
                }
            }
        }
        self.previews.remove(&id);
        info!(slide_id = id, "slide deleted");
        self.notifier.notify(Severity::Success, "Slide deleted");
        Ok(())
    }

    /// Apply a new slide order locally, then persist it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidOrder` (without calling the service) if
    /// `order` is not a permutation of the current slides, or
    /// `StoreError::Reorder` if the service rejects it; the previous order is
    /// restored.
    pub async fn reorder_slides(&mut self, order: &[SlideId]) -> Result<(), StoreError> {
        let Some(presentation) = self.presentation.as_ref() else {
            debug!("reorder ignored: no presentation loaded");
            return Ok(());
        };
        let presentation_id = presentation.id;
        if !presentation.is_permutation(order) {
            return Err(self.report(StoreError::InvalidOrder, "Failed to save slide order"));
        }
        let api = Arc::clone(&self.api);
        let ids = order.to_vec();
        let persist = async move { api.reorder_slides(presentation_id, &ids).await };
        let new_order = order.to_vec();
        let apply = move |p: &mut Presentation| {
            p.reorder(&new_order);
        };
        match self.optimistic(apply, persist).await {
            Ok(()) => {
                debug!(count = order.len(), "slide order saved");
                Ok(())
            }
            Err(e) => Err(self.report(StoreError::Reorder(e), "Failed to save slide order")),
        }
    }

    /// Preview a background change locally. Nothing is sent.
    pub fn update_slide_background_local(&mut self, slide_id: SlideId, patch: &BackgroundPatch) {
        let Some(slide) = self.presentation.as_mut().and_then(|p| p.slide_mut(slide_id)) else {
            return;
        };
        self.previews.entry(slide_id).or_insert_with(|| ConfirmedBackground {
            color: slide.background_color.clone(),
            image: slide.background_image.clone(),
        });
        slide.apply_background(patch);
    }

    /// Apply a background change locally, then persist it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Update` if the service rejects it; slides are
    /// restored to their state before this call.
    pub async fn update_slide_background(
        &mut self,
        slide_id: SlideId,
        patch: &BackgroundPatch,
    ) -> Result<(), StoreError> {
        if self.presentation.as_ref().and_then(|p| p.slide(slide_id)).is_none() {
            debug!(slide_id, "background update ignored: unknown slide");
            return Ok(());
        }
        let api = Arc::clone(&self.api);
        let body = patch.clone();
        let persist = async move { api.update_slide(slide_id, &body).await };
        let applied = patch.clone();
        let apply = move |p: &mut Presentation| {
            if let Some(slide) = p.slide_mut(slide_id) {
                slide.apply_background(&applied);
            }
        };
        match self.optimistic(apply, persist).await {
            Ok(()) => {
                self.previews.remove(&slide_id);
                debug!(slide_id, "background saved");
                Ok(())
            }
            Err(e) => Err(self.report(StoreError::Update(e), "Failed to update background")),
        }
    }

    // --- Elements ---

    /// Create an element of `element_type` on the active slide.
    ///
    /// Returns `Ok(None)` when no slide is active.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Create` if the service rejects the element.
    pub async fn add_element(
        &mut self,
        element_type: ElementType,
        content: Option<String>,
    ) -> Result<Option<ElementId>, StoreError> {
        let Some(slide_id) = self.active_slide else {
            debug!("add element ignored: no active slide");
            return Ok(None);
        };
        let payload = NewElement::for_type(element_type, content);
        match self.api.create_element(slide_id, &payload).await {
            Ok(element) => {
                let id = element.id;
                if let Some(slide) = self.presentation.as_mut().and_then(|p| p.slide_mut(slide_id)) {
                    slide.elements.push(element);
                }
                info!(slide_id, element_id = %id, ?element_type, "element added");
                Ok(Some(id))
            }
            Err(e) => Err(self.report(StoreError::Create(e), "Failed to add element")),
        }
    }

    /// Delete an element from the active slide once the service confirms.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Delete` if the service rejects the request; the
    /// element stays.
    pub async fn delete_element(&mut self, id: ElementId) -> Result<(), StoreError> {
        let Some(slide_id) = self.active_slide else {
            debug!(element_id = %id, "delete element ignored: no active slide");
            return Ok(());
        };
        if let Err(e) = self.api.delete_element(id).await {
            return Err(self.report(StoreError::Delete(e), "Failed to delete element"));
        }
        if let Some(slide) = self.presentation.as_mut().and_then(|p| p.slide_mut(slide_id)) {
            slide.elements.retain(|e| e.id != id);
        }
        // Nothing left to save for a deleted element.
        self.pending.amend(&id, |_| false);
        info!(slide_id, element_id = %id, "element deleted");
        Ok(())
    }

    /// Update one element and persist it immediately.
    pub fn update_element(&mut self, id: ElementId, partial: PartialElement) {
        self.update_elements(HashMap::from([(id, partial)]), true);
    }

    /// Merge `updates` into the active slide and persist them.
    ///
    /// With `immediate`, each entry is written by its own task and failures
    /// are reported per entry. Otherwise entries join the debounce window and
    /// are written together once edits have been quiet for the window.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn update_elements(&mut self, updates: HashMap<ElementId, PartialElement>, immediate: bool) {
        let Some(slide_id) = self.active_slide else {
            debug!("element update ignored: no active slide");
            return;
        };
        self.reap();

        let updates: Vec<(ElementId, PartialElement)> = updates.into_iter().filter(|(_, p)| !p.is_empty()).collect();
        if let Some(slide) = self.presentation.as_mut().and_then(|p| p.slide_mut(slide_id)) {
            for (id, partial) in &updates {
                if let Some(element) = slide.element_mut(id) {
                    element.apply(partial);
                }
            }
        }

        if immediate {
            for (id, partial) in updates {
                // A deferred value for the same field is older than this one.
                self.pending.amend(&id, |queued| {
                    queued.clear_fields_of(&partial);
                    !queued.is_empty()
                });
                self.spawn_immediate(id, partial);
            }
        } else {
            let now = Instant::now();
            for (id, partial) in updates {
                self.pending.push(id, partial, now);
            }
            debug!(pending = self.pending.pending().len(), "element edits deferred");
        }
    }

    // --- Persistence driving ---

    /// Release the pending batch if its window has elapsed. Returns `true`
    /// when a batch was spawned.
    ///
    /// This is the only thing that releases a batch on time; call it from
    /// the host's frame or timer loop.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn flush_due(&mut self) -> bool {
        self.reap();
        match self.pending.take_due(Instant::now()) {
            Some(batch) => {
                self.spawn_batch(batch);
                true
            }
            None => false,
        }
    }

    /// Wait out the debounce window, flush, and wait for every write.
    pub async fn settle(&mut self) {
        while let Some(deadline) = self.pending.deadline() {
            tokio::time::sleep_until(deadline).await;
            self.flush_due();
        }
        while let Some(joined) = self.writes.join_next().await {
            self.record(joined);
        }
    }

    /// Tear down: flush pending edits without waiting for the window, wait
    /// for every write, and drop unconfirmed background previews.
    pub async fn close(&mut self) {
        if let Some(batch) = self.pending.take_now() {
            debug!(count = batch.len(), "flushing pending edits on close");
            self.spawn_batch(batch);
        }
        while let Some(joined) = self.writes.join_next().await {
            self.record(joined);
        }
        let previews = std::mem::take(&mut self.previews);
        if let Some(presentation) = self.presentation.as_mut() {
            for (slide_id, confirmed) in previews {
                if let Some(slide) = presentation.slide_mut(slide_id) {
                    debug!(slide_id, "discarding unconfirmed background preview");
                    slide.background_color = confirmed.color;
                    slide.background_image = confirmed.image;
                }
            }
        }
    }

    // --- Internals ---

    /// Snapshot, apply, persist; restore the snapshot if persisting fails.
    async fn optimistic<F>(&mut self, apply: impl FnOnce(&mut Presentation), persist: F) -> Result<(), ApiError>
    where
        F: Future<Output = Result<(), ApiError>>,
    {
        let Some(presentation) = self.presentation.as_mut() else {
            return Ok(());
        };
        let snapshot = presentation.clone();
        apply(presentation);
        self.rederive_active();

        match persist.await {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(error = %e, "optimistic update rejected; rolling back");
                self.presentation = Some(snapshot);
                self.rederive_active();
                Err(e)
            }
        }
    }

    /// Keep the active slide pointing at a member of the slide list.
    fn rederive_active(&mut self) {
        let still_present = match (self.active_slide, self.presentation.as_ref()) {
            (Some(id), Some(p)) => p.slide(id).is_some(),
            _ => false,
        };
        if !still_present {
            self.active_slide = None;
        }
    }

    fn spawn_immediate(&mut self, id: ElementId, partial: PartialElement) {
        let api = Arc::clone(&self.api);
        let notifier = Arc::clone(&self.notifier);
        self.writes.spawn(async move {
            match api.update_element(id, &partial).await {
                Ok(()) => debug!(element_id = %id, "element saved"),
                Err(source) => {
                    let err = StoreError::Persistence { id, source };
                    warn!(error = %err, code = err.error_code(), "element save failed");
                    notifier.notify(Severity::Error, "Failed to save element");
                }
            }
            WriteKind::Immediate
        });
    }

    fn spawn_batch(&mut self, batch: HashMap<ElementId, PartialElement>) {
        let api = Arc::clone(&self.api);
        let notifier = Arc::clone(&self.notifier);
        debug!(count = batch.len(), "flushing deferred element edits");
        let writes: Vec<_> = batch
            .into_iter()
            .map(|(id, partial)| {
                let api = Arc::clone(&api);
                async move { (id, api.update_element(id, &partial).await) }
            })
            .collect();
        self.writes.spawn(async move {
            let mut failed = 0usize;
            for (id, result) in join_all(writes).await {
                if let Err(source) = result {
                    failed += 1;
                    let err = StoreError::Persistence { id, source };
                    warn!(error = %err, code = err.error_code(), "deferred element save failed");
                }
            }
            if failed > 0 {
                notifier.notify(Severity::Error, "Failed to save elements");
            }
            WriteKind::Batch
        });
    }

    /// Collect finished writes without waiting.
    fn reap(&mut self) {
        while let Some(joined) = self.writes.try_join_next() {
            self.record(joined);
        }
    }

    fn record(&mut self, joined: Result<WriteKind, JoinError>) {
        match joined {
            Ok(WriteKind::Batch) => self.pending.flush_finished(),
            Ok(WriteKind::Immediate) => {}
            Err(e) => warn!(error = %e, "element write task did not complete"),
        }
    }

    /// Log and notify a failure, preferring the service's own message.
    fn report(&self, err: StoreError, fallback: &str) -> StoreError {
        warn!(error = %err, code = err.error_code(), "store operation failed");
        let message = err.api_error().and_then(ApiError::server_message).unwrap_or(fallback);
        self.notifier.notify(Severity::Error, message);
        err
    }
}

impl Drop for PresentationStore {
    fn drop(&mut self) {
        if !self.writes.is_empty() {
            debug!(count = self.writes.len(), "store dropped; detaching element writes");
            self.writes.detach_all();
        }
    }
}
