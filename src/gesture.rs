//! Selection and gesture tracking for the slide canvas.
//!
//! `GestureController` turns pointer and keyboard input into selection
//! changes and draft geometry. It never touches the presentation: drafts
//! live inside the active `GestureState` variant and are handed back to the
//! caller as `PartialElement`s when the gesture ends. Ending or cancelling a
//! gesture always returns the controller to `Idle`, so drafts cannot outlive
//! the gesture that produced them.
//!
//! All positions are slide coordinates; screen conversion happens upstream.

#[cfg(test)]
#[path = "gesture_test.rs"]
mod gesture_test;

use std::collections::{HashMap, HashSet};

use crate::consts::{MIN_ELEMENT_HEIGHT, MIN_ELEMENT_WIDTH};
use crate::geometry::{Point, Rect};
use crate::model::{ElementId, PartialElement, SlideElement};

/// A keyboard key as reported by the host (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self.0.as_str(), "Delete" | "Backspace")
    }
}

/// The gesture in progress between pointer-down and pointer-up.
#[derive(Debug, Clone, Default)]
pub enum GestureState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Rubber-band selection started on empty canvas.
    Marquee {
        /// Press point.
        anchor: Point,
        /// Latest pointer position.
        current: Point,
    },
    /// One or more elements being moved together.
    Dragging {
        /// Element under the pointer; its displacement drives the group.
        grabbed: ElementId,
        /// Position of every dragged element at drag start.
        origins: HashMap<ElementId, Point>,
        /// Uncommitted positions. Empty until the first move.
        drafts: HashMap<ElementId, Point>,
    },
    /// A selected element being resized from one of its handles.
    Resizing {
        id: ElementId,
        /// Uncommitted bounds. `None` until the first resize event.
        draft: Option<Rect>,
    },
}

#[derive(Debug, Default)]
pub struct GestureController {
    selection: HashSet<ElementId>,
    state: GestureState,
}

impl GestureController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Queries ---

    #[must_use]
    pub fn selection(&self) -> &HashSet<ElementId> {
        &self.selection
    }

    #[must_use]
    pub fn is_selected(&self, id: &ElementId) -> bool {
        self.selection.contains(id)
    }

    #[must_use]
    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// Normalized marquee rectangle while a marquee is open.
    #[must_use]
    pub fn marquee_rect(&self) -> Option<Rect> {
        match self.state {
            GestureState::Marquee { anchor, current } => Some(Rect::from_corners(anchor, current)),
            _ => None,
        }
    }

    /// Draft positions of the open drag, if any.
    #[must_use]
    pub fn drafts(&self) -> Option<&HashMap<ElementId, Point>> {
        match &self.state {
            GestureState::Dragging { drafts, .. } => Some(drafts),
            _ => None,
        }
    }

    /// Where `element` should be drawn right now: its draft geometry during
    /// a drag or resize, otherwise `None`.
    #[must_use]
    pub fn draft_rect(&self, element: &SlideElement) -> Option<Rect> {
        match &self.state {
            GestureState::Dragging { drafts, .. } => drafts
                .get(&element.id)
                .map(|p| Rect::new(p.x, p.y, element.width, element.height)),
            GestureState::Resizing { id, draft } if *id == element.id => *draft,
            _ => None,
        }
    }

    // --- Selection ---

    /// Select `id`. With `additive`, toggle its membership instead.
    pub fn click(&mut self, id: ElementId, additive: bool) {
        if additive {
            if !self.selection.remove(&id) {
                self.selection.insert(id);
            }
        } else {
            self.selection.clear();
            self.selection.insert(id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Forget selection and any open gesture. Called whenever the active
    /// slide changes.
    pub fn reset_for_slide_change(&mut self) {
        self.selection.clear();
        self.state = GestureState::Idle;
    }

    /// Abandon the open gesture, discarding its drafts.
    pub fn cancel(&mut self) {
        self.state = GestureState::Idle;
    }

    // --- Marquee ---

    /// Pointer pressed on empty canvas: clear the selection and open a marquee.
    pub fn pointer_down_canvas(&mut self, at: Point) {
        self.selection.clear();
        self.state = GestureState::Marquee { anchor: at, current: at };
    }

    /// Track the pointer for an open marquee. Other gestures ignore this.
    pub fn pointer_move(&mut self, at: Point) {
        if let GestureState::Marquee { current, .. } = &mut self.state {
            *current = at;
        }
    }

    /// Close an open marquee, selecting exactly the elements it overlaps.
    /// Returns `false` when no marquee was open.
    pub fn pointer_up(&mut self, elements: &[SlideElement]) -> bool {
        let Some(rect) = self.marquee_rect() else {
            return false;
        };
        self.state = GestureState::Idle;
        self.selection = if rect.is_empty() {
            HashSet::new()
        } else {
            elements.iter().filter(|e| e.rect().overlaps(&rect)).map(|e| e.id).collect()
        };
        true
    }

    // --- Drag ---

    /// Start dragging `id`. The whole selection moves if `id` is part of it;
    /// otherwise the selection becomes `{id}`.
    pub fn begin_drag(&mut self, id: ElementId, elements: &[SlideElement]) {
        if !self.selection.contains(&id) {
            self.selection.clear();
            self.selection.insert(id);
        }
        let origins: HashMap<ElementId, Point> = elements
            .iter()
            .filter(|e| self.selection.contains(&e.id))
            .map(|e| (e.id, e.position()))
            .collect();
        self.state = GestureState::Dragging { grabbed: id, origins, drafts: HashMap::new() };
    }

    /// The grabbed element is now at `position`; every dragged element
    /// moves by the same offset from its origin.
    pub fn drag_to(&mut self, position: Point) {
        let GestureState::Dragging { grabbed, origins, drafts } = &mut self.state else {
            return;
        };
        let Some(start) = origins.get(grabbed) else {
            return;
        };
        let (dx, dy) = (position.x - start.x, position.y - start.y);
        for (id, origin) in &*origins {
            drafts.insert(*id, origin.translate(dx, dy));
        }
    }

    /// Finish the drag. Returns the position writes to persist, or `None`
    /// if the pointer never moved.
    pub fn end_drag(&mut self) -> Option<HashMap<ElementId, PartialElement>> {
        if !matches!(self.state, GestureState::Dragging { .. }) {
            return None;
        }
        let GestureState::Dragging { drafts, .. } = std::mem::take(&mut self.state) else {
            return None;
        };
        if drafts.is_empty() {
            return None;
        }
        Some(drafts.into_iter().map(|(id, p)| (id, PartialElement::position(p))).collect())
    }

    // --- Resize ---

    /// Start resizing `id`. Resize handles only exist on selected elements,
    /// so the selection is left alone.
    pub fn begin_resize(&mut self, id: ElementId) {
        self.state = GestureState::Resizing { id, draft: None };
    }

    /// Update the draft bounds, clamped to the minimum element size.
    pub fn resize_to(&mut self, bounds: Rect) {
        if let GestureState::Resizing { draft, .. } = &mut self.state {
            *draft = Some(Rect::new(
                bounds.x,
                bounds.y,
                bounds.width.max(MIN_ELEMENT_WIDTH),
                bounds.height.max(MIN_ELEMENT_HEIGHT),
            ));
        }
    }

    /// Finish the resize. Returns the bounds write to persist, or `None` if
    /// no resize event arrived.
    pub fn end_resize(&mut self) -> Option<(ElementId, PartialElement)> {
        if !matches!(self.state, GestureState::Resizing { .. }) {
            return None;
        }
        let GestureState::Resizing { id, draft } = std::mem::take(&mut self.state) else {
            return None;
        };
        draft.map(|rect| (id, PartialElement::bounds(rect)))
    }

    // --- Keyboard ---

    /// Delete/Backspace outside a text input takes the whole selection,
    /// which is cleared. Returns the elements to delete.
    pub fn key_down(&mut self, key: &Key, in_text_input: bool) -> Vec<ElementId> {
        if in_text_input || !key.is_delete() || self.selection.is_empty() {
            return Vec::new();
        }
        self.state = GestureState::Idle;
        self.selection.drain().collect()
    }
}
