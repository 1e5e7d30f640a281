//! Direct-manipulation editing core for a slide presentation editor.
//!
//! The crate keeps an in-memory mirror of one presentation, turns pointer
//! gestures (drag, resize, marquee) into element mutations, and reconciles
//! local edits with a remote presentation service through immediate and
//! debounced save paths. Rendering and hit-testing belong to the host; this
//! crate hands it a [`surface::SlideFrame`] per slide.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`editor`] | Editor page wiring store, gestures and viewport together |
//! | [`store`] | Presentation state, optimistic updates and persistence |
//! | [`gesture`] | Selection set and the pointer gesture state machine |
//! | [`surface`] | Render model for a slide, including draft geometry |
//! | [`debounce`] | Keyed debounce window for deferred writes |
//! | [`model`] | Presentations, slides, elements and sparse edits |
//! | [`geometry`] | Points, rectangles and the slide viewport |
//! | [`api`] | Presentation service contract and its HTTP client |
//! | [`auth`] | Bearer credential provider |
//! | [`notify`] | User notification side channel |
//! | [`error`] | Store error taxonomy |
//! | [`config`] | Environment configuration |
//! | [`consts`] | Shared numeric defaults (slide size, element boxes, debounce window) |

pub mod api;
pub mod auth;
pub mod config;
pub mod consts;
pub mod debounce;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod model;
pub mod notify;
pub mod store;
pub mod surface;

#[cfg(test)]
mod test_support;
