//! Shared numeric defaults for the editor.

// ── Slide canvas ────────────────────────────────────────────────

/// Logical slide width; element coordinates live in this space.
pub const SLIDE_WIDTH: f64 = 1280.0;

/// Logical slide height.
pub const SLIDE_HEIGHT: f64 = 720.0;

/// Fraction of the container the fitted slide occupies.
pub const VIEWPORT_FILL: f64 = 0.95;

// ── Element defaults ────────────────────────────────────────────

/// Default width for every new element.
pub const DEFAULT_ELEMENT_WIDTH: f64 = 400.0;

/// Default height for a new text box.
pub const DEFAULT_TEXT_HEIGHT: f64 = 150.0;

/// Default height for new media (16:9 at the default width).
pub const DEFAULT_MEDIA_HEIGHT: f64 = 225.0;

/// Body of a freshly created text box.
pub const DEFAULT_TEXT_CONTENT: &str = "New text";

/// Font size the server assigns when none is given.
pub const DEFAULT_FONT_SIZE: u32 = 24;

// ── Gestures ────────────────────────────────────────────────────

/// Smallest width a resize gesture may produce.
pub const MIN_ELEMENT_WIDTH: f64 = 100.0;

/// Smallest height a resize gesture may produce.
pub const MIN_ELEMENT_HEIGHT: f64 = 50.0;

// ── Persistence ─────────────────────────────────────────────────

/// Quiet period before deferred element edits are written, in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
