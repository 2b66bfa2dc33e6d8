//! Deckle is a slide deck editing engine.
//!
//! A deck is a sequence of slides, each with a background (solid color or
//! image) and movable, resizable, rotatable text overlays. Deckle keeps a
//! retained-mode scene graph synchronized, bidirectionally, with that
//! document model while supporting direct manipulation (drag, resize/rotate,
//! inline text editing) and a floating contextual toolbar that tracks the
//! manipulated element, and renders slides offline to raster images.
//!
//! # Architecture overview
//!
//! 1. **Document**: [`Deck`] owns the slides and exposes total, synchronous
//!    mutations (missing ids are silent no-ops, so renderer callbacks can
//!    race deletions safely).
//! 2. **Codec**: [`to_render_params`] / [`from_render_state`] map overlays to
//!    renderer drawing parameters and back (center-anchored, scale folded
//!    into box size on the way back).
//! 3. **Scene**: [`SceneAdapter`] owns one [`Stage`] per mounted editor and
//!    converges its id-tagged node set onto the current slide.
//! 4. **Interaction**: [`EditorSession`] wires pointer/keyboard events to
//!    document mutations, the single inline edit session, and the
//!    [`ToolbarPosition`] tracker.
//! 5. **Export**: [`render_slide_to_image`] renders a slide on an isolated
//!    offscreen stage via the CPU rasterizer and encodes PNG/JPEG.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Instance-scoped state**: stages, node maps and sessions are owned
//!   objects constructed on mount; there are no module-level singletons.
//! - **Identity, not geometry**: overlays and renderer nodes are correlated
//!   only through id tags, never by comparing coordinates.
//! - **No IO in renderers**: image loading is front-loaded and delivered
//!   through tickets that tolerate slide switches ([`BackgroundTicket`]).
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod document;
mod export;
mod foundation;
mod interact;
mod render;
mod scene;
mod text;

pub use assets::decode::{
    PreparedImage, decode_image, load_background_image, load_image_source, to_data_uri,
};
pub use document::deck::Deck;
pub use document::model::{
    Background, DEFAULT_TEXT, FONT_FAMILIES, FONT_SIZES, FontStyle, FontWeight, Overlay,
    OverlayId, OverlayPatch, OverlayStyle, Slide, SlideId, TextAlign, TextOverlay,
};
pub use export::snapshot::{
    EXPORT_JPEG_QUALITY, THUMBNAIL_SIZE, encode_jpeg, encode_png, export_file_name,
    render_slide_native, render_slide_thumbnail, render_slide_to_image, render_slide_to_jpeg,
    render_slide_to_png,
};
pub use foundation::core::{
    Affine, AspectRatio, Color, Point, Rect, StageSize, StageViewport, Vec2,
};
pub use foundation::error::{DeckleError, DeckleResult};
pub use interact::controller::{
    EditKey, EditSession, EditorSession, StyleChange, TransformState,
};
pub use interact::toolbar::{TOOLBAR_MARGIN, ToolbarPosition, compute_position};
pub use render::raster::{CpuRasterizer, FrameRgba};
pub use scene::adapter::{BackgroundTicket, SceneAdapter};
pub use scene::codec::{
    TextNodeParams, combined_font_style, from_render_state, split_font_style, to_render_params,
};
pub use scene::stage::{NodeId, Stage, StageBackground, TextNode};
pub use text::shaper::{ShapedText, TextBrush, TextShaper, TextSpec};
