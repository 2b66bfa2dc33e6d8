use kurbo::Point;

use crate::foundation::core::{AspectRatio, Color};

/// Stable slide identifier, assigned at creation and never reused.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct SlideId(pub(crate) u64);

impl SlideId {
    /// Access raw 64-bit identifier.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Stable overlay identifier, assigned at creation and never reused.
///
/// Overlay identity is the sole correlation key between the document and
/// renderer nodes; geometry is never used to match the two.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct OverlayId(pub(crate) u64);

impl OverlayId {
    /// Access raw 64-bit identifier.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Slide background: a solid color or an image source.
///
/// Image sources are opaque strings resolved at render time: a `data:` URI or
/// a filesystem path (see [`crate::load_image_source`]).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Background {
    /// Solid fill color.
    Color(Color),
    /// Image source string.
    Image(String),
}

/// Font weight of a text overlay.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// Regular weight.
    #[default]
    Normal,
    /// Bold weight.
    Bold,
}

impl FontWeight {
    /// Flip between normal and bold.
    pub fn toggled(self) -> Self {
        match self {
            FontWeight::Normal => FontWeight::Bold,
            FontWeight::Bold => FontWeight::Normal,
        }
    }
}

/// Font slant of a text overlay.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    /// Upright.
    #[default]
    Normal,
    /// Italic.
    Italic,
}

impl FontStyle {
    /// Flip between normal and italic.
    pub fn toggled(self) -> Self {
        match self {
            FontStyle::Normal => FontStyle::Italic,
            FontStyle::Italic => FontStyle::Normal,
        }
    }
}

/// Horizontal text alignment inside the overlay box.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Align to the left edge.
    Left,
    /// Center within the box.
    #[default]
    Center,
    /// Align to the right edge.
    Right,
}

/// Styling and box geometry of a text overlay.
///
/// `width`/`height` describe the layout box; `scale_x`/`scale_y` are transient
/// transform state and are folded back into the box size when a resize gesture
/// commits, so they stay at 1.0 between gestures.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OverlayStyle {
    /// UTF-8 text content.
    pub text: String,
    /// Font family name.
    pub font_family: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// Font weight.
    #[serde(default)]
    pub font_weight: FontWeight,
    /// Font slant.
    #[serde(default)]
    pub font_style: FontStyle,
    /// Horizontal alignment.
    #[serde(default)]
    pub text_align: TextAlign,
    /// Fill color.
    pub fill: Color,
    /// Outline color.
    pub stroke: Color,
    /// Outline width in pixels (0 = no outline).
    #[serde(default)]
    pub stroke_width: f64,
    /// Layout box width in pixels.
    pub width: f64,
    /// Layout box height in pixels.
    pub height: f64,
    /// Rotation in degrees around the overlay center.
    #[serde(default)]
    pub angle: f64,
    /// Horizontal scale factor (1.0 between gestures).
    #[serde(default = "default_scale")]
    pub scale_x: f64,
    /// Vertical scale factor (1.0 between gestures).
    #[serde(default = "default_scale")]
    pub scale_y: f64,
}

fn default_scale() -> f64 {
    1.0
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT.to_string(),
            font_family: "Montserrat".to_string(),
            font_size: 36.0,
            font_weight: FontWeight::Normal,
            font_style: FontStyle::Normal,
            text_align: TextAlign::Center,
            fill: Color::WHITE,
            stroke: Color::BLACK,
            stroke_width: 0.0,
            width: 200.0,
            height: 50.0,
            angle: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

/// A positioned, styled text element placed on a slide.
///
/// `position` is the overlay's **center** in stage coordinates; the renderer
/// offsets its top-left anchored box by half the box size so visual placement
/// agrees with this anchor.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextOverlay {
    /// Overlay identifier.
    pub id: OverlayId,
    /// Center position in stage coordinates.
    pub position: Point,
    /// Styling and box geometry.
    pub style: OverlayStyle,
}

/// An overlay placed on a slide.
///
/// Only text overlays exist today; the union keeps dispatch in the controller
/// and scene adapter shaped for future kinds (e.g. image overlays).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Overlay {
    /// Text overlay.
    Text(TextOverlay),
}

impl Overlay {
    /// Overlay identifier, independent of kind.
    pub fn id(&self) -> OverlayId {
        match self {
            Overlay::Text(t) => t.id,
        }
    }

    /// Downcast to a text overlay.
    pub fn as_text(&self) -> Option<&TextOverlay> {
        match self {
            Overlay::Text(t) => Some(t),
        }
    }

    pub(crate) fn as_text_mut(&mut self) -> Option<&mut TextOverlay> {
        match self {
            Overlay::Text(t) => Some(t),
        }
    }
}

/// One slide of the deck.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Slide {
    /// Slide identifier.
    pub id: SlideId,
    /// Aspect ratio selecting the stage pixel dimensions.
    pub aspect_ratio: AspectRatio,
    /// Background fill.
    pub background: Background,
    /// Overlays in paint order (later entries on top).
    pub overlays: Vec<Overlay>,
}

impl Slide {
    /// Look up an overlay by id.
    pub fn overlay(&self, id: OverlayId) -> Option<&Overlay> {
        self.overlays.iter().find(|o| o.id() == id)
    }

    /// Look up a text overlay by id.
    pub fn text_overlay(&self, id: OverlayId) -> Option<&TextOverlay> {
        self.overlay(id).and_then(Overlay::as_text)
    }

    pub(crate) fn overlay_mut(&mut self, id: OverlayId) -> Option<&mut Overlay> {
        self.overlays.iter_mut().find(|o| o.id() == id)
    }
}

/// Partial update applied to a text overlay.
///
/// Every field is optional; unset fields are left untouched. `x` and `y` are
/// independent so a position-only update for one axis can never clobber the
/// other, and neither interferes with concurrent style updates.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OverlayPatch {
    /// New text content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// New font family.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// New font size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    /// New font weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    /// New font slant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    /// New text alignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    /// New fill color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Color>,
    /// New outline color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Color>,
    /// New outline width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    /// New box width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// New box height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// New rotation in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    /// New horizontal scale factor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_x: Option<f64>,
    /// New vertical scale factor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_y: Option<f64>,
    /// New center x coordinate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// New center y coordinate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl OverlayPatch {
    /// Patch setting only the center position.
    pub fn position(p: Point) -> Self {
        Self {
            x: Some(p.x),
            y: Some(p.y),
            ..Self::default()
        }
    }

    /// Patch setting only the text content.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge the set fields into `overlay`.
    pub fn apply_to(&self, overlay: &mut TextOverlay) {
        if let Some(x) = self.x {
            overlay.position.x = x;
        }
        if let Some(y) = self.y {
            overlay.position.y = y;
        }
        let style = &mut overlay.style;
        if let Some(text) = &self.text {
            style.text = text.clone();
        }
        if let Some(family) = &self.font_family {
            style.font_family = family.clone();
        }
        if let Some(size) = self.font_size {
            style.font_size = size;
        }
        if let Some(weight) = self.font_weight {
            style.font_weight = weight;
        }
        if let Some(slant) = self.font_style {
            style.font_style = slant;
        }
        if let Some(align) = self.text_align {
            style.text_align = align;
        }
        if let Some(fill) = self.fill {
            style.fill = fill;
        }
        if let Some(stroke) = self.stroke {
            style.stroke = stroke;
        }
        if let Some(w) = self.stroke_width {
            style.stroke_width = w;
        }
        if let Some(w) = self.width {
            style.width = w;
        }
        if let Some(h) = self.height {
            style.height = h;
        }
        if let Some(angle) = self.angle {
            style.angle = angle;
        }
        if let Some(sx) = self.scale_x {
            style.scale_x = sx;
        }
        if let Some(sy) = self.scale_y {
            style.scale_y = sy;
        }
    }
}

/// Text content of a freshly added overlay.
pub const DEFAULT_TEXT: &str = "Click to edit text";

/// Font families chrome offers in the style toolbar.
pub const FONT_FAMILIES: &[&str] = &[
    "Arial",
    "Bungee",
    "DM Serif Display",
    "Fira Sans",
    "Gabarito",
    "Kanit",
    "LEMON MILK",
    "Lilita One",
    "Mont Heavy",
    "Montserrat",
    "Poppins",
    "Roboto",
    "Rubik",
];

/// Font sizes chrome offers in the style toolbar, in pixels.
pub const FONT_SIZES: &[f64] = &[
    12.0, 14.0, 16.0, 18.0, 20.0, 24.0, 28.0, 32.0, 36.0, 42.0, 48.0, 56.0, 64.0, 72.0,
];

#[cfg(test)]
#[path = "../../tests/unit/document/model.rs"]
mod tests;
