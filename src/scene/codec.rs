use kurbo::{Affine, Point, Rect};

use crate::document::model::{FontStyle, FontWeight, OverlayPatch, TextAlign, TextOverlay};
use crate::foundation::core::Color;

/// Renderer-facing drawing parameters for one text node.
///
/// `x`/`y` are the node's **center** in stage coordinates; the renderer's
/// native top-left anchored box is shifted by `offset_x`/`offset_y` (half the
/// box size) so the visual placement agrees with the document's center anchor.
#[derive(Clone, Debug, PartialEq)]
pub struct TextNodeParams {
    /// Text content.
    pub text: String,
    /// Center x in stage coordinates.
    pub x: f64,
    /// Center y in stage coordinates.
    pub y: f64,
    /// Font family name.
    pub font_family: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// Combined weight/slant string: `normal`, `bold`, `italic` or `bold italic`.
    pub font_style: String,
    /// Horizontal alignment.
    pub align: TextAlign,
    /// Fill color.
    pub fill: Color,
    /// Outline color.
    pub stroke: Color,
    /// Outline width in pixels.
    pub stroke_width: f64,
    /// Rotation in degrees around the center.
    pub rotation: f64,
    /// Horizontal scale factor.
    pub scale_x: f64,
    /// Vertical scale factor.
    pub scale_y: f64,
    /// Layout box width in pixels.
    pub width: f64,
    /// Layout box height in pixels.
    pub height: f64,
    /// Horizontal anchor offset (half the box width).
    pub offset_x: f64,
    /// Vertical anchor offset (half the box height).
    pub offset_y: f64,
}

impl TextNodeParams {
    /// Replace the layout box, keeping the anchor offsets at half the box.
    pub fn set_box(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.offset_x = width / 2.0;
        self.offset_y = height / 2.0;
    }

    /// Local-to-stage transform of the node box.
    ///
    /// Composition order mirrors the anchor form used elsewhere in the crate:
    /// `T(center) * R(rotation) * S(scale) * T(-offset)`, taking the box's
    /// local `[0,w] x [0,h]` space into stage space.
    pub fn to_affine(&self) -> Affine {
        Affine::translate((self.x, self.y))
            * Affine::rotate(self.rotation.to_radians())
            * Affine::scale_non_uniform(self.scale_x, self.scale_y)
            * Affine::translate((-self.offset_x, -self.offset_y))
    }

    /// Axis-aligned bounding box of the transformed node in stage coordinates.
    pub fn bounds(&self) -> Rect {
        self.to_affine()
            .transform_rect_bbox(Rect::new(0.0, 0.0, self.width, self.height))
    }

    /// Whether a stage-space point falls inside the transformed node box.
    pub fn contains(&self, p: Point) -> bool {
        let affine = self.to_affine();
        if affine.determinant().abs() < 1e-12 {
            return false;
        }
        let local = affine.inverse() * p;
        local.x >= 0.0 && local.x <= self.width && local.y >= 0.0 && local.y <= self.height
    }
}

/// Combine weight and slant into the renderer's single style string.
pub fn combined_font_style(weight: FontWeight, style: FontStyle) -> &'static str {
    match (weight, style) {
        (FontWeight::Normal, FontStyle::Normal) => "normal",
        (FontWeight::Bold, FontStyle::Normal) => "bold",
        (FontWeight::Normal, FontStyle::Italic) => "italic",
        (FontWeight::Bold, FontStyle::Italic) => "bold italic",
    }
}

/// Split the renderer's combined style string back into weight and slant.
/// Unrecognized strings read as regular upright text.
pub fn split_font_style(s: &str) -> (FontWeight, FontStyle) {
    match s {
        "bold" => (FontWeight::Bold, FontStyle::Normal),
        "italic" => (FontWeight::Normal, FontStyle::Italic),
        "bold italic" => (FontWeight::Bold, FontStyle::Italic),
        _ => (FontWeight::Normal, FontStyle::Normal),
    }
}

/// Map a document overlay to renderer drawing parameters. Pure and
/// deterministic; the inverse direction is [`from_render_state`].
pub fn to_render_params(overlay: &TextOverlay) -> TextNodeParams {
    let style = &overlay.style;
    TextNodeParams {
        text: style.text.clone(),
        x: overlay.position.x,
        y: overlay.position.y,
        font_family: style.font_family.clone(),
        font_size: style.font_size,
        font_style: combined_font_style(style.font_weight, style.font_style).to_string(),
        align: style.text_align,
        fill: style.fill,
        stroke: style.stroke,
        stroke_width: style.stroke_width,
        rotation: style.angle,
        scale_x: style.scale_x,
        scale_y: style.scale_y,
        width: style.width,
        height: style.height,
        offset_x: style.width / 2.0,
        offset_y: style.height / 2.0,
    }
}

/// Read a node's transform state back into a document patch.
///
/// Scale is folded into the box size and reset to 1, so repeated resize
/// gestures never compound a lingering scale factor. Applying the resulting
/// patch and reading again is a no-op on width/height.
pub fn from_render_state(params: &TextNodeParams) -> OverlayPatch {
    OverlayPatch {
        x: Some(params.x),
        y: Some(params.y),
        angle: Some(params.rotation),
        width: Some(params.width * params.scale_x),
        height: Some(params.height * params.scale_y),
        scale_x: Some(1.0),
        scale_y: Some(1.0),
        ..OverlayPatch::default()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/codec.rs"]
mod tests;
