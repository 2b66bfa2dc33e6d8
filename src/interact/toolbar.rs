use kurbo::Rect;

use crate::foundation::core::StageViewport;

/// Gap in pixels between an element's lower edge and the floating toolbar.
pub const TOOLBAR_MARGIN: f64 = 10.0;

/// Screen position of the floating style toolbar.
///
/// `left` is the horizontal center of the element; chrome is expected to
/// center the panel on it (`translateX(-50%)` in the reference UI).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolbarPosition {
    /// Screen y of the toolbar's anchor point.
    pub top: f64,
    /// Screen x of the toolbar's horizontal center.
    pub left: f64,
}

/// Compute the toolbar anchor from a node's stage-space bounds.
///
/// The toolbar sits `margin` pixels below the element's lower edge,
/// horizontally centered under it. Recomputed on selection change, drag
/// ticks, transform end, and any style change that alters the box.
pub fn compute_position(bounds: Rect, viewport: &StageViewport, margin: f64) -> ToolbarPosition {
    ToolbarPosition {
        top: viewport.top + (bounds.y0 + bounds.height()) * viewport.zoom + margin,
        left: viewport.left + bounds.x0 * viewport.zoom + (bounds.width() * viewport.zoom) / 2.0,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interact/toolbar.rs"]
mod tests;
