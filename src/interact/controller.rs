use kurbo::{Point, Rect};

use crate::{
    document::deck::Deck,
    document::model::{
        Background, OverlayId, OverlayPatch, OverlayStyle, SlideId, TextAlign, TextOverlay,
    },
    foundation::core::{AspectRatio, Color, StageViewport},
    interact::toolbar::{self, TOOLBAR_MARGIN, ToolbarPosition},
    scene::adapter::{BackgroundTicket, SceneAdapter},
    scene::codec::{combined_font_style, from_render_state},
};

/// Active direct-manipulation gesture on the selected overlay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Gesture {
    #[default]
    Idle,
    Dragging,
    Transforming,
}

/// The inline text-edit sub-session.
///
/// At most one exists per editor session. While open, the overlay's node is
/// hidden and chrome shows a native text input positioned over `input_box`.
#[derive(Clone, Debug, PartialEq)]
pub struct EditSession {
    overlay: OverlayId,
    draft: String,
    input_box: Rect,
}

impl EditSession {
    /// Overlay being edited.
    pub fn overlay(&self) -> OverlayId {
        self.overlay
    }

    /// Current draft text (uncommitted).
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Screen-space rectangle the text input should cover.
    pub fn input_box(&self) -> Rect {
        self.input_box
    }
}

/// Key events the edit session reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditKey {
    /// Enter; commits unless shift is held, which inserts a newline.
    Enter {
        /// Whether shift was held.
        shift: bool,
    },
    /// Escape; cancels, discarding the draft.
    Escape,
}

/// A style mutation from the floating toolbar.
#[derive(Clone, Debug, PartialEq)]
pub enum StyleChange {
    /// Set the font family.
    FontFamily(String),
    /// Set the font size in pixels.
    FontSize(f64),
    /// Toggle bold on/off.
    ToggleBold,
    /// Toggle italic on/off.
    ToggleItalic,
    /// Set horizontal alignment.
    Align(TextAlign),
    /// Set the fill color.
    Fill(Color),
    /// Set the outline color.
    Stroke(Color),
    /// Set the outline width.
    StrokeWidth(f64),
    /// Set the layout box width.
    BoxWidth(f64),
}

/// Final node state reported by a resize/rotate gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformState {
    /// Center x in stage coordinates.
    pub x: f64,
    /// Center y in stage coordinates.
    pub y: f64,
    /// Box width before scale.
    pub width: f64,
    /// Box height before scale.
    pub height: f64,
    /// Rotation in degrees.
    pub rotation: f64,
    /// Horizontal scale applied by the gesture.
    pub scale_x: f64,
    /// Vertical scale applied by the gesture.
    pub scale_y: f64,
}

/// One mounted editor instance: the document, its scene adapter, selection,
/// gesture state, the single inline edit session, and the floating toolbar
/// position.
///
/// All dependencies are owned and wired at construction; there is no
/// module-level state, so multiple sessions (or tests) never interfere. Every
/// renderer event and chrome action routes through this instance, which keeps
/// the stage and node map single-writer.
#[derive(Debug)]
pub struct EditorSession {
    deck: Deck,
    scene: SceneAdapter,
    viewport: StageViewport,
    selection: Option<OverlayId>,
    gesture: Gesture,
    edit: Option<EditSession>,
    toolbar: Option<ToolbarPosition>,
}

impl EditorSession {
    /// Create a session over a document. Call [`EditorSession::mount`] next
    /// and hand any returned ticket to the background loader.
    pub fn new(deck: Deck) -> Self {
        Self {
            deck,
            scene: SceneAdapter::new(),
            viewport: StageViewport::default(),
            selection: None,
            gesture: Gesture::Idle,
            edit: None,
            toolbar: None,
        }
    }

    /// The document.
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// The scene adapter (read-only; mutation goes through session methods).
    pub fn scene(&self) -> &SceneAdapter {
        &self.scene
    }

    /// Currently selected overlay id, if any.
    pub fn selection(&self) -> Option<OverlayId> {
        self.selection
    }

    /// The selected overlay's document state.
    pub fn selected_overlay(&self) -> Option<&TextOverlay> {
        let id = self.selection?;
        self.deck.current_slide()?.text_overlay(id)
    }

    /// Whether an inline edit session is open (chrome hides the toolbar then).
    pub fn is_editing(&self) -> bool {
        self.edit.is_some()
    }

    /// The open edit session, if any.
    pub fn edit_session(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    /// Current floating toolbar position; `None` when nothing is selected or
    /// an edit session is open.
    pub fn toolbar_position(&self) -> Option<ToolbarPosition> {
        self.toolbar
    }

    /// Update the stage's screen placement/zoom and recompute the toolbar.
    pub fn set_viewport(&mut self, viewport: StageViewport) {
        self.viewport = viewport;
        self.refresh_toolbar();
    }

    /// Mount the current slide into the scene.
    pub fn mount(&mut self) -> Option<BackgroundTicket> {
        let slide = self.deck.current_slide()?.clone();
        self.scene.mount(&slide)
    }

    /// Deliver an image background load result (see [`BackgroundTicket`]).
    pub fn complete_background_load(
        &mut self,
        ticket: BackgroundTicket,
        result: crate::foundation::error::DeckleResult<crate::assets::decode::PreparedImage>,
    ) {
        self.scene.complete_background_load(ticket, result);
    }

    /// Pointer press on the stage: selects the topmost node under the point,
    /// or clears the selection on empty canvas. An open edit session commits
    /// first (blur semantics).
    pub fn select_at(&mut self, p: Point) -> Option<OverlayId> {
        if self.edit.is_some() {
            self.commit_edit();
        }
        self.gesture = Gesture::Idle;

        let hit = self
            .scene
            .stage()
            .and_then(|stage| stage.hit_test(p))
            .and_then(|node_id| {
                let stage = self.scene.stage()?;
                Some(stage.node(node_id)?.overlay)
            });
        self.selection = hit;
        self.refresh_toolbar();
        hit
    }

    /// Select an overlay directly (chrome-initiated). No-op on unknown ids.
    pub fn select(&mut self, overlay: OverlayId) -> bool {
        let exists = self
            .deck
            .current_slide()
            .is_some_and(|s| s.overlay(overlay).is_some());
        if !exists {
            return false;
        }
        if self.edit.is_some() {
            self.commit_edit();
        }
        self.selection = Some(overlay);
        self.gesture = Gesture::Idle;
        self.refresh_toolbar();
        true
    }

    /// Clear the selection (click on empty canvas).
    pub fn clear_selection(&mut self) {
        if self.edit.is_some() {
            self.commit_edit();
        }
        self.selection = None;
        self.gesture = Gesture::Idle;
        self.toolbar = None;
    }

    /// Begin dragging the selected overlay.
    pub fn drag_start(&mut self) -> bool {
        if self.selection.is_none() || self.edit.is_some() {
            return false;
        }
        self.gesture = Gesture::Dragging;
        true
    }

    /// Drag tick: move the live node to `center` and track it with the
    /// toolbar. The document is not written until drag-end.
    pub fn drag_move(&mut self, center: Point) {
        if self.gesture != Gesture::Dragging {
            return;
        }
        let Some(id) = self.selection else { return };
        if let Some(node) = self.scene.node_mut(id) {
            node.params.x = center.x;
            node.params.y = center.y;
        }
        self.refresh_toolbar();
    }

    /// End the drag, committing the node's final position to the document.
    pub fn drag_end(&mut self) {
        if self.gesture != Gesture::Dragging {
            return;
        }
        self.gesture = Gesture::Idle;
        let Some(id) = self.selection else { return };
        let Some(slide_id) = self.current_slide_id() else {
            return;
        };
        if let Some(node) = self.scene.node(id) {
            let patch = OverlayPatch::position(Point::new(node.params.x, node.params.y));
            self.deck.update_overlay(slide_id, id, &patch);
        }
        self.refresh_toolbar();
    }

    /// Begin a resize/rotate gesture on the selected overlay.
    pub fn transform_start(&mut self) -> bool {
        if self.selection.is_none() || self.edit.is_some() {
            return false;
        }
        self.gesture = Gesture::Transforming;
        true
    }

    /// Transform tick: mirror the gesture state onto the live node and track
    /// it with the toolbar. No document write.
    pub fn transform_move(&mut self, state: TransformState) {
        if self.gesture != Gesture::Transforming {
            return;
        }
        let Some(id) = self.selection else { return };
        if let Some(node) = self.scene.node_mut(id) {
            apply_transform_state(&mut node.params, state);
        }
        self.refresh_toolbar();
    }

    /// End the transform: fold scale into the box size, reset scale to 1, and
    /// commit position/angle/size to the document in one combined update.
    pub fn transform_end(&mut self, state: TransformState) {
        if self.gesture != Gesture::Transforming {
            return;
        }
        self.gesture = Gesture::Idle;
        let Some(id) = self.selection else { return };
        let Some(slide_id) = self.current_slide_id() else {
            return;
        };

        let Some(node) = self.scene.node_mut(id) else {
            return;
        };
        apply_transform_state(&mut node.params, state);
        let patch = from_render_state(&node.params);
        // Normalize the live node the same way the patch normalizes the
        // document, so the two stay equal without a resync.
        let width = node.params.width * node.params.scale_x;
        let height = node.params.height * node.params.scale_y;
        node.params.set_box(width, height);
        node.params.scale_x = 1.0;
        node.params.scale_y = 1.0;

        self.deck.update_overlay(slide_id, id, &patch);
        self.refresh_toolbar();
    }

    /// Double-click: select the node under the point and open the inline text
    /// editor on it. Clears the selection on empty canvas.
    pub fn double_click(&mut self, p: Point) -> bool {
        match self.select_at(p) {
            Some(_) => self.begin_edit(),
            None => false,
        }
    }

    /// Open the inline text editor on the selected overlay.
    ///
    /// Any previously open session commits first; there is never more than one
    /// live text input. The node is hidden while the session is open.
    pub fn begin_edit(&mut self) -> bool {
        let Some(id) = self.selection else {
            return false;
        };
        if let Some(edit) = &self.edit {
            if edit.overlay == id {
                return true;
            }
            self.commit_edit();
        }
        let Some(text) = self
            .deck
            .current_slide()
            .and_then(|s| s.text_overlay(id))
            .map(|t| t.style.text.clone())
        else {
            return false;
        };
        let Some(bounds) = self.node_bounds(id) else {
            return false;
        };
        if let Some(node) = self.scene.node_mut(id) {
            node.visible = false;
        }
        self.gesture = Gesture::Idle;
        self.edit = Some(EditSession {
            overlay: id,
            draft: text,
            input_box: self.viewport.rect_to_screen(bounds),
        });
        self.toolbar = None;
        true
    }

    /// Replace the edit draft with the input's current value.
    pub fn edit_input(&mut self, text: impl Into<String>) {
        if let Some(edit) = &mut self.edit {
            edit.draft = text.into();
        }
    }

    /// Handle a key event inside the edit session. Returns whether the key
    /// was consumed.
    pub fn edit_key(&mut self, key: EditKey) -> bool {
        if self.edit.is_none() {
            return false;
        }
        match key {
            EditKey::Enter { shift: true } => {
                if let Some(edit) = &mut self.edit {
                    edit.draft.push('\n');
                }
            }
            EditKey::Enter { shift: false } => self.commit_edit(),
            EditKey::Escape => self.cancel_edit(),
        }
        true
    }

    /// Commit the edit session: write the draft to the document and restore
    /// the node. No-op when no session is open.
    pub fn commit_edit(&mut self) {
        let Some(edit) = self.edit.take() else { return };
        if let Some(node) = self.scene.node_mut(edit.overlay) {
            node.visible = true;
        }
        if let Some(slide_id) = self.current_slide_id() {
            self.deck
                .update_overlay(slide_id, edit.overlay, &OverlayPatch::text(edit.draft));
            self.sync_scene();
        }
        self.refresh_toolbar();
    }

    /// Cancel the edit session, discarding the draft. No-op when no session
    /// is open.
    pub fn cancel_edit(&mut self) {
        let Some(edit) = self.edit.take() else { return };
        if let Some(node) = self.scene.node_mut(edit.overlay) {
            node.visible = true;
        }
        self.refresh_toolbar();
    }

    /// Apply a style change to the selected overlay: the live node and the
    /// document are written in the same step, and the node's position, angle
    /// and scale are explicitly preserved across the write.
    pub fn set_style(&mut self, change: StyleChange) -> bool {
        if self.edit.is_some() {
            return false;
        }
        let Some(id) = self.selection else {
            return false;
        };
        let Some(slide_id) = self.current_slide_id() else {
            return false;
        };
        let Some(overlay) = self
            .deck
            .current_slide()
            .and_then(|s| s.text_overlay(id))
        else {
            return false;
        };

        let mut weight = overlay.style.font_weight;
        let mut slant = overlay.style.font_style;
        let patch = match &change {
            StyleChange::FontFamily(family) => OverlayPatch {
                font_family: Some(family.clone()),
                ..OverlayPatch::default()
            },
            StyleChange::FontSize(size) => OverlayPatch {
                font_size: Some(*size),
                ..OverlayPatch::default()
            },
            StyleChange::ToggleBold => {
                weight = weight.toggled();
                OverlayPatch {
                    font_weight: Some(weight),
                    ..OverlayPatch::default()
                }
            }
            StyleChange::ToggleItalic => {
                slant = slant.toggled();
                OverlayPatch {
                    font_style: Some(slant),
                    ..OverlayPatch::default()
                }
            }
            StyleChange::Align(align) => OverlayPatch {
                text_align: Some(*align),
                ..OverlayPatch::default()
            },
            StyleChange::Fill(color) => OverlayPatch {
                fill: Some(*color),
                ..OverlayPatch::default()
            },
            StyleChange::Stroke(color) => OverlayPatch {
                stroke: Some(*color),
                ..OverlayPatch::default()
            },
            StyleChange::StrokeWidth(width) => OverlayPatch {
                stroke_width: Some(*width),
                ..OverlayPatch::default()
            },
            StyleChange::BoxWidth(width) => OverlayPatch {
                width: Some(*width),
                ..OverlayPatch::default()
            },
        };

        if let Some(node) = self.scene.node_mut(id) {
            // Snapshot transform-adjacent fields; style writes must not move
            // or re-rotate the node.
            let (x, y, rotation, scale_x, scale_y) = (
                node.params.x,
                node.params.y,
                node.params.rotation,
                node.params.scale_x,
                node.params.scale_y,
            );

            match &change {
                StyleChange::FontFamily(family) => node.params.font_family = family.clone(),
                StyleChange::FontSize(size) => node.params.font_size = *size,
                StyleChange::ToggleBold | StyleChange::ToggleItalic => {
                    node.params.font_style = combined_font_style(weight, slant).to_string();
                }
                StyleChange::Align(align) => node.params.align = *align,
                StyleChange::Fill(color) => node.params.fill = *color,
                StyleChange::Stroke(color) => node.params.stroke = *color,
                StyleChange::StrokeWidth(width) => node.params.stroke_width = *width,
                StyleChange::BoxWidth(width) => {
                    let height = node.params.height;
                    node.params.set_box(*width, height);
                }
            }

            node.params.x = x;
            node.params.y = y;
            node.params.rotation = rotation;
            node.params.scale_x = scale_x;
            node.params.scale_y = scale_y;
        }

        self.deck.update_overlay(slide_id, id, &patch);
        self.refresh_toolbar();
        true
    }

    /// Delete the selected overlay from the scene and the document together.
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.selection else {
            return false;
        };
        if self
            .edit
            .as_ref()
            .is_some_and(|edit| edit.overlay == id)
        {
            self.edit = None;
        }
        let Some(slide_id) = self.current_slide_id() else {
            return false;
        };
        self.scene.remove_overlay(id);
        self.deck.delete_overlay(slide_id, id);
        self.selection = None;
        self.gesture = Gesture::Idle;
        self.toolbar = None;
        true
    }

    /// Add a default text overlay to the current slide and select it.
    pub fn add_text(&mut self) -> Option<OverlayId> {
        let slide_id = self.current_slide_id()?;
        let id = self.deck.add_default_text(slide_id)?;
        self.sync_scene();
        self.select(id);
        Some(id)
    }

    /// Add a text overlay with explicit position and style to the current
    /// slide.
    pub fn add_overlay(&mut self, position: Point, style: OverlayStyle) -> Option<OverlayId> {
        let slide_id = self.current_slide_id()?;
        let id = self.deck.add_overlay(slide_id, position, style)?;
        self.sync_scene();
        Some(id)
    }

    /// Append a new slide and switch to it.
    pub fn add_slide(&mut self) -> (SlideId, Option<BackgroundTicket>) {
        let id = self.deck.add_slide();
        let ticket = self.after_slide_switch();
        (id, ticket)
    }

    /// Delete a slide. No-op on the last remaining slide.
    pub fn delete_slide(&mut self, id: SlideId) -> Option<BackgroundTicket> {
        let before = self.current_slide_id();
        self.deck.delete_slide(id);
        if self.current_slide_id() != before {
            self.after_slide_switch()
        } else {
            None
        }
    }

    /// Switch to the slide at `index` (clamped). Tears down any open edit
    /// session (discarding its draft) and clears the selection.
    pub fn switch_slide(&mut self, index: usize) -> Option<BackgroundTicket> {
        self.deck.set_current_index(index);
        self.after_slide_switch()
    }

    /// Replace the current slide's background.
    pub fn set_background(&mut self, background: Background) -> Option<BackgroundTicket> {
        let slide_id = self.current_slide_id()?;
        self.deck.update_slide_background(slide_id, background);
        let slide = self.deck.current_slide()?.clone();
        self.scene.set_background(&slide)
    }

    /// Replace the current slide's aspect ratio and resize the stage.
    pub fn set_aspect_ratio(&mut self, ratio: AspectRatio) {
        let Some(slide_id) = self.current_slide_id() else {
            return;
        };
        self.deck.update_slide_aspect_ratio(slide_id, ratio);
        self.sync_scene();
        self.refresh_toolbar();
    }

    /// Tear down the session, releasing the stage.
    pub fn dispose(&mut self) {
        self.edit = None;
        self.selection = None;
        self.gesture = Gesture::Idle;
        self.toolbar = None;
        self.scene.dispose();
    }

    fn current_slide_id(&self) -> Option<SlideId> {
        self.deck.current_slide().map(|s| s.id)
    }

    fn sync_scene(&mut self) {
        if let Some(slide) = self.deck.current_slide().cloned() {
            self.scene.sync(&slide);
        }
    }

    /// Forced `-> idle` transition after the current slide changed: the edit
    /// session is cancelled (uncommitted text discarded, silently) and the
    /// selection cleared before the new slide mounts.
    fn after_slide_switch(&mut self) -> Option<BackgroundTicket> {
        if let Some(edit) = self.edit.take() {
            tracing::debug!(
                overlay = edit.overlay.as_u64(),
                "slide switch discarded open edit session"
            );
        }
        self.selection = None;
        self.gesture = Gesture::Idle;
        self.toolbar = None;
        self.mount()
    }

    fn node_bounds(&self, id: OverlayId) -> Option<Rect> {
        let node_id = self.scene.node_id(id)?;
        self.scene.stage()?.node_bounds(node_id)
    }

    fn refresh_toolbar(&mut self) {
        if self.edit.is_some() {
            self.toolbar = None;
            return;
        }
        self.toolbar = self
            .selection
            .and_then(|id| self.node_bounds(id))
            .map(|bounds| toolbar::compute_position(bounds, &self.viewport, TOOLBAR_MARGIN));
    }
}

fn apply_transform_state(
    params: &mut crate::scene::codec::TextNodeParams,
    state: TransformState,
) {
    params.x = state.x;
    params.y = state.y;
    params.rotation = state.rotation;
    params.scale_x = state.scale_x;
    params.scale_y = state.scale_y;
    params.set_box(state.width, state.height);
}

#[cfg(test)]
#[path = "../../tests/unit/interact/controller.rs"]
mod tests;
