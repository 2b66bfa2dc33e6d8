use kurbo::Point;

use crate::{
    document::model::{
        Background, Overlay, OverlayId, OverlayPatch, OverlayStyle, Slide, SlideId, TextOverlay,
    },
    foundation::core::{AspectRatio, Color},
};

/// The slide document: an ordered list of slides plus the current-slide index.
///
/// All mutations are synchronous, total state transitions: referencing a
/// missing slide or overlay id is a silent no-op rather than an error, because
/// renderer callbacks routinely race deletions. At least one slide always
/// exists, and ids are allocated from a per-deck counter and never reused.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Deck {
    slides: Vec<Slide>,
    current: usize,
    next_id: u64,
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl Deck {
    /// Create a deck holding one default slide.
    pub fn new() -> Self {
        let mut deck = Self {
            slides: Vec::new(),
            current: 0,
            next_id: 1,
        };
        let slide = deck.default_slide();
        deck.slides.push(slide);
        deck
    }

    fn fresh_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn default_slide(&mut self) -> Slide {
        let aspect_ratio = AspectRatio::default();
        let id = SlideId(self.fresh_id());
        let overlay = self.default_overlay(aspect_ratio);
        Slide {
            id,
            aspect_ratio,
            background: Background::Color(Color::WHITE),
            overlays: vec![Overlay::Text(overlay)],
        }
    }

    fn default_overlay(&mut self, aspect_ratio: AspectRatio) -> TextOverlay {
        TextOverlay {
            id: OverlayId(self.fresh_id()),
            position: aspect_ratio.dims().center(),
            style: OverlayStyle::default(),
        }
    }

    /// All slides in order.
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Number of slides (always >= 1).
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Always false; kept for container-API symmetry.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Index of the current slide.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The current slide.
    pub fn current_slide(&self) -> Option<&Slide> {
        self.slides.get(self.current)
    }

    /// Look up a slide by id.
    pub fn slide(&self, id: SlideId) -> Option<&Slide> {
        self.slides.iter().find(|s| s.id == id)
    }

    /// Position of a slide in the deck.
    pub fn slide_index(&self, id: SlideId) -> Option<usize> {
        self.slides.iter().position(|s| s.id == id)
    }

    fn slide_mut(&mut self, id: SlideId) -> Option<&mut Slide> {
        self.slides.iter_mut().find(|s| s.id == id)
    }

    /// Make the slide at `index` current, clamping into range.
    pub fn set_current_index(&mut self, index: usize) {
        self.current = index.min(self.slides.len() - 1);
    }

    /// Append a new default slide and make it current.
    pub fn add_slide(&mut self) -> SlideId {
        let slide = self.default_slide();
        let id = slide.id;
        self.slides.push(slide);
        self.current = self.slides.len() - 1;
        id
    }

    /// Remove a slide by id.
    ///
    /// No-op when it is the only slide, or when the id is unknown. The current
    /// index shifts down when the removed slide was at or before it, so the
    /// previous slide stays (or becomes) current.
    pub fn delete_slide(&mut self, id: SlideId) {
        if self.slides.len() <= 1 {
            return;
        }
        let Some(index) = self.slide_index(id) else {
            return;
        };
        self.slides.remove(index);
        if index <= self.current {
            self.current = self.current.saturating_sub(1);
        }
    }

    /// Replace a slide's background.
    pub fn update_slide_background(&mut self, id: SlideId, background: Background) {
        if let Some(slide) = self.slide_mut(id) {
            slide.background = background;
        }
    }

    /// Replace a slide's aspect ratio.
    pub fn update_slide_aspect_ratio(&mut self, id: SlideId, aspect_ratio: AspectRatio) {
        if let Some(slide) = self.slide_mut(id) {
            slide.aspect_ratio = aspect_ratio;
        }
    }

    /// Add a text overlay to a slide; returns the fresh id, or `None` when the
    /// slide is unknown.
    pub fn add_overlay(
        &mut self,
        slide_id: SlideId,
        position: Point,
        style: OverlayStyle,
    ) -> Option<OverlayId> {
        if self.slide(slide_id).is_none() {
            return None;
        }
        let id = OverlayId(self.fresh_id());
        let slide = self.slide_mut(slide_id)?;
        slide
            .overlays
            .push(Overlay::Text(TextOverlay { id, position, style }));
        Some(id)
    }

    /// Add a default-styled text overlay centered on the slide.
    pub fn add_default_text(&mut self, slide_id: SlideId) -> Option<OverlayId> {
        let center = self.slide(slide_id)?.aspect_ratio.dims().center();
        self.add_overlay(slide_id, center, OverlayStyle::default())
    }

    /// Merge a partial update into an overlay. No-op when the slide or overlay
    /// is unknown.
    pub fn update_overlay(&mut self, slide_id: SlideId, overlay_id: OverlayId, patch: &OverlayPatch) {
        let Some(slide) = self.slide_mut(slide_id) else {
            return;
        };
        let Some(overlay) = slide.overlay_mut(overlay_id).and_then(Overlay::as_text_mut) else {
            return;
        };
        patch.apply_to(overlay);
    }

    /// Remove an overlay by id. No-op when the slide or overlay is unknown.
    pub fn delete_overlay(&mut self, slide_id: SlideId, overlay_id: OverlayId) {
        if let Some(slide) = self.slide_mut(slide_id) {
            slide.overlays.retain(|o| o.id() != overlay_id);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/deck.rs"]
mod tests;
