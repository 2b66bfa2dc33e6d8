use std::collections::HashMap;

use crate::{
    assets::decode::PreparedImage,
    document::model::{Background, Overlay, OverlayId, Slide, SlideId},
    foundation::error::DeckleResult,
    scene::codec::to_render_params,
    scene::stage::{NodeId, Stage, TextNode},
};

/// Guard handed out when an image background starts loading.
///
/// Image loading is the one genuinely asynchronous operation in the core: the
/// host performs the IO and calls [`SceneAdapter::complete_background_load`]
/// with the ticket. The ticket records which slide and which background epoch
/// the load belongs to, so a completion that arrives after a slide switch or a
/// newer background write is dropped instead of painting a stale image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackgroundTicket {
    slide: SlideId,
    epoch: u64,
}

impl BackgroundTicket {
    /// Slide this load was started for.
    pub fn slide(&self) -> SlideId {
        self.slide
    }
}

/// Owns one stage instance and keeps its node set mirroring the document.
///
/// The `overlay id -> node id` map is the single source of truth correlating
/// document identity to renderer identity. Exactly one live node exists per
/// live overlay of the mounted slide; nodes are destroyed on slide change or
/// overlay removal and never reused across overlay ids.
#[derive(Debug, Default)]
pub struct SceneAdapter {
    stage: Option<Stage>,
    mounted: Option<SlideId>,
    nodes: HashMap<OverlayId, NodeId>,
    epoch: u64,
}

impl SceneAdapter {
    /// Create an adapter with no mounted slide.
    pub fn new() -> Self {
        Self::default()
    }

    /// Slide currently mounted, if any.
    pub fn mounted_slide(&self) -> Option<SlideId> {
        self.mounted
    }

    /// The live stage, if mounted.
    pub fn stage(&self) -> Option<&Stage> {
        self.stage.as_ref()
    }

    /// Mount a slide, rebuilding the stage when the slide identity changed.
    ///
    /// Idempotent: mounting the already-mounted slide converges node state
    /// without recreating the stage (so nodes keep their identity and the
    /// current background stays visible). Returns a ticket when an image
    /// background needs loading.
    pub fn mount(&mut self, slide: &Slide) -> Option<BackgroundTicket> {
        if self.mounted == Some(slide.id) {
            self.sync(slide);
            return None;
        }

        self.epoch += 1;
        self.nodes.clear();
        let mut stage = Stage::new(slide.aspect_ratio.dims());
        for overlay in &slide.overlays {
            let Overlay::Text(text) = overlay;
            let node = stage.add_text(text.id, to_render_params(text));
            self.nodes.insert(text.id, node);
        }
        self.stage = Some(stage);
        self.mounted = Some(slide.id);
        self.apply_background(slide)
    }

    /// Converge the node set onto the slide's overlay set.
    ///
    /// Creates missing nodes, destroys extras, and updates changed nodes in
    /// place (preserving node identity and visibility). Safe to call
    /// repeatedly; a slide with a different identity is mounted instead.
    pub fn sync(&mut self, slide: &Slide) {
        if self.mounted != Some(slide.id) {
            self.mount(slide);
            return;
        }
        let Some(stage) = self.stage.as_mut() else {
            return;
        };

        stage.set_size(slide.aspect_ratio.dims());

        for overlay in &slide.overlays {
            let Overlay::Text(text) = overlay;
            match self.nodes.get(&text.id) {
                Some(&node_id) => {
                    if let Some(node) = stage.node_mut(node_id) {
                        let params = to_render_params(text);
                        if node.params != params {
                            node.params = params;
                        }
                    }
                }
                None => {
                    let node = stage.add_text(text.id, to_render_params(text));
                    self.nodes.insert(text.id, node);
                }
            }
        }

        let live: std::collections::HashSet<OverlayId> =
            slide.overlays.iter().map(Overlay::id).collect();
        let stale: Vec<OverlayId> = self
            .nodes
            .keys()
            .copied()
            .filter(|id| !live.contains(id))
            .collect();
        for id in stale {
            if let Some(node_id) = self.nodes.remove(&id) {
                stage.remove(node_id);
            }
        }
    }

    /// Write the slide's background to the stage. Color backgrounds apply
    /// immediately; image backgrounds return a load ticket and leave the
    /// current background visible until the load completes.
    pub fn set_background(&mut self, slide: &Slide) -> Option<BackgroundTicket> {
        if self.mounted != Some(slide.id) {
            return None;
        }
        self.apply_background(slide)
    }

    fn apply_background(&mut self, slide: &Slide) -> Option<BackgroundTicket> {
        match &slide.background {
            Background::Color(color) => {
                if let Some(stage) = self.stage.as_mut() {
                    stage.set_background_color(*color);
                }
                None
            }
            Background::Image(_) => {
                self.epoch += 1;
                Some(BackgroundTicket {
                    slide: slide.id,
                    epoch: self.epoch,
                })
            }
        }
    }

    /// Deliver the result of an image background load.
    ///
    /// Stale tickets (slide switched, background replaced, adapter disposed)
    /// are dropped silently; failed loads are logged and leave the prior
    /// background visible. Never errors and never paints onto the wrong slide.
    pub fn complete_background_load(
        &mut self,
        ticket: BackgroundTicket,
        result: DeckleResult<PreparedImage>,
    ) {
        if self.mounted != Some(ticket.slide) || self.epoch != ticket.epoch {
            tracing::debug!(slide = ticket.slide.as_u64(), "dropping stale background load");
            return;
        }
        match result {
            Ok(image) => {
                if let Some(stage) = self.stage.as_mut() {
                    stage.set_background_image(image);
                }
            }
            Err(err) => {
                tracing::warn!(
                    slide = ticket.slide.as_u64(),
                    error = %err,
                    "background image failed to load; keeping previous background"
                );
            }
        }
    }

    /// Node handle for an overlay, if one is live.
    pub fn node_id(&self, overlay: OverlayId) -> Option<NodeId> {
        self.nodes.get(&overlay).copied()
    }

    /// O(1) lookup of the live node for an overlay.
    pub fn node(&self, overlay: OverlayId) -> Option<&TextNode> {
        let id = self.node_id(overlay)?;
        self.stage.as_ref()?.node(id)
    }

    /// Mutable lookup of the live node for an overlay.
    pub fn node_mut(&mut self, overlay: OverlayId) -> Option<&mut TextNode> {
        let id = self.node_id(overlay)?;
        self.stage.as_mut()?.node_mut(id)
    }

    /// Remove an overlay's node immediately (paired with a document delete so
    /// no stale node survives to the next render).
    pub fn remove_overlay(&mut self, overlay: OverlayId) -> bool {
        let Some(node_id) = self.nodes.remove(&overlay) else {
            return false;
        };
        self.stage
            .as_mut()
            .is_some_and(|stage| stage.remove(node_id))
    }

    /// Release the stage and all nodes; pending load tickets become stale.
    pub fn dispose(&mut self) {
        self.stage = None;
        self.mounted = None;
        self.nodes.clear();
        self.epoch += 1;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/adapter.rs"]
mod tests;
