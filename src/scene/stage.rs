use std::collections::HashMap;

use kurbo::{Point, Rect};

use crate::{
    assets::decode::PreparedImage,
    document::model::OverlayId,
    foundation::core::{Color, StageSize},
    scene::codec::TextNodeParams,
};

/// Identifier of a retained node within one [`Stage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

/// A retained text node inside the stage.
///
/// The `overlay` tag is set at creation and is the sole key correlating the
/// node back to its document overlay; nodes are never matched by geometry.
#[derive(Clone, Debug)]
pub struct TextNode {
    /// Document overlay this node renders.
    pub overlay: OverlayId,
    /// Current drawing parameters.
    pub params: TextNodeParams,
    /// Whether the node is drawn and hit-testable (hidden during inline edit).
    pub visible: bool,
}

/// Background fill of a stage.
#[derive(Clone, Debug)]
pub enum StageBackground {
    /// Solid color fill.
    Color(Color),
    /// Decoded image, scaled to fill the stage at draw time.
    Image(PreparedImage),
}

/// One retained-mode rendering surface: a sized canvas holding a background
/// and an ordered set of text nodes.
///
/// A stage is an instance-scoped object (constructed per mounted editor or per
/// offline export), never shared module state.
#[derive(Debug)]
pub struct Stage {
    size: StageSize,
    background: StageBackground,
    nodes: HashMap<NodeId, TextNode>,
    order: Vec<NodeId>,
    next_node: u64,
}

impl Stage {
    /// Create an empty stage with a white background.
    pub fn new(size: StageSize) -> Self {
        Self {
            size,
            background: StageBackground::Color(Color::WHITE),
            nodes: HashMap::new(),
            order: Vec::new(),
            next_node: 1,
        }
    }

    /// Surface dimensions.
    pub fn size(&self) -> StageSize {
        self.size
    }

    /// Resize the surface. Node coordinates are left untouched.
    pub fn set_size(&mut self, size: StageSize) {
        self.size = size;
    }

    /// Current background fill.
    pub fn background(&self) -> &StageBackground {
        &self.background
    }

    /// Replace the background with a solid color.
    pub fn set_background_color(&mut self, color: Color) {
        self.background = StageBackground::Color(color);
    }

    /// Replace the background with a decoded image.
    pub fn set_background_image(&mut self, image: PreparedImage) {
        self.background = StageBackground::Image(image);
    }

    /// Add a text node tagged with its overlay id; returns the node handle.
    pub fn add_text(&mut self, overlay: OverlayId, params: TextNodeParams) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        self.nodes.insert(
            id,
            TextNode {
                overlay,
                params,
                visible: true,
            },
        );
        self.order.push(id);
        id
    }

    /// Remove a node; returns whether it existed.
    pub fn remove(&mut self, id: NodeId) -> bool {
        let existed = self.nodes.remove(&id).is_some();
        if existed {
            self.order.retain(|n| *n != id);
        }
        existed
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Option<&TextNode> {
        self.nodes.get(&id)
    }

    /// Look up a node mutably.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut TextNode> {
        self.nodes.get_mut(&id)
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the stage holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Nodes in paint order (bottom first).
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &TextNode)> {
        self.order.iter().filter_map(|id| Some((*id, self.nodes.get(id)?)))
    }

    /// Topmost visible node containing a stage-space point.
    pub fn hit_test(&self, p: Point) -> Option<NodeId> {
        self.order
            .iter()
            .rev()
            .copied()
            .find(|id| {
                self.nodes
                    .get(id)
                    .is_some_and(|n| n.visible && n.params.contains(p))
            })
    }

    /// Axis-aligned stage-space bounds of a node.
    pub fn node_bounds(&self, id: NodeId) -> Option<Rect> {
        Some(self.nodes.get(&id)?.params.bounds())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/stage.rs"]
mod tests;
