// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data structure owning nodes and their pin links.

use crate::layout::GraphLayout;
use crate::node::{Node, NodeId, NodeType};
use crate::pin::{Pin, PinId};
use egui::Pos2;
use indexmap::IndexMap;

/// A node graph
///
/// Nodes are kept in creation order, which is also hit-test and draw order.
/// Everything outside the graph refers to nodes and pins through
/// [`NodeId`]/[`PinId`] handles, so appending nodes never invalidates them.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    layout: GraphLayout,
    nodes: IndexMap<NodeId, Node>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty graph with custom geometry
    pub fn with_layout(layout: GraphLayout) -> Self {
        Self {
            layout,
            nodes: IndexMap::new(),
        }
    }

    /// Node and pin geometry
    pub fn layout(&self) -> &GraphLayout {
        &self.layout
    }

    /// Append a node of `node_type` centered at `at`
    pub fn add_node(&mut self, at: Pos2, node_type: &NodeType) -> NodeId {
        let node = Node::new(node_type, at, &self.layout);
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    /// Get all nodes in creation order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resolve a pin handle
    pub fn pin(&self, pin_id: PinId) -> Option<&Pin> {
        self.nodes.get(&pin_id.node)?.pin(pin_id.direction, pin_id.index)
    }

    fn pin_mut(&mut self, pin_id: PinId) -> Option<&mut Pin> {
        self.nodes.get_mut(&pin_id.node)?.pin_mut(pin_id.direction, pin_id.index)
    }

    /// Current position of a pin
    pub fn pin_position(&self, pin_id: PinId) -> Option<Pos2> {
        self.pin(pin_id).map(|p| p.position)
    }

    /// Re-derive the pin positions of one node
    pub fn recompute_pin_positions(&mut self, node_id: NodeId) -> Result<(), GraphError> {
        let layout = self.layout;
        let node = self.nodes.get_mut(&node_id).ok_or(GraphError::NodeNotFound)?;
        node.recompute_pin_positions(&layout);
        Ok(())
    }

    /// Center a node on `pointer` and carry its pins along
    pub fn move_node(&mut self, node_id: NodeId, pointer: Pos2) -> Result<(), GraphError> {
        let node = self.node_mut(node_id).ok_or(GraphError::NodeNotFound)?;
        node.position = pointer - node.size * 0.5;
        self.recompute_pin_positions(node_id)
    }

    /// Find the pin whose hit circle contains `point`.
    ///
    /// Output pins of all nodes are scanned before input pins; within each
    /// pass nodes are visited in creation order and the first hit wins.
    pub fn find_pin_at(&self, point: Pos2) -> Result<PinId, GraphError> {
        let radius = self.layout.pin_hit_radius;
        let outputs = self.nodes.values().flat_map(|node| {
            node.outputs
                .iter()
                .enumerate()
                .map(move |(i, pin)| (PinId::output(node.id, i), pin))
        });
        let inputs = self.nodes.values().flat_map(|node| {
            node.inputs
                .iter()
                .enumerate()
                .map(move |(i, pin)| (PinId::input(node.id, i), pin))
        });

        outputs
            .chain(inputs)
            .find(|(_, pin)| pin.hit(point, radius))
            .map(|(id, _)| id)
            .ok_or(GraphError::PinNotFound)
    }

    /// Find the first node (creation order) whose bounding box contains `point`
    pub fn find_node_at(&self, point: Pos2) -> Result<NodeId, GraphError> {
        self.nodes
            .values()
            .find(|node| node.contains(point))
            .map(|node| node.id)
            .ok_or(GraphError::NodeNotFound)
    }

    /// Link two pins of opposite direction.
    ///
    /// Either both ends are linked or nothing changes. A pin holds a single
    /// peer, so any previous link on either end is dropped first.
    pub fn connect(&mut self, a: PinId, b: PinId) -> Result<(), GraphError> {
        let pin_a = self.pin(a).ok_or(GraphError::PinNotFound)?;
        let pin_b = self.pin(b).ok_or(GraphError::PinNotFound)?;

        if !pin_a.can_connect(pin_b) {
            return Err(GraphError::IncompatiblePinDirection);
        }

        self.disconnect(a);
        self.disconnect(b);

        if let Some(pin) = self.pin_mut(a) {
            pin.connection = Some(b);
        }
        if let Some(pin) = self.pin_mut(b) {
            pin.connection = Some(a);
        }
        Ok(())
    }

    /// Drop the link on `pin_id` from both ends, returning the former peer
    pub fn disconnect(&mut self, pin_id: PinId) -> Option<PinId> {
        let peer = self.pin_mut(pin_id)?.connection.take()?;
        if let Some(peer_pin) = self.pin_mut(peer) {
            if peer_pin.connection == Some(pin_id) {
                peer_pin.connection = None;
            }
        }
        Some(peer)
    }

    /// Every link once, as `(output, input)`
    pub fn connections(&self) -> impl Iterator<Item = (PinId, PinId)> + '_ {
        self.nodes.values().flat_map(|node| {
            node.outputs
                .iter()
                .enumerate()
                .filter_map(move |(i, pin)| pin.connection.map(|peer| (PinId::output(node.id, i), peer)))
        })
    }

    /// Get the number of links
    pub fn connection_count(&self) -> usize {
        self.connections().count()
    }
}

/// Recoverable outcome of a graph lookup or connect attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// No pin at the queried point, or a pin handle no longer resolves
    #[error("Pin not found")]
    PinNotFound,

    /// No node at the queried point, or a node handle no longer resolves
    #[error("Node not found")]
    NodeNotFound,

    /// Both pins have the same direction
    #[error("Incompatible pin direction")]
    IncompatiblePinDirection,
}
