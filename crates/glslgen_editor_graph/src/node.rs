// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the graph.

use crate::layout::GraphLayout;
use crate::pin::{Pin, PinDirection, PinId};
use egui::{Pos2, Rect, Vec2};
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Node type definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeType {
    /// Unique type identifier
    pub id: String,
    /// Display name, drawn as the node's label
    pub name: String,
    /// Number of output pins
    pub outputs: usize,
    /// Number of input pins
    pub inputs: usize,
}

impl NodeType {
    /// Create a node type
    pub fn new(id: impl Into<String>, name: impl Into<String>, outputs: usize, inputs: usize) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            outputs,
            inputs,
        }
    }
}

/// A draggable box owning its pins
#[derive(Debug, Clone)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Type label
    pub node_type: String,
    /// Top-left corner in graph space
    pub position: Pos2,
    /// Fixed size
    pub size: Vec2,
    /// Output pins, right edge
    pub outputs: Vec<Pin>,
    /// Input pins, left edge
    pub inputs: Vec<Pin>,
}

impl Node {
    /// Create a node of `node_type` centered on `center`, with pins already placed
    pub fn new(node_type: &NodeType, center: Pos2, layout: &GraphLayout) -> Self {
        let size = layout.size();
        let mut node = Self {
            id: NodeId::new(),
            node_type: node_type.name.clone(),
            position: center - size * 0.5,
            size,
            outputs: vec![Pin::new(PinDirection::Output, Pos2::ZERO); node_type.outputs],
            inputs: vec![Pin::new(PinDirection::Input, Pos2::ZERO); node_type.inputs],
        };
        node.recompute_pin_positions(layout);
        node
    }

    /// Bounding box
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.position, self.size)
    }

    /// Whether `point` lies in the bounding box; the right and bottom edges are outside
    pub fn contains(&self, point: Pos2) -> bool {
        let max = self.position + self.size;
        point.x >= self.position.x && point.x < max.x && point.y >= self.position.y && point.y < max.y
    }

    /// Re-derive every pin position from the node's current position
    pub fn recompute_pin_positions(&mut self, layout: &GraphLayout) {
        for (i, pin) in self.outputs.iter_mut().enumerate() {
            pin.position = self.position + layout.pin_offset(PinDirection::Output, i);
        }
        for (i, pin) in self.inputs.iter_mut().enumerate() {
            pin.position = self.position + layout.pin_offset(PinDirection::Input, i);
        }
    }

    /// Get a pin by direction and index
    pub fn pin(&self, direction: PinDirection, index: usize) -> Option<&Pin> {
        match direction {
            PinDirection::Output => self.outputs.get(index),
            PinDirection::Input => self.inputs.get(index),
        }
    }

    /// Get a mutable pin by direction and index
    pub fn pin_mut(&mut self, direction: PinDirection, index: usize) -> Option<&mut Pin> {
        match direction {
            PinDirection::Output => self.outputs.get_mut(index),
            PinDirection::Input => self.inputs.get_mut(index),
        }
    }

    /// Iterate pins with their handles, outputs first
    pub fn pins(&self) -> impl Iterator<Item = (PinId, &Pin)> {
        let id = self.id;
        let outputs = self.outputs.iter().enumerate().map(move |(i, p)| (PinId::output(id, i), p));
        let inputs = self.inputs.iter().enumerate().map(move |(i, p)| (PinId::input(id, i), p));
        outputs.chain(inputs)
    }
}

/// Registry of available node types
pub struct NodeRegistry {
    types: indexmap::IndexMap<String, NodeType>,
}

impl NodeRegistry {
    /// Identifier of the built-in node type
    pub const DEFAULT_TYPE: &'static str = "default";

    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            types: indexmap::IndexMap::new(),
        }
    }

    /// Create a registry holding the built-in node type (one output, two inputs)
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(NodeType::new(Self::DEFAULT_TYPE, "Node", 1, 2));
        registry
    }

    /// Register a node type, replacing any type with the same ID
    pub fn register(&mut self, node_type: NodeType) {
        self.types.insert(node_type.id.clone(), node_type);
    }

    /// Get a node type by ID
    pub fn get(&self, id: &str) -> Option<&NodeType> {
        self.types.get(id)
    }

    /// The type created by the "add node" command: the built-in one if present,
    /// otherwise the first registered
    pub fn default_type(&self) -> Option<&NodeType> {
        self.get(Self::DEFAULT_TYPE)
            .or_else(|| self.types.first().map(|(_, t)| t))
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}
