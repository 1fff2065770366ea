// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pin definitions for node inputs/outputs.

use crate::node::NodeId;
use egui::Pos2;

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinDirection {
    /// Output pin, drawn on the right edge
    Output,
    /// Input pin, drawn on the left edge
    Input,
}

impl PinDirection {
    /// The direction a compatible peer must have
    pub fn opposite(self) -> Self {
        match self {
            Self::Output => Self::Input,
            Self::Input => Self::Output,
        }
    }

    /// Default display color for pins of this direction (for UI)
    pub fn color(self) -> [u8; 3] {
        match self {
            Self::Output => [255, 255, 255],
            Self::Input => [200, 200, 200],
        }
    }
}

/// Stable handle to a pin.
///
/// A handle stays valid while the graph grows; it is resolved against the
/// [`Graph`](crate::Graph) each time it is used instead of holding a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PinId {
    /// Owning node
    pub node: NodeId,
    /// Which pin list of the node
    pub direction: PinDirection,
    /// Index within that list
    pub index: usize,
}

impl PinId {
    /// Create a handle to an output pin
    pub fn output(node: NodeId, index: usize) -> Self {
        Self {
            node,
            direction: PinDirection::Output,
            index,
        }
    }

    /// Create a handle to an input pin
    pub fn input(node: NodeId, index: usize) -> Self {
        Self {
            node,
            direction: PinDirection::Input,
            index,
        }
    }
}

/// A connection endpoint on a node
#[derive(Debug, Clone, PartialEq)]
pub struct Pin {
    /// Position in graph space, derived from the owning node
    pub position: Pos2,
    /// Display color
    pub color: [u8; 3],
    /// Pin direction
    pub direction: PinDirection,
    /// Connected peer, if any. Always mirrored by the peer.
    pub connection: Option<PinId>,
}

impl Pin {
    /// Create an unconnected pin
    pub fn new(direction: PinDirection, position: Pos2) -> Self {
        Self {
            position,
            color: direction.color(),
            direction,
            connection: None,
        }
    }

    /// Check if a connection to another pin is valid
    pub fn can_connect(&self, other: &Pin) -> bool {
        other.direction == self.direction.opposite()
    }

    /// Check whether `point` lies within `radius` of this pin's center
    pub fn hit(&self, point: Pos2, radius: f32) -> bool {
        self.position.distance(point) <= radius
    }
}
