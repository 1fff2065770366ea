// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fixed node and pin geometry.

use crate::pin::PinDirection;
use egui::{Vec2, vec2};
use serde::{Deserialize, Serialize};

/// Default node size
pub const NODE_SIZE: Vec2 = vec2(100.0, 100.0);
/// Vertical distance between consecutive pins on one edge
pub const PIN_SPACING: f32 = 30.0;
/// Pointer distance at which a pin counts as hit
pub const PIN_HIT_RADIUS: f32 = 10.0;

/// Geometry shared by every node in a graph
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphLayout {
    /// Node size (width, height)
    pub node_size: [f32; 2],
    /// Vertical pin spacing
    pub pin_spacing: f32,
    /// Hit-test radius around each pin center
    pub pin_hit_radius: f32,
}

impl GraphLayout {
    /// Node size as a vector
    pub fn size(&self) -> Vec2 {
        Vec2::from(self.node_size)
    }

    /// Offset of a pin from its node's top-left corner
    pub fn pin_offset(&self, direction: PinDirection, index: usize) -> Vec2 {
        let x = match direction {
            PinDirection::Output => self.node_size[0],
            PinDirection::Input => 0.0,
        };
        vec2(x, index as f32 * self.pin_spacing)
    }
}

impl Default for GraphLayout {
    fn default() -> Self {
        Self {
            node_size: [NODE_SIZE.x, NODE_SIZE.y],
            pin_spacing: PIN_SPACING,
            pin_hit_radius: PIN_HIT_RADIUS,
        }
    }
}
