// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node graph model and interaction for the GLSL Generator editor.
//!
//! ## Architecture
//!
//! - [`Graph`] owns nodes in creation order; nodes own their input/output pins.
//! - Pins link to exactly one peer of the opposite direction, stored on both
//!   ends as a [`PinId`] handle.
//! - [`InteractionController`] turns a per-frame [`FrameInput`] into graph
//!   mutations (add, drag, connect).
//! - [`ui::GraphEditor`] is the egui front end: it polls input, runs the
//!   controller and paints the graph.

pub mod controller;
pub mod graph;
pub mod layout;
pub mod node;
pub mod pin;
pub mod ui;

pub use controller::{FrameInput, FrameReport, InteractionController, InteractionState};
pub use graph::{Graph, GraphError};
pub use layout::GraphLayout;
pub use node::{Node, NodeId, NodeRegistry, NodeType};
pub use pin::{Pin, PinDirection, PinId};
