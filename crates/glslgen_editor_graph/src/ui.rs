// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph editor widget: polls egui input, drives the controller, paints the graph.
//!
//! Graph space is the editor panel's local space: the panel's top-left corner
//! is the graph origin.

use crate::controller::{FrameInput, FrameReport, InteractionController};
use crate::graph::Graph;
use crate::node::{Node, NodeRegistry};
use crate::pin::Pin;
use egui::{Color32, Pos2, Rect, Stroke, Vec2};

const CONNECTION_THICKNESS: f32 = 1.0;
const LABEL_PADDING: f32 = 6.0;
const HINT_TEXT: &str = "Press [SPACE] to add a node!";

const BACKGROUND: Color32 = Color32::from_rgb(80, 80, 80);
const NODE_FILL: Color32 = Color32::BLACK;
const LINK_COLOR: Color32 = Color32::WHITE;
const HINT_COLOR: Color32 = Color32::from_rgb(200, 200, 200);

/// Graph editor UI state
pub struct GraphEditor {
    /// Interaction state machine
    pub controller: InteractionController,
    /// Node types available to the "add node" command
    pub registry: NodeRegistry,
    /// Key that adds a node under the pointer
    pub create_key: egui::Key,
    last_pointer: Pos2,
}

impl GraphEditor {
    /// Create an editor with the built-in node type and `Space` as the add key
    pub fn new() -> Self {
        Self::with_registry(NodeRegistry::with_builtin(), egui::Key::Space)
    }

    /// Create an editor with a custom registry and add key
    pub fn with_registry(registry: NodeRegistry, create_key: egui::Key) -> Self {
        Self {
            controller: InteractionController::new(),
            registry,
            create_key,
            last_pointer: Pos2::ZERO,
        }
    }

    /// Run one frame of the editor inside `ui`
    pub fn ui(&mut self, ui: &mut egui::Ui, graph: &mut Graph) -> FrameReport {
        let rect = ui.available_rect_before_wrap();
        let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        let input = ui.input(|i| FrameInput::from_egui(i, rect.min, self.create_key, self.last_pointer));
        self.last_pointer = input.pointer;

        let report = match self.registry.default_type() {
            Some(node_type) => self.controller.update(graph, &input, node_type),
            None => FrameReport::default(),
        };

        if response.hovered() && input.primary_down {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
        }

        let offset = rect.min.to_vec2();
        painter.rect_filled(rect, 0.0, BACKGROUND);
        if graph.is_empty() {
            draw_hint(&painter, rect);
        } else {
            draw_nodes(&painter, offset, graph);
            draw_connections(&painter, offset, graph);
        }
        if let Some([from, to]) = self.controller.preview_line(graph, input.pointer) {
            painter.line_segment([from + offset, to + offset], Stroke::new(CONNECTION_THICKNESS, LINK_COLOR));
        }

        report
    }
}

impl Default for GraphEditor {
    fn default() -> Self {
        Self::new()
    }
}

fn draw_hint(painter: &egui::Painter, rect: Rect) {
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        HINT_TEXT,
        egui::FontId::proportional(20.0),
        HINT_COLOR,
    );
}

fn draw_nodes(painter: &egui::Painter, offset: Vec2, graph: &Graph) {
    for node in graph.nodes() {
        draw_node(painter, offset, graph, node);
    }
}

fn draw_node(painter: &egui::Painter, offset: Vec2, graph: &Graph, node: &Node) {
    let rect = node.rect().translate(offset);
    let pin_radius = graph.layout().pin_hit_radius;
    painter.rect_filled(rect, 0.0, NODE_FILL);

    painter.text(
        rect.min + Vec2::new(rect.width() * 0.5, LABEL_PADDING),
        egui::Align2::CENTER_TOP,
        &node.node_type,
        egui::FontId::proportional(12.0),
        Color32::WHITE,
    );

    for (_, pin) in node.pins() {
        draw_pin(painter, offset, pin, pin_radius);
    }
}

fn draw_pin(painter: &egui::Painter, offset: Vec2, pin: &Pin, radius: f32) {
    let [r, g, b] = pin.color;
    painter.circle_filled(pin.position + offset, radius, Color32::from_rgb(r, g, b));
}

fn draw_connections(painter: &egui::Painter, offset: Vec2, graph: &Graph) {
    for (from, to) in graph.connections() {
        if let (Some(a), Some(b)) = (graph.pin_position(from), graph.pin_position(to)) {
            painter.line_segment([a + offset, b + offset], Stroke::new(CONNECTION_THICKNESS, LINK_COLOR));
        }
    }
}
