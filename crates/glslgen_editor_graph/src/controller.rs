// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pointer/keyboard interaction: node creation, node dragging and pin linking.
//!
//! The controller is driven once per frame with a [`FrameInput`] snapshot and
//! mutates the [`Graph`] it is handed. It holds only handles, never references,
//! and re-resolves them at the start of every frame.

use crate::graph::{Graph, GraphError};
use crate::node::{NodeId, NodeType};
use crate::pin::PinId;
use egui::Pos2;

/// Input polled for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Pointer position in graph space
    pub pointer: Pos2,
    /// "Add node" key went down this frame
    pub create_pressed: bool,
    /// Primary button went down this frame
    pub primary_pressed: bool,
    /// Primary button is held
    pub primary_down: bool,
    /// Primary button went up this frame
    pub primary_released: bool,
}

impl FrameInput {
    /// Pointer at `pointer`, nothing pressed
    pub fn at(pointer: Pos2) -> Self {
        Self {
            pointer,
            ..Default::default()
        }
    }

    /// Read this frame's input from egui, with `origin` mapped to the graph origin
    pub fn from_egui(input: &egui::InputState, origin: Pos2, create_key: egui::Key, last_pointer: Pos2) -> Self {
        let pointer = input.pointer.latest_pos().unwrap_or(last_pointer + origin.to_vec2());
        Self {
            pointer: pointer - origin.to_vec2(),
            create_pressed: input.key_pressed(create_key),
            primary_pressed: input.pointer.primary_pressed(),
            primary_down: input.pointer.primary_down(),
            primary_released: input.pointer.primary_released(),
        }
    }
}

/// Interaction state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InteractionState {
    /// Nothing grabbed
    #[default]
    Idle,
    /// A node follows the pointer
    DraggingNode(NodeId),
    /// A link is being dragged out of a pin
    DraggingConnection(PinId),
}

/// What happened during one [`InteractionController::update`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Node created by the "add node" command
    pub created: Option<NodeId>,
    /// Outcome of a connect attempt finished this frame
    pub connect: Option<Result<(), GraphError>>,
}

/// Translates per-frame input into graph mutations
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    state: InteractionState,
}

impl InteractionController {
    /// Create an idle controller
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// Run one frame: create, press, hold, release, in that order
    pub fn update(&mut self, graph: &mut Graph, input: &FrameInput, node_type: &NodeType) -> FrameReport {
        let mut report = FrameReport::default();
        self.revalidate(graph);

        if input.create_pressed {
            let id = graph.add_node(input.pointer, node_type);
            tracing::debug!(node = ?id, at = ?input.pointer, "node added");
            report.created = Some(id);
        }

        if input.primary_pressed {
            self.press(graph, input.pointer);
        }

        if input.primary_down {
            if let InteractionState::DraggingNode(node_id) = self.state {
                if graph.move_node(node_id, input.pointer).is_err() {
                    self.state = InteractionState::Idle;
                }
            }
        }

        if input.primary_released {
            report.connect = self.release(graph, input.pointer);
        }

        report
    }

    /// Source pin and pointer while a link is being dragged
    pub fn preview_line(&self, graph: &Graph, pointer: Pos2) -> Option<[Pos2; 2]> {
        match self.state {
            InteractionState::DraggingConnection(pin) => Some([graph.pin_position(pin)?, pointer]),
            _ => None,
        }
    }

    fn revalidate(&mut self, graph: &Graph) {
        let valid = match self.state {
            InteractionState::Idle => true,
            InteractionState::DraggingNode(node) => graph.node(node).is_some(),
            InteractionState::DraggingConnection(pin) => graph.pin(pin).is_some(),
        };
        if !valid {
            tracing::debug!(state = ?self.state, "grabbed handle no longer resolves");
            self.state = InteractionState::Idle;
        }
    }

    fn press(&mut self, graph: &Graph, pointer: Pos2) {
        self.state = match graph.find_pin_at(pointer) {
            Ok(pin) => InteractionState::DraggingConnection(pin),
            Err(_) => match graph.find_node_at(pointer) {
                Ok(node) => InteractionState::DraggingNode(node),
                Err(_) => InteractionState::Idle,
            },
        };
    }

    fn release(&mut self, graph: &mut Graph, pointer: Pos2) -> Option<Result<(), GraphError>> {
        let state = std::mem::take(&mut self.state);
        let InteractionState::DraggingConnection(source) = state else {
            return None;
        };

        let outcome = graph
            .find_pin_at(pointer)
            .and_then(|target| graph.connect(source, target).map(|()| target));

        match outcome {
            Ok(target) => {
                tracing::debug!(from = ?source, to = ?target, "pins connected");
                Some(Ok(()))
            }
            Err(e) => {
                tracing::debug!(from = ?source, error = %e, "connect attempt failed");
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeRegistry;
    use egui::pos2;

    fn node_type() -> NodeType {
        NodeRegistry::with_builtin().default_type().unwrap().clone()
    }

    fn press(at: Pos2) -> FrameInput {
        FrameInput {
            primary_pressed: true,
            primary_down: true,
            ..FrameInput::at(at)
        }
    }

    fn hold(at: Pos2) -> FrameInput {
        FrameInput {
            primary_down: true,
            ..FrameInput::at(at)
        }
    }

    fn release(at: Pos2) -> FrameInput {
        FrameInput {
            primary_released: true,
            ..FrameInput::at(at)
        }
    }

    fn create(at: Pos2) -> FrameInput {
        FrameInput {
            create_pressed: true,
            ..FrameInput::at(at)
        }
    }

    const ORIGIN: Pos2 = pos2(10.0, 20.0);

    /// Feed one frame of raw events through egui and map its input
    fn poll(ctx: &egui::Context, events: Vec<egui::Event>, last_pointer: Pos2) -> FrameInput {
        let mut input = FrameInput::default();
        let raw = egui::RawInput {
            events,
            ..Default::default()
        };
        let _ = ctx.run(raw, |ctx| {
            input = ctx.input(|i| FrameInput::from_egui(i, ORIGIN, egui::Key::Space, last_pointer));
        });
        input
    }

    fn button(pos: Pos2, pressed: bool) -> egui::Event {
        egui::Event::PointerButton {
            pos,
            button: egui::PointerButton::Primary,
            pressed,
            modifiers: egui::Modifiers::default(),
        }
    }

    #[test]
    fn test_from_egui_maps_pointer_and_edges() {
        let ctx = egui::Context::default();
        let screen = pos2(110.0, 70.0);
        let space = egui::Event::Key {
            key: egui::Key::Space,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers: egui::Modifiers::default(),
        };

        let pressed = poll(&ctx, vec![egui::Event::PointerMoved(screen), button(screen, true), space], Pos2::ZERO);
        assert_eq!(
            pressed,
            FrameInput {
                pointer: pos2(100.0, 50.0),
                create_pressed: true,
                primary_pressed: true,
                primary_down: true,
                primary_released: false,
            }
        );

        let held = poll(&ctx, vec![], pressed.pointer);
        assert_eq!(held, hold(pos2(100.0, 50.0)));

        let released = poll(&ctx, vec![button(screen, false)], held.pointer);
        assert_eq!(released, release(pos2(100.0, 50.0)));

        // Pointer left the window: keep the last graph-space position
        let gone = poll(&ctx, vec![egui::Event::PointerGone], pos2(5.0, 5.0));
        assert_eq!(gone, FrameInput::at(pos2(5.0, 5.0)));
    }

    #[test]
    fn test_create_then_drag() {
        let ty = node_type();
        let mut graph = Graph::new();
        let mut ctl = InteractionController::new();

        let report = ctl.update(&mut graph, &create(pos2(400.0, 225.0)), &ty);
        let id = report.created.unwrap();
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.node(id).unwrap().position, pos2(350.0, 175.0));
        assert_eq!(ctl.state(), InteractionState::Idle);

        ctl.update(&mut graph, &press(pos2(400.0, 225.0)), &ty);
        assert_eq!(ctl.state(), InteractionState::DraggingNode(id));

        ctl.update(&mut graph, &hold(pos2(450.0, 260.0)), &ty);
        ctl.update(&mut graph, &hold(pos2(500.0, 300.0)), &ty);
        let report = ctl.update(&mut graph, &release(pos2(500.0, 300.0)), &ty);

        assert_eq!(report.connect, None);
        assert_eq!(ctl.state(), InteractionState::Idle);
        let node = graph.node(id).unwrap();
        assert_eq!(node.position, pos2(450.0, 250.0));
        assert_eq!(node.outputs[0].position, pos2(550.0, 250.0));
    }

    #[test]
    fn test_drag_connection_links_pins() {
        let ty = node_type();
        let mut graph = Graph::new();
        let a = graph.add_node(pos2(100.0, 100.0), &ty);
        let b = graph.add_node(pos2(350.0, 100.0), &ty);
        let out = PinId::output(a, 0);
        let inp = PinId::input(b, 1);
        let mut ctl = InteractionController::new();

        ctl.update(&mut graph, &press(pos2(150.0, 50.0)), &ty);
        assert_eq!(ctl.state(), InteractionState::DraggingConnection(out));

        ctl.update(&mut graph, &hold(pos2(220.0, 70.0)), &ty);
        assert_eq!(
            ctl.preview_line(&graph, pos2(220.0, 70.0)),
            Some([pos2(150.0, 50.0), pos2(220.0, 70.0)])
        );
        // Dragging a link never moves the node
        assert_eq!(graph.node(a).unwrap().position, pos2(50.0, 50.0));

        let report = ctl.update(&mut graph, &release(pos2(300.0, 80.0)), &ty);
        assert_eq!(report.connect, Some(Ok(())));
        assert_eq!(graph.pin(out).unwrap().connection, Some(inp));
        assert_eq!(graph.pin(inp).unwrap().connection, Some(out));
        assert_eq!(ctl.state(), InteractionState::Idle);
        assert_eq!(ctl.preview_line(&graph, Pos2::ZERO), None);
    }

    #[test]
    fn test_pin_takes_priority_over_node() {
        let ty = node_type();
        let mut graph = Graph::new();
        let a = graph.add_node(pos2(100.0, 100.0), &ty);
        let mut ctl = InteractionController::new();

        // Inside the node box and within an input pin's radius
        ctl.update(&mut graph, &press(pos2(55.0, 82.0)), &ty);
        assert_eq!(ctl.state(), InteractionState::DraggingConnection(PinId::input(a, 1)));
    }

    #[test]
    fn test_release_on_same_direction_fails() {
        let ty = node_type();
        let mut graph = Graph::new();
        let a = graph.add_node(pos2(100.0, 100.0), &ty);
        let b = graph.add_node(pos2(350.0, 100.0), &ty);
        let mut ctl = InteractionController::new();

        ctl.update(&mut graph, &press(pos2(150.0, 50.0)), &ty);
        let report = ctl.update(&mut graph, &release(pos2(400.0, 50.0)), &ty);

        assert_eq!(report.connect, Some(Err(GraphError::IncompatiblePinDirection)));
        assert_eq!(graph.pin(PinId::output(a, 0)).unwrap().connection, None);
        assert_eq!(graph.pin(PinId::output(b, 0)).unwrap().connection, None);
        assert_eq!(ctl.state(), InteractionState::Idle);
    }

    #[test]
    fn test_release_on_empty_space_fails() {
        let ty = node_type();
        let mut graph = Graph::new();
        graph.add_node(pos2(100.0, 100.0), &ty);
        let mut ctl = InteractionController::new();

        ctl.update(&mut graph, &press(pos2(150.0, 50.0)), &ty);
        let report = ctl.update(&mut graph, &release(pos2(600.0, 400.0)), &ty);

        assert_eq!(report.connect, Some(Err(GraphError::PinNotFound)));
        assert_eq!(graph.connection_count(), 0);
        assert_eq!(ctl.state(), InteractionState::Idle);
    }

    #[test]
    fn test_press_on_empty_space_stays_idle() {
        let ty = node_type();
        let mut graph = Graph::new();
        graph.add_node(pos2(100.0, 100.0), &ty);
        let mut ctl = InteractionController::new();

        ctl.update(&mut graph, &press(pos2(600.0, 400.0)), &ty);
        assert_eq!(ctl.state(), InteractionState::Idle);
        ctl.update(&mut graph, &hold(pos2(10.0, 10.0)), &ty);
        assert_eq!(graph.nodes().next().unwrap().position, pos2(50.0, 50.0));
    }

    #[test]
    fn test_create_while_dragging_keeps_handle() {
        let ty = node_type();
        let mut graph = Graph::new();
        let a = graph.add_node(pos2(100.0, 100.0), &ty);
        let mut ctl = InteractionController::new();

        ctl.update(&mut graph, &press(pos2(100.0, 100.0)), &ty);
        let frame = FrameInput {
            create_pressed: true,
            ..hold(pos2(200.0, 200.0))
        };
        let report = ctl.update(&mut graph, &frame, &ty);

        assert!(report.created.is_some());
        assert_eq!(graph.node_count(), 2);
        assert_eq!(ctl.state(), InteractionState::DraggingNode(a));
        assert_eq!(graph.node(a).unwrap().position, pos2(150.0, 150.0));
    }

    #[test]
    fn test_dangling_handle_drops_to_idle() {
        let ty = node_type();
        let mut graph = Graph::new();
        graph.add_node(pos2(100.0, 100.0), &ty);
        let mut ctl = InteractionController::new();
        ctl.update(&mut graph, &press(pos2(150.0, 50.0)), &ty);

        // Same controller against a graph that never had that pin
        let mut other = Graph::new();
        let report = ctl.update(&mut other, &release(pos2(150.0, 50.0)), &ty);
        assert_eq!(report.connect, None);
        assert_eq!(ctl.state(), InteractionState::Idle);
    }
}
