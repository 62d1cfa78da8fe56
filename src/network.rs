use std::time::Duration;

use glam::Vec2;
use petgraph::{graph::UnGraph, visit::EdgeRef};

use crate::{
    properties::{Body, BodyId, Connector},
    surface::Surface,
    timer::FrameGate,
    vector::VectorOps,
};

/// Bodies stored in an arena plus connectors that refer to them by [`BodyId`].
#[derive(Clone, Debug)]
pub struct Network {
    bodies: Vec<Body>,
    connectors: Vec<Connector>,
    repel_radius: f32,
    gate: FrameGate,
}

impl Network {
    pub fn builder() -> NetworkBuilder {
        NetworkBuilder::default()
    }

    pub fn add_body(&mut self, body: Body) -> BodyId {
        let idx = self.bodies.len();
        self.bodies.push(body);
        BodyId(idx)
    }

    /// Links two existing bodies. Returns `None` when either handle is unknown.
    pub fn connect(&mut self, a: BodyId, b: BodyId) -> Option<usize> {
        if a.0 >= self.bodies.len() || b.0 >= self.bodies.len() {
            return None;
        }
        self.connectors.push(Connector::new(a, b));
        Some(self.connectors.len() - 1)
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.0)
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn repel_radius(&self) -> f32 {
        self.repel_radius
    }

    pub fn positions(&self) -> Vec<Vec2> {
        self.bodies.iter().map(|b| b.position).collect()
    }

    /// Pushes every body away from `pointer` and integrates it.
    ///
    /// Forces for a body are fully accumulated before that body integrates.
    pub fn step(&mut self, pointer: Vec2) {
        for body in self.bodies.iter_mut() {
            body.repel_from(pointer, self.repel_radius);
            body.update();
        }
    }

    /// Runs [`Network::step`] if the update cap allows it at `now`.
    pub fn step_at(&mut self, pointer: Vec2, now: Duration) -> bool {
        if !self.gate.ready(now) {
            return false;
        }
        self.step(pointer);
        true
    }

    /// First body within `radius` of `pointer`.
    pub fn hovered(&self, pointer: Vec2, radius: f32) -> Option<BodyId> {
        self.bodies
            .iter()
            .position(|b| b.position.dist(pointer) < radius)
            .map(BodyId)
    }

    pub fn set_connector_opacity(&mut self, opacity: f32) {
        for connector in self.connectors.iter_mut() {
            connector.opacity = opacity;
        }
    }

    /// Connectors first, then (optionally) bodies, so bodies sit on top.
    pub fn draw(&self, surface: &mut dyn Surface, highlight: Option<BodyId>, draw_bodies: bool) {
        for connector in self.connectors.iter() {
            let lit = highlight.is_some_and(|id| connector.touches(id));
            connector.draw(&self.bodies, surface, lit);
        }

        if draw_bodies {
            for (i, body) in self.bodies.iter().enumerate() {
                body.draw(surface, highlight == Some(BodyId(i)));
            }
        }
    }
}

impl From<UnGraph<Body, ()>> for Network {
    fn from(graph: UnGraph<Body, ()>) -> Self {
        NetworkBuilder::default().build(graph)
    }
}

/// Builder for `Network`
pub struct NetworkBuilder {
    repel_radius: f32,
    update_interval: Duration,
}

impl NetworkBuilder {
    /// Get a Instance of `NetworkBuilder` with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Distance from the pointer at which bodies start to get pushed away
    pub fn repel_radius(mut self, repel_radius: f32) -> Self {
        self.repel_radius = repel_radius;
        self
    }

    /// Minimum time between two simulation steps driven by `step_at`
    pub fn update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = interval;
        self
    }

    /// Convenience for `update_interval(1s / hz)`
    pub fn update_rate(self, hz: u32) -> Self {
        self.update_interval(Duration::from_secs(1) / hz.max(1))
    }

    /// Empty network
    pub fn empty(self) -> Network {
        Network {
            bodies: vec![],
            connectors: vec![],
            repel_radius: self.repel_radius,
            gate: FrameGate::new(self.update_interval),
        }
    }

    /// Takes node weights as bodies and every edge as a connector
    pub fn build(self, graph: UnGraph<Body, ()>) -> Network {
        let connectors = graph
            .edge_references()
            .map(|e| Connector::new(BodyId(e.source().index()), BodyId(e.target().index())))
            .collect::<Vec<_>>();

        let (nodes, _) = graph.into_nodes_edges();
        let mut network = self.empty();
        network.bodies = nodes.into_iter().map(|n| n.weight).collect();
        network.connectors = connectors;
        network
    }
}

impl Default for NetworkBuilder {
    /// Get a Instance of `NetworkBuilder` with default values
    fn default() -> Self {
        Self {
            repel_radius: 100.0,
            update_interval: Duration::from_secs(1) / 30,
        }
    }
}
