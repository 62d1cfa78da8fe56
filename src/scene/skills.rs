use std::time::Duration;

use glam::Vec2;
use petgraph::graph::UnGraph;

use crate::{
    network::Network,
    properties::{Body, BodyId},
    stage::{Animation, SimContext, Viewport},
    surface::Surface,
};

/// Label and fractional viewport position of every skill node.
pub const SKILLS: [(&str, f32, f32); 6] = [
    ("JavaScript", 0.3, 0.4),
    ("React", 0.5, 0.3),
    ("WebGL", 0.7, 0.45),
    ("Node.js", 0.4, 0.6),
    ("Architecture", 0.6, 0.65),
    ("Performance", 0.5, 0.5),
];

const LINK_DISTANCE: f32 = 300.0;
const REPEL_RADIUS: f32 = 120.0;
const HOVER_RADIUS: f32 = 50.0;
const UPDATE_RATE: u32 = 30;

/// Labelled nodes linked by proximity; the node under the pointer lights up.
pub struct SkillGraph {
    network: Network,
    active: bool,
    hovered: Option<BodyId>,
}

impl SkillGraph {
    pub fn new(viewport: Viewport) -> Self {
        let mut graph = UnGraph::new_undirected();
        let nodes: Vec<_> = SKILLS
            .iter()
            .map(|&(label, fx, fy)| {
                let position = Vec2::new(viewport.width * fx, viewport.height * fy);
                graph.add_node(Body::new(position).with_label(label))
            })
            .collect();

        for (i, &a) in nodes.iter().enumerate() {
            for &b in nodes.iter().skip(i + 1) {
                if graph[a].position.distance(graph[b].position) < LINK_DISTANCE {
                    graph.add_edge(a, b, ());
                }
            }
        }

        Self {
            network: Network::builder()
                .repel_radius(REPEL_RADIUS)
                .update_rate(UPDATE_RATE)
                .build(graph),
            active: true,
            hovered: None,
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// While inactive the graph neither simulates nor draws.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        if !active {
            self.hovered = None;
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn hovered(&self) -> Option<BodyId> {
        self.hovered
    }

    pub fn hovered_label(&self) -> Option<&str> {
        self.hovered
            .and_then(|id| self.network.body(id))
            .map(|b| b.label.as_str())
    }
}

impl Animation for SkillGraph {
    fn tick(&mut self, ctx: &SimContext, now: Duration) {
        if !self.active {
            return;
        }
        if self.network.step_at(ctx.pointer(), now) {
            self.hovered = self.network.hovered(ctx.pointer(), HOVER_RADIUS);
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        if self.active {
            self.network.draw(surface, self.hovered, true);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        stage::HostInput,
        surface::{DrawCommand, RecordingSurface},
    };

    fn viewport() -> Viewport {
        Viewport::new(1280.0, 720.0)
    }

    #[test]
    fn test_links_by_proximity() {
        let skills = SkillGraph::new(viewport());
        let network = skills.network();
        assert_eq!(network.len(), 6);
        assert_eq!(network.connectors().len(), 12);
        for c in network.connectors() {
            let a = network.body(c.a).unwrap().position;
            let b = network.body(c.b).unwrap().position;
            assert!(a.distance(b) < 300.0);
        }
        // JavaScript and WebGL are 512px apart
        assert!(!network
            .connectors()
            .iter()
            .any(|c| c.touches(BodyId(0)) && c.touches(BodyId(2))));
    }

    #[test]
    fn test_hover_highlights_node() {
        let mut skills = SkillGraph::new(viewport());
        let mut ctx = SimContext::new(viewport());
        ctx.apply(&HostInput::PointerMoved(Vec2::new(640.0, 360.0)));
        skills.tick(&ctx, Duration::ZERO);

        assert_eq!(skills.hovered(), Some(BodyId(5)));
        assert_eq!(skills.hovered_label(), Some("Performance"));

        let mut surface = RecordingSurface::new();
        skills.draw(&mut surface);
        assert_eq!(surface.count(|c| matches!(c, DrawCommand::Label { .. })), 1);
        assert_eq!(surface.count(|c| matches!(c, DrawCommand::FillCircle { .. })), 6);
    }

    #[test]
    fn test_inactive_graph_is_frozen() {
        let mut skills = SkillGraph::new(viewport());
        skills.set_active(false);
        let before = skills.network().positions();

        let mut ctx = SimContext::new(viewport());
        ctx.apply(&HostInput::PointerMoved(Vec2::new(380.0, 290.0)));
        skills.tick(&ctx, Duration::ZERO);
        assert_eq!(skills.network().positions(), before);
        assert_eq!(skills.hovered(), None);

        let mut surface = RecordingSurface::new();
        skills.draw(&mut surface);
        assert!(surface.commands.is_empty());

        skills.set_active(true);
        skills.tick(&ctx, Duration::from_millis(10));
        assert_ne!(skills.network().positions(), before);
        assert_eq!(skills.hovered_label(), Some("JavaScript"));
    }
}
