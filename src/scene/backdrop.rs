use std::time::Duration;

use glam::Vec2;
use log::info;
use petgraph::graph::{NodeIndex, UnGraph};

use crate::{
    network::Network,
    properties::Body,
    stage::{Animation, HostInput, SimContext, Viewport},
    surface::Surface,
};

const COLS: usize = 8;
const ROWS: usize = 6;
const REPEL_RADIUS: f32 = 80.0;
const UPDATE_RATE: u32 = 20;
const DIMMED_OPACITY: f32 = 0.1;
const DEFAULT_OPACITY: f32 = 0.2;

/// Full-window grid of lines that bends away from the pointer.
pub struct Backdrop {
    network: Network,
}

impl Backdrop {
    pub fn new(viewport: Viewport) -> Self {
        let mut backdrop = Self {
            network: Network::builder().empty(),
        };
        backdrop.rebuild(viewport);
        backdrop
    }

    /// Row neighbours are always linked; columns only on every second row and column.
    fn grid(viewport: Viewport) -> UnGraph<Body, ()> {
        let spacing_x = viewport.width / (COLS + 1) as f32;
        let spacing_y = viewport.height / (ROWS + 1) as f32;

        let mut graph = UnGraph::with_capacity(COLS * ROWS, COLS * ROWS);
        for i in 1..=ROWS {
            for j in 1..=COLS {
                graph.add_node(Body::new(Vec2::new(spacing_x * j as f32, spacing_y * i as f32)));
            }
        }

        for i in 0..ROWS {
            for j in 0..COLS - 1 {
                let idx = i * COLS + j;
                graph.add_edge(NodeIndex::new(idx), NodeIndex::new(idx + 1), ());
            }
        }
        for i in (0..ROWS - 1).step_by(2) {
            for j in (0..COLS).step_by(2) {
                let idx = i * COLS + j;
                graph.add_edge(NodeIndex::new(idx), NodeIndex::new(idx + COLS), ());
            }
        }
        graph
    }

    /// Discards the current grid and lays out a new one for `viewport`.
    pub fn rebuild(&mut self, viewport: Viewport) {
        self.network = Network::builder()
            .repel_radius(REPEL_RADIUS)
            .update_rate(UPDATE_RATE)
            .build(Self::grid(viewport));
        info!(
            "backdrop {}x{}: {} bodies, {} lines",
            viewport.width,
            viewport.height,
            self.network.len(),
            self.network.connectors().len()
        );
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn set_line_opacity(&mut self, opacity: f32) {
        self.network.set_connector_opacity(opacity);
    }

    /// Fades the grid while something in front of it is hovered.
    pub fn dim(&mut self) {
        self.set_line_opacity(DIMMED_OPACITY);
    }

    pub fn restore(&mut self) {
        self.set_line_opacity(DEFAULT_OPACITY);
    }
}

impl Animation for Backdrop {
    fn handle_input(&mut self, input: &HostInput, _ctx: &SimContext, _now: Duration) {
        if let HostInput::Resized(viewport) = input {
            self.rebuild(*viewport);
        }
    }

    fn tick(&mut self, ctx: &SimContext, now: Duration) {
        self.network.step_at(ctx.pointer(), now);
    }

    fn draw(&self, surface: &mut dyn Surface) {
        self.network.draw(surface, None, false);
    }
}
