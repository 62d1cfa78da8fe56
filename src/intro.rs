//! Intro sequence: a node network grows around the canvas center, then
//! its nodes dissolve into particle text.

use std::{f32::consts::PI, fmt, time::Duration};

use glam::Vec2;
use log::{debug, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    font::BlockFont,
    formation::TextParticles,
    network::Network,
    properties::{Body, BodyId},
    sampler::TextRasterizer,
    stage::{Animation, HostInput, SimContext, Viewport},
    surface::Surface,
    timer::{Deadline, FrameClock, FrameGate},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Idle,
    Growing,
    Forming,
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Growing => "growing",
            Phase::Forming => "forming",
            Phase::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// Configuration for [`IntroController`]
#[derive(Clone, Debug)]
pub struct IntroConfig {
    pub text: String,
    pub max_nodes: usize,
    /// Chance per tick that the network grows by one node
    pub growth_chance: f32,
    /// New nodes are placed this far from the previous node's anchor
    pub growth_radius: (f32, f32),
    pub repel_radius: f32,
    pub update_rate: u32,
    /// Pause between the text settling and the phase completing
    pub settle_grace: Duration,
    /// Pause between completing and the finished callback
    pub exit_delay: Duration,
    pub seed: Option<u64>,
}

impl IntroConfig {
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn growth_chance(mut self, chance: f32) -> Self {
        self.growth_chance = chance;
        self
    }
}

impl Default for IntroConfig {
    fn default() -> Self {
        Self {
            text: "Code as interface".to_string(),
            max_nodes: 8,
            growth_chance: 0.15,
            growth_radius: (150.0, 200.0),
            repel_radius: 100.0,
            update_rate: 30,
            settle_grace: Duration::from_millis(600),
            exit_delay: Duration::from_millis(800),
            seed: None,
        }
    }
}

pub struct IntroController {
    config: IntroConfig,
    phase: Phase,
    network: Network,
    text: Option<TextParticles>,
    rasterizer: Box<dyn TextRasterizer>,
    rng: StdRng,
    gate: FrameGate,
    clock: FrameClock,
    grace: Option<Deadline>,
    exit: Option<Deadline>,
    finished: bool,
    on_finished: Option<Box<dyn FnMut()>>,
}

impl IntroController {
    pub fn new(viewport: Viewport, config: IntroConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut intro = Self {
            network: Network::builder().repel_radius(config.repel_radius).empty(),
            gate: FrameGate::per_second(config.update_rate),
            config,
            phase: Phase::Idle,
            text: None,
            rasterizer: Box::new(BlockFont::default()),
            rng,
            clock: FrameClock::new(),
            grace: None,
            exit: None,
            finished: false,
            on_finished: None,
        };
        intro.reset(viewport);
        intro
    }

    pub fn with_rasterizer(mut self, rasterizer: Box<dyn TextRasterizer>) -> Self {
        self.rasterizer = rasterizer;
        self
    }

    /// Called once, `exit_delay` after the phase becomes `Complete`.
    pub fn on_finished(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_finished = Some(Box::new(callback));
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn text(&self) -> Option<&TextParticles> {
        self.text.as_ref()
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    /// Single body in the middle of the canvas.
    fn reset(&mut self, viewport: Viewport) {
        self.network = Network::builder()
            .repel_radius(self.config.repel_radius)
            .empty();
        self.network.add_body(Body::new(viewport.center()));
    }

    fn set_phase(&mut self, phase: Phase) {
        debug!("intro {} -> {}", self.phase, phase);
        self.phase = phase;
    }

    /// Jumps straight to `Complete` from any earlier phase.
    pub fn skip(&mut self, now: Duration) {
        if self.phase != Phase::Complete && !self.finished {
            self.complete(now);
        }
    }

    fn complete(&mut self, now: Duration) {
        self.set_phase(Phase::Complete);
        self.grace = None;
        self.exit = Some(Deadline::after(now, self.config.exit_delay));
    }

    fn grow(&mut self) {
        let count = self.network.len();
        let Some(last) = self.network.bodies().last() else {
            return;
        };
        let angle = PI * 2.0 * count as f32 / self.config.max_nodes as f32;
        let (min_r, max_r) = self.config.growth_radius;
        let radius = min_r + self.rng.gen::<f32>() * (max_r - min_r);
        let position = last.anchor() + Vec2::new(angle.cos(), angle.sin()) * radius;

        let id = self.network.add_body(Body::new(position));
        self.network.connect(id, BodyId(0));
    }

    fn begin_forming(&mut self, ctx: &SimContext) {
        let mut text = TextParticles::new(self.config.text.clone(), ctx.viewport().center());
        if let Err(err) = text.form_from_nodes(self.network.bodies(), self.rasterizer.as_ref()) {
            warn!("intro text could not form: {}", err);
        }
        self.text = Some(text);
        self.set_phase(Phase::Forming);
    }

    fn poll_deadlines(&mut self, now: Duration) {
        if self.grace.as_mut().is_some_and(|d| d.poll(now)) && self.phase == Phase::Forming {
            self.complete(now);
        }
        if self.exit.as_mut().is_some_and(|d| d.poll(now)) && !self.finished {
            self.finished = true;
            debug!("intro finished");
            if let Some(callback) = self.on_finished.as_mut() {
                callback();
            }
        }
    }

    pub fn update(&mut self, ctx: &SimContext, now: Duration) {
        self.poll_deadlines(now);
        if self.phase == Phase::Complete || !self.gate.ready(now) {
            return;
        }
        let dt = self.clock.delta(now);

        if self.phase == Phase::Idle && ctx.pointer_moved() {
            self.set_phase(Phase::Growing);
        }

        if self.phase == Phase::Growing {
            if self.network.len() < self.config.max_nodes {
                if self.rng.gen::<f32>() < self.config.growth_chance {
                    self.grow();
                }
            } else {
                self.begin_forming(ctx);
            }
        }

        if matches!(self.phase, Phase::Growing | Phase::Forming) {
            self.network.step(ctx.pointer());
        }

        if self.phase == Phase::Forming {
            if let Some(text) = self.text.as_mut() {
                text.update(dt);
                if self.grace.is_none() && text.is_formed() {
                    debug!("intro text settled");
                    self.grace = Some(Deadline::after(now, self.config.settle_grace));
                }
            }
        }
    }
}

impl Animation for IntroController {
    fn handle_input(&mut self, input: &HostInput, _ctx: &SimContext, now: Duration) {
        match input {
            HostInput::Skip => self.skip(now),
            HostInput::Resized(viewport) if self.phase == Phase::Idle => self.reset(*viewport),
            _ => (),
        }
    }

    fn tick(&mut self, ctx: &SimContext, now: Duration) {
        self.update(ctx, now);
    }

    fn draw(&self, surface: &mut dyn Surface) {
        if self.finished {
            return;
        }
        self.network.draw(surface, None, true);
        if let Some(text) = self.text.as_ref() {
            text.draw(surface);
        }
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sampler::Raster;
    use std::{cell::Cell, rc::Rc};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn viewport() -> Viewport {
        Viewport::new(1280.0, 720.0)
    }

    fn intro() -> IntroController {
        IntroController::new(viewport(), IntroConfig::default().seed(42))
    }

    fn moved(ctx: &mut SimContext) {
        ctx.apply(&HostInput::PointerMoved(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn test_idle_without_pointer_never_advances() {
        let mut intro = intro();
        let ctx = SimContext::new(viewport());
        for i in 0..500 {
            intro.update(&ctx, ms(i * 40));
        }
        assert_eq!(intro.phase(), Phase::Idle);
        assert_eq!(intro.network().len(), 1);
        assert_eq!(intro.network().bodies()[0].position, viewport().center());
    }

    #[test]
    fn test_phases_advance_in_order() {
        let mut intro = intro();
        let mut ctx = SimContext::new(viewport());
        moved(&mut ctx);

        let mut seen = vec![intro.phase()];
        let mut t = 0;
        while intro.phase() != Phase::Complete {
            t += 40;
            intro.update(&ctx, ms(t));
            if seen.last() != Some(&intro.phase()) {
                if intro.phase() == Phase::Forming {
                    assert_eq!(intro.network().len(), 8);
                }
                seen.push(intro.phase());
            }
            assert!(t < 120_000, "intro stalled in {}", intro.phase());
        }
        assert_eq!(
            seen,
            vec![Phase::Idle, Phase::Growing, Phase::Forming, Phase::Complete]
        );
        assert_eq!(intro.network().connectors().len(), 7);
        assert!(intro
            .network()
            .connectors()
            .iter()
            .all(|c| c.b == BodyId(0)));
    }

    #[test]
    fn test_growth_geometry() {
        let mut intro = IntroController::new(viewport(), IntroConfig::default().growth_chance(1.0).seed(1));
        let mut ctx = SimContext::new(viewport());
        moved(&mut ctx);
        intro.update(&ctx, ms(0));
        assert_eq!(intro.network().len(), 2);

        let first = intro.network().bodies()[0].anchor();
        let second = intro.network().bodies()[1].anchor();
        let offset = second - first;
        let r = offset.length();
        assert!((150.0..=200.0).contains(&r));
        // count was 1 when it grew: angle = 2pi/8
        assert!((offset.y.atan2(offset.x) - PI / 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_grace_delay_before_complete() {
        let mut intro = IntroController::new(viewport(), IntroConfig::default().growth_chance(1.0).seed(9));
        let mut ctx = SimContext::new(viewport());
        moved(&mut ctx);

        let mut t = 0;
        while intro.grace.is_none() {
            t += 40;
            intro.update(&ctx, ms(t));
            assert!(t < 60_000);
        }
        let settled_at = t;
        assert_eq!(intro.phase(), Phase::Forming);

        intro.update(&ctx, ms(settled_at + 599));
        assert_eq!(intro.phase(), Phase::Forming);
        intro.update(&ctx, ms(settled_at + 600));
        assert_eq!(intro.phase(), Phase::Complete);
    }

    #[test]
    fn test_skip_from_growing() {
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);
        let mut intro = IntroController::new(viewport(), IntroConfig::default().growth_chance(1.0).seed(3))
            .on_finished(move || counter.set(counter.get() + 1));
        let mut ctx = SimContext::new(viewport());
        moved(&mut ctx);
        intro.update(&ctx, ms(0));
        intro.update(&ctx, ms(40));
        assert_eq!(intro.phase(), Phase::Growing);
        assert_eq!(intro.network().len(), 3);

        intro.handle_input(&HostInput::Skip, &ctx, ms(50));
        assert_eq!(intro.phase(), Phase::Complete);
        assert!(intro.text().is_none());

        // complete is terminal
        intro.skip(ms(60));
        intro.update(&ctx, ms(100));
        assert_eq!(intro.network().len(), 3);

        intro.update(&ctx, ms(849));
        assert_eq!(fired.get(), 0);
        intro.update(&ctx, ms(850));
        assert_eq!(fired.get(), 1);
        assert!(intro.is_finished());
        intro.update(&ctx, ms(2000));
        intro.skip(ms(2000));
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_update_rate_cap() {
        let mut intro = IntroController::new(viewport(), IntroConfig::default().growth_chance(1.0).seed(3));
        let mut ctx = SimContext::new(viewport());
        moved(&mut ctx);
        intro.update(&ctx, ms(0));
        intro.update(&ctx, ms(10));
        intro.update(&ctx, ms(20));
        assert_eq!(intro.network().len(), 2);
        intro.update(&ctx, ms(34));
        assert_eq!(intro.network().len(), 3);
    }

    /// Paints a single opaque 12x12 block regardless of the text.
    struct Block;

    impl TextRasterizer for Block {
        fn rasterize(&self, _text: &str, width: u32, height: u32, _x: f32, _y: f32) -> Raster {
            let mut raster = Raster::new(width, height);
            raster.fill_rect(0, 0, 12, 12, [255, 255, 255, 255]);
            raster
        }
    }

    #[test]
    fn test_custom_rasterizer_shapes_text() {
        let mut intro = intro().with_rasterizer(Box::new(Block));
        let mut ctx = SimContext::new(viewport());
        moved(&mut ctx);

        let mut t = 0;
        while intro.phase() != Phase::Forming {
            t += 40;
            intro.update(&ctx, ms(t));
            assert!(t < 120_000, "intro stalled in {}", intro.phase());
        }
        // stride 6 over a 12 px block
        assert_eq!(intro.text().map(|text| text.particles().len()), Some(4));
    }

    #[test]
    fn test_resize_recenters_idle_network() {
        let mut intro = intro();
        let ctx = SimContext::new(viewport());
        let small = Viewport::new(200.0, 100.0);
        intro.handle_input(&HostInput::Resized(small), &ctx, ms(0));
        assert_eq!(intro.network().bodies()[0].position, Vec2::new(100.0, 50.0));
    }
}
