//! Intro network and text, followed by the backdrop grid, skills graph and
//! a particle avatar once the intro finishes (or is skipped with a click,
//! Enter or Space).

use std::{cell::Cell, rc::Rc, time::Duration};

use glam::Vec2;
use nodeglow::{
    formation::ImageParticles,
    intro::{IntroConfig, IntroController},
    renderer::Renderer,
    sampler::Raster,
    scene::{Avatar, Backdrop, SkillGraph},
    stage::{Animation, HostInput, SimContext, Stage, Viewport},
    surface::Surface,
};
use rand::{rngs::StdRng, SeedableRng};

/// Intro first; the remaining layers are built from the viewport at the
/// moment the intro reports it has finished.
struct Portfolio {
    intro: IntroController,
    done: Rc<Cell<bool>>,
    layers: Vec<Box<dyn Animation>>,
}

impl Portfolio {
    fn new(viewport: Viewport) -> Self {
        let done = Rc::new(Cell::new(false));
        let flag = Rc::clone(&done);
        let intro = IntroController::new(viewport, IntroConfig::default())
            .on_finished(move || flag.set(true));
        Self {
            intro,
            done,
            layers: vec![],
        }
    }

    fn build_layers(&mut self, viewport: Viewport) {
        let mut rng = StdRng::from_entropy();
        let mut avatar = Avatar::new(ImageParticles::new(Avatar::config()));
        avatar.load(Ok(portrait(160, 200)), viewport.size(), &mut rng);
        avatar.show();

        self.layers = vec![
            Box::new(Backdrop::new(viewport)),
            Box::new(SkillGraph::new(viewport)),
            Box::new(avatar),
        ];
    }
}

impl Animation for Portfolio {
    fn handle_input(&mut self, input: &HostInput, ctx: &SimContext, now: Duration) {
        if self.done.get() {
            for layer in self.layers.iter_mut() {
                layer.handle_input(input, ctx, now);
            }
        } else {
            self.intro.handle_input(input, ctx, now);
        }
    }

    fn tick(&mut self, ctx: &SimContext, now: Duration) {
        if !self.done.get() {
            self.intro.tick(ctx, now);
            return;
        }
        if self.layers.is_empty() {
            self.build_layers(ctx.viewport());
        }
        for layer in self.layers.iter_mut() {
            layer.tick(ctx, now);
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        if self.done.get() {
            for layer in self.layers.iter() {
                layer.draw(surface);
            }
        } else {
            self.intro.draw(surface);
        }
    }
}

/// Head and shoulders silhouette with a vertical tint gradient.
fn portrait(width: u32, height: u32) -> Raster {
    let mut raster = Raster::new(width, height);
    let w = width as f32;
    let h = height as f32;
    let head = Vec2::new(w / 2.0, h * 0.35);
    let head_r = w * 0.28;
    let shoulders = Vec2::new(w / 2.0, h * 1.05);
    let shoulders_r = w * 0.55;

    for y in 0..height {
        for x in 0..width {
            let p = Vec2::new(x as f32, y as f32);
            if p.distance(head) < head_r || p.distance(shoulders) < shoulders_r {
                let t = y as f32 / h;
                let shade = (200.0 + 40.0 * (1.0 - t)) as u8;
                raster.set_pixel(x, y, [shade, shade, (shade as f32 * 0.9) as u8, 255]);
            }
        }
    }
    raster
}

fn main() {
    let viewport = Viewport::new(1280.0, 720.0);
    let mut stage = Stage::new(viewport);
    stage.push(Box::new(Portfolio::new(viewport)));

    if let Err(err) = Renderer::new(stage).title("nodeglow intro").create_window() {
        eprintln!("{}", err);
    }
}
