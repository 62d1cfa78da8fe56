//! Host integration: the per-frame context, input routing and layer stack.

use std::time::Duration;

use glam::Vec2;

use crate::surface::{palette, Surface};

/// Canvas size in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HostInput {
    PointerMoved(Vec2),
    /// Click or Enter/Space
    Skip,
    Resized(Viewport),
}

/// Shared per-frame state. Written only by the host through [`Stage`], read
/// by every animation during a tick.
#[derive(Clone, Debug)]
pub struct SimContext {
    pointer: Vec2,
    pointer_moved: bool,
    viewport: Viewport,
}

impl SimContext {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            pointer: Vec2::ZERO,
            pointer_moved: false,
            viewport,
        }
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// Whether the pointer has moved at least once.
    pub fn pointer_moved(&self) -> bool {
        self.pointer_moved
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn apply(&mut self, input: &HostInput) {
        match *input {
            HostInput::PointerMoved(p) => {
                self.pointer = p;
                self.pointer_moved = true;
            }
            HostInput::Resized(viewport) => self.viewport = viewport,
            HostInput::Skip => (),
        }
    }
}

/// Something the host ticks and draws every frame.
pub trait Animation {
    fn handle_input(&mut self, _input: &HostInput, _ctx: &SimContext, _now: Duration) {}

    fn tick(&mut self, ctx: &SimContext, now: Duration);

    fn draw(&self, surface: &mut dyn Surface);

    /// Finished layers are dropped by the [`Stage`].
    fn is_finished(&self) -> bool {
        false
    }
}

/// Owns the context and a bottom-to-top stack of animation layers.
pub struct Stage {
    ctx: SimContext,
    layers: Vec<Box<dyn Animation>>,
}

impl Stage {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            ctx: SimContext::new(viewport),
            layers: vec![],
        }
    }

    pub fn push(&mut self, layer: Box<dyn Animation>) {
        self.layers.push(layer);
    }

    pub fn context(&self) -> &SimContext {
        &self.ctx
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn input(&mut self, input: HostInput, now: Duration) {
        self.ctx.apply(&input);
        for layer in self.layers.iter_mut() {
            layer.handle_input(&input, &self.ctx, now);
        }
    }

    /// Ticks every layer, then drops the finished ones.
    pub fn tick(&mut self, now: Duration) {
        for layer in self.layers.iter_mut() {
            layer.tick(&self.ctx, now);
        }
        self.layers.retain(|l| !l.is_finished());
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        surface.clear(palette::BACKGROUND);
        for layer in self.layers.iter() {
            layer.draw(surface);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};
    use std::{cell::RefCell, rc::Rc};

    struct TestLayer {
        log: Rc<RefCell<Vec<String>>>,
        finish_at: Option<Duration>,
        finished: bool,
    }

    impl Animation for TestLayer {
        fn handle_input(&mut self, input: &HostInput, ctx: &SimContext, _now: Duration) {
            self.log
                .borrow_mut()
                .push(format!("{:?} {:?}", input, ctx.pointer()));
        }

        fn tick(&mut self, _ctx: &SimContext, now: Duration) {
            if self.finish_at.is_some_and(|t| now >= t) {
                self.finished = true;
            }
        }

        fn draw(&self, surface: &mut dyn Surface) {
            surface.fill_rect(Vec2::ZERO, Vec2::ONE, palette::light(1.0));
        }

        fn is_finished(&self) -> bool {
            self.finished
        }
    }

    #[test]
    fn test_context_updates_before_layers_see_input() {
        let log = Rc::new(RefCell::new(vec![]));
        let mut stage = Stage::new(Viewport::new(100.0, 100.0));
        stage.push(Box::new(TestLayer {
            log: Rc::clone(&log),
            finish_at: None,
            finished: false,
        }));
        assert!(!stage.context().pointer_moved());

        stage.input(HostInput::PointerMoved(Vec2::new(3.0, 4.0)), Duration::ZERO);
        assert!(stage.context().pointer_moved());
        assert!(log.borrow()[0].ends_with("Vec2(3.0, 4.0)"));

        stage.input(HostInput::Resized(Viewport::new(50.0, 20.0)), Duration::ZERO);
        assert_eq!(stage.context().viewport().center(), Vec2::new(25.0, 10.0));
    }

    #[test]
    fn test_finished_layers_are_dropped() {
        let log = Rc::new(RefCell::new(vec![]));
        let mut stage = Stage::new(Viewport::new(100.0, 100.0));
        stage.push(Box::new(TestLayer {
            log: Rc::clone(&log),
            finish_at: Some(Duration::from_millis(500)),
            finished: false,
        }));
        stage.push(Box::new(TestLayer {
            log,
            finish_at: None,
            finished: false,
        }));

        stage.tick(Duration::from_millis(100));
        assert_eq!(stage.layer_count(), 2);
        stage.tick(Duration::from_millis(500));
        assert_eq!(stage.layer_count(), 1);

        let mut surface = RecordingSurface::new();
        stage.draw(&mut surface);
        assert!(matches!(surface.commands[0], DrawCommand::Clear(_)));
        assert_eq!(surface.commands.len(), 2);
    }
}
