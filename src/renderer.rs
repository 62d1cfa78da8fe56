//! Hosts a [`Stage`] in a winit window, painting it through glium.

use std::time::{Duration, Instant};

use camera::Camera;
use draw::FrameSurface;
use event::EventManager;
use glium::{glutin::surface::WindowSurface, implement_vertex, Display, Program};
use log::{error, info};
use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::Window,
};

use crate::{
    error::EngineError,
    stage::{HostInput, Stage, Viewport},
};

pub mod camera;
pub mod draw;
mod event;
mod shapes;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Copy, Clone, Debug)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}
implement_vertex!(Vertex, position, color);

pub struct Renderer {
    stage: Stage,
    title: String,
}

impl Renderer {
    pub fn new(stage: Stage) -> Self {
        Self {
            stage,
            title: "nodeglow".to_string(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Opens the window and runs the frame loop until it is closed.
    pub fn create_window(self) -> Result<(), EngineError> {
        let event_loop = winit::event_loop::EventLoopBuilder::new().build();

        let (window, display) = glium::backend::glutin::SimpleWindowBuilder::new()
            .with_title(&self.title)
            .build(&event_loop);

        let program = glium::Program::from_source(
            &display,
            draw::VERTEX_SHADER_SRC,
            draw::FRAGMENT_SHADER_SRC,
            None,
        )
        .map_err(|err| EngineError::Render(err.to_string()))?;

        self.run_render_loop(event_loop, display, window, program)
    }

    fn run_render_loop(
        mut self,
        event_loop: EventLoop<()>,
        display: Display<WindowSurface>,
        window: Window,
        program: Program,
    ) -> ! {
        let started = Instant::now();
        let mut last_redraw = Instant::now();
        let mut events = EventManager::new();

        let size = window.inner_size();
        let mut camera = Camera::new(size.width as f32, size.height as f32);
        self.stage.input(
            HostInput::Resized(Viewport::new(size.width as f32, size.height as f32)),
            Duration::ZERO,
        );
        info!("window {}x{}", size.width, size.height);

        event_loop.run(move |event, _, control_flow| {
            *control_flow = ControlFlow::Poll;
            let now = started.elapsed();

            if let Event::WindowEvent { event, .. } = event {
                match event {
                    WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                        *control_flow = ControlFlow::Exit;
                        return;
                    }
                    WindowEvent::Resized(size) => {
                        display.resize((size.width, size.height));
                        camera.resize(size.width as f32, size.height as f32);
                    }
                    _ => (),
                }
                if let Some(input) = events.translate(&event) {
                    self.stage.input(input, now);
                }
            }

            self.stage.tick(now);

            if last_redraw.elapsed() >= FRAME_INTERVAL {
                last_redraw = Instant::now();

                let mut surface = FrameSurface::new();
                self.stage.draw(&mut surface);

                let mut target = display.draw();
                surface.flush(&mut target, &display, &program, &camera);
                if let Err(err) = target.finish() {
                    error!("swap buffers: {}", err);
                }
            }
        })
    }
}
