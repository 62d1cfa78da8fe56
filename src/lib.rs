//! Spring-driven node networks and particle reveals for animated intros.
//!
//! Bodies are tethered to their spawn point and pushed around by the
//! pointer. An [`intro::IntroController`] grows a small network, then turns
//! it into particle text; [`scene`] holds the layers shown afterwards.
//!
//! # Example
//! ```rust,no_run
//! use nodeglow::{
//!     intro::{IntroConfig, IntroController},
//!     renderer::Renderer,
//!     stage::{Stage, Viewport},
//! };
//!
//! let viewport = Viewport::new(1280.0, 720.0);
//! let mut stage = Stage::new(viewport);
//! stage.push(Box::new(IntroController::new(viewport, IntroConfig::default())));
//! Renderer::new(stage).create_window().unwrap();
//! ```

pub mod error;
pub mod font;
pub mod formation;
pub mod intro;
pub mod network;
pub mod properties;
pub mod renderer;
pub mod sampler;
pub mod scene;
pub mod stage;
pub mod surface;
pub mod timer;
pub mod vector;

pub use error::EngineError;
pub use vector::{Vector2, VectorOps};
