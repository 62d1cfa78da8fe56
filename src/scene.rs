//! Layers shown once the intro is over.

mod avatar;
mod backdrop;
mod skills;

pub use avatar::Avatar;
pub use backdrop::Backdrop;
pub use skills::SkillGraph;
