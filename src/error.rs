use std::fmt;

/// Errors raised while preparing animations or the window. Nothing in a tick
/// path returns them.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Pixel buffer length does not match `width * height * 4`.
    InvalidRaster { expected: usize, actual: usize },
    /// Image has a zero dimension.
    EmptyImage,
    /// Text particles need at least one body to start from.
    NoSourceBodies,
    /// The host could not fetch or decode an image.
    ImageLoad(String),
    /// Window or GPU setup failed.
    Render(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidRaster { expected, actual } => {
                write!(f, "raster needs {} bytes, got {}", expected, actual)
            }
            EngineError::EmptyImage => write!(f, "image has no pixels"),
            EngineError::NoSourceBodies => write!(f, "no source bodies to seed particles from"),
            EngineError::ImageLoad(reason) => write!(f, "image failed to load: {}", reason),
            EngineError::Render(reason) => write!(f, "renderer: {}", reason),
        }
    }
}

impl std::error::Error for EngineError {}
