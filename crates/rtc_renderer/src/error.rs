use thiserror::Error;

/// Errors raised by camera setup, frame rendering and the worker pool.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("viewport {width}x{height} has no pixels")]
    EmptyViewport { width: u32, height: u32 },

    #[error("pixel ({x}, {y}) is outside the {width}x{height} viewport")]
    PixelOutOfBounds { x: u32, y: u32, width: u32, height: u32 },

    #[error("a render pool needs at least one thread")]
    NoThreads,

    #[error("framebuffer holds {actual} pixels, expected {expected}")]
    FramebufferMismatch { expected: usize, actual: usize },

    #[error("render worker {0} disconnected")]
    WorkerDisconnected(usize),

    #[error("failed to spawn render worker: {0}")]
    Spawn(#[from] std::io::Error),
}

pub type RenderResult<T> = Result<T, RenderError>;
