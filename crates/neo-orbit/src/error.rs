//! Error types for the view and the frame submission path.

/// Failures that change what the view can do.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    /// The display surface has no area yet. The size is kept and retried.
    #[error("surface is zero-sized ({width}x{height})")]
    ZeroSizedSurface { width: u32, height: u32 },

    /// No graphics context could be created or it was lost for good.
    #[error("render context unavailable: {0}")]
    RenderContextUnavailable(String),
}

/// Outcome of a failed frame submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// This frame could not be presented; the next one may succeed.
    #[error("frame skipped: {0}")]
    Skipped(String),

    /// The render context is gone. The loop stops and the view degrades.
    #[error("render context lost: {0}")]
    ContextLost(String),
}

impl FrameError {
    /// Returns `true` if the loop can keep running after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }

    /// The backend's description of what went wrong.
    pub fn into_reason(self) -> String {
        match self {
            Self::Skipped(reason) | Self::ContextLost(reason) => reason,
        }
    }
}
