//! Error types for the Rope core.
//!
//! Almost every bad input is normalised silently: parameter values are
//! clamped, unknown addresses ignored, malformed MIDI dropped. The only
//! condition reported back to the host is a render request larger than the
//! kernel was configured for.

use std::fmt;

/// Errors returned from a render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderError {
    /// The host asked for more frames than `max_frames_to_render`.
    TooManyFrames {
        /// Frames requested by the host.
        requested: u32,
        /// Configured maximum render size.
        maximum: u32,
    },
}

impl RenderError {
    /// Audio Unit status code for this error, for host shells that report
    /// `OSStatus` values.
    pub const fn os_status(&self) -> i32 {
        match self {
            Self::TooManyFrames { .. } => os_status::K_AUDIO_UNIT_ERR_TOO_MANY_FRAMES_TO_PROCESS,
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManyFrames { requested, maximum } => write!(
                f,
                "Too many frames to process: {} requested, maximum is {}",
                requested, maximum
            ),
        }
    }
}

impl std::error::Error for RenderError {}

/// Result type for render calls.
pub type RenderResult<T> = Result<T, RenderError>;

/// `OSStatus` codes used when reporting render results to an Audio Unit host.
pub mod os_status {
    /// No error.
    pub const NO_ERR: i32 = 0;

    /// Too many frames to process.
    pub const K_AUDIO_UNIT_ERR_TOO_MANY_FRAMES_TO_PROCESS: i32 = -10874;

    /// Status to hand back to the host for a render result.
    pub const fn from_result(result: &super::RenderResult<()>) -> i32 {
        match result {
            Ok(()) => NO_ERR,
            Err(err) => err.os_status(),
        }
    }
}
