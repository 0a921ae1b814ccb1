//! Kernel configuration.
//!
//! Host shells describe the render limits they negotiated with the host once,
//! as a `const` value, and hand it to [`CvKernel::new`](crate::CvKernel::new).
//!
//! # Example
//!
//! ```
//! use rope_core::KernelConfig;
//!
//! pub static CONFIG: KernelConfig = KernelConfig::new()
//!     .with_max_frames(512)
//!     .with_sample_rate(48_000.0);
//!
//! assert_eq!(CONFIG.max_frames, 512);
//! ```

/// Default maximum number of frames per render call.
pub const DEFAULT_MAX_FRAMES: u32 = 1024;

/// Default sample rate until the host supplies one.
pub const DEFAULT_SAMPLE_RATE: f64 = 44_100.0;

/// Render limits and initial state for a [`CvKernel`](crate::CvKernel).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelConfig {
    /// Largest frame count a single render call may request.
    pub max_frames: u32,

    /// Sample rate used until `initialize` is called.
    pub sample_rate: f64,

    /// Start in the bypassed state.
    pub bypassed: bool,
}

impl KernelConfig {
    /// Create a configuration with default values.
    pub const fn new() -> Self {
        Self {
            max_frames: DEFAULT_MAX_FRAMES,
            sample_rate: DEFAULT_SAMPLE_RATE,
            bypassed: false,
        }
    }

    /// Set the maximum render size.
    pub const fn with_max_frames(mut self, max_frames: u32) -> Self {
        self.max_frames = max_frames;
        self
    }

    /// Set the initial sample rate.
    pub const fn with_sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Start bypassed.
    pub const fn with_bypass(mut self) -> Self {
        self.bypassed = true;
        self
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self::new()
    }
}
