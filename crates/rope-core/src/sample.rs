//! Sample type abstraction for f32/f64 output buffers.
//!
//! Hosts render CV either in single or double precision. The kernel computes
//! every value as `f32` and converts once per output per slice.

/// Trait for output sample types (f32, f64).
pub trait Sample: Copy + Default + Send + Sync + 'static + PartialEq {
    /// Convert from f32.
    fn from_f32(value: f32) -> Self;
}

impl Sample for f32 {
    #[inline(always)]
    fn from_f32(value: f32) -> Self {
        value
    }
}

impl Sample for f64 {
    #[inline(always)]
    fn from_f32(value: f32) -> Self {
        value as f64
    }
}
