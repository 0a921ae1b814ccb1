//! Output buffers for CV rendering.
//!
//! [`CvOutputs`] borrows the host's output channel slices for one render call.
//! Output `n` (one-based, as cards address it) is slice `n - 1`.
//!
//! # Real-Time Safety
//!
//! Storage is a fixed-size array of slice references on the stack. No heap
//! allocation occurs during construction or use.

use std::ops::Range;

use crate::sample::Sample;
use crate::types::OUTPUT_COUNT;

/// Host output channels for one render call.
///
/// `S` is the sample type, defaulting to `f32`.
pub struct CvOutputs<'a, S: Sample = f32> {
    outputs: [Option<&'a mut [S]>; OUTPUT_COUNT],
    num_outputs: usize,
}

impl<'a, S: Sample> CvOutputs<'a, S> {
    /// Wrap output channel slices.
    ///
    /// Only the first [`OUTPUT_COUNT`] channels are kept. Cards cannot route
    /// past output 16, so any further channel is never written and keeps
    /// whatever the host left in it; hosts that expose more channels should
    /// clear them.
    pub fn new(outputs: impl IntoIterator<Item = &'a mut [S]>) -> Self {
        let mut storage: [Option<&'a mut [S]>; OUTPUT_COUNT] = Default::default();
        let mut num_outputs = 0;
        for (i, slice) in outputs.into_iter().take(OUTPUT_COUNT).enumerate() {
            storage[i] = Some(slice);
            num_outputs = i + 1;
        }
        Self {
            outputs: storage,
            num_outputs,
        }
    }

    /// Number of output channels.
    #[inline]
    pub fn num_outputs(&self) -> usize {
        self.num_outputs
    }

    /// Mutable output channel by zero-based index.
    #[inline]
    pub fn output_mut(&mut self, index: usize) -> Option<&mut [S]> {
        self.outputs.get_mut(index)?.as_deref_mut()
    }

    /// Write `value` into `frames` of output `index`. The range is clipped to
    /// the slice, so a short host buffer is never written past its end.
    #[inline]
    pub fn fill(&mut self, index: usize, frames: Range<usize>, value: S) {
        if let Some(output) = self.output_mut(index) {
            let end = frames.end.min(output.len());
            let start = frames.start.min(end);
            output[start..end].fill(value);
        }
    }
}
