//! # Rope
//!
//! MIDI to control-voltage conversion for Rust audio hosts.
//!
//! ## Architecture
//!
//! ```text
//! Host shell (AU, VST3, standalone)
//!        ↓  HostEvent + output buffers
//! CvKernel (segment-accurate rendering)
//!        ↓
//! CardBank → MidiState → CV values
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use rope::prelude::*;
//!
//! let mut kernel = CvKernel::new(KernelConfig::new().with_max_frames(512));
//! kernel.initialize(48_000.0);
//!
//! // Route velocity of channel 1 to output 3.
//! let card = CardIndex::new(2).unwrap();
//! kernel.set_parameter(CardField::Function.address(card), CardFunction::Velocity.code() as f32);
//! kernel.set_parameter(CardField::SourceChannel.address(card), 1.0);
//! kernel.set_parameter(CardField::OutputNumber.address(card), 3.0);
//!
//! let events = [HostEvent::midi(0, &[0x90, 60, 127])];
//! let mut buffers = [[0.0f32; 512]; 3];
//! let mut outputs = CvOutputs::new(buffers.iter_mut().map(|b| &mut b[..]));
//! kernel.process(0, 512, &events, &mut outputs).unwrap();
//! drop(outputs);
//!
//! assert_eq!(buffers[2][0], 1.0);
//! ```

// Re-export sub-crates
pub use rope_core as core;

// Re-export derive macros when feature is enabled
/// Derive [`EnumParameterValue`](rope_core::parameters::EnumParameterValue)
/// plus `from_code`, `code` and `name` for a unit enum.
///
/// ```rust
/// use rope::core::EnumParameterValue;
/// use rope::EnumParameter;
///
/// #[derive(Debug, Clone, Copy, PartialEq, EnumParameter)]
/// enum Polarity {
///     #[default]
///     Unipolar,
///     #[name = "Bi-polar"]
///     Bipolar,
/// }
///
/// assert_eq!(Polarity::COUNT, 2);
/// assert_eq!(Polarity::from_code(1), Polarity::Bipolar);
/// assert_eq!(Polarity::from_code(-3), Polarity::Unipolar);
/// assert_eq!(Polarity::Bipolar.code(), 1);
/// assert_eq!(Polarity::Bipolar.name(), "Bi-polar");
/// ```
#[cfg(feature = "derive")]
pub use rope_macros::EnumParameter;

// Lets this crate's own tests use the derive's `::rope::core` paths.
#[cfg(test)]
extern crate self as rope;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use rope::prelude::*;
/// ```
pub mod prelude {
    pub use rope_core::{
        // Kernel and configuration
        CvKernel, KernelConfig,
        // Cards
        Card, CardBank, CardField, CardFunction, CardSource,
        // Events and MIDI
        ChannelMessage, HostEvent, HostEventKind, LegacyMidi, MidiEventPacket, MidiState,
        // Buffers and samples
        CvOutputs, Sample,
        // Errors
        RenderError, RenderResult,
        // Identifiers
        CardIndex, MidiChannel, ParameterAddress, ParameterValue, SampleTime,
        // Enum parameter trait
        EnumParameterValue,
    };

    #[cfg(feature = "derive")]
    pub use rope_macros::EnumParameter as DeriveEnumParameter;
}
