//! # rope-core
//!
//! Real-time engine of the Rope MIDI to CV converter.
//!
//! Sixteen configurable cards each derive one value (gate, pitch, velocity,
//! pitch bend, aftertouch or a controller) from incoming MIDI and route it to
//! one of sixteen audio-rate outputs. Cards sharing an output are summed and
//! clamped to -1.0..=1.0. Host shells feed the kernel timestamped events and
//! hand it their output buffers; everything here is format-agnostic.
//!
//! ## Main Types
//!
//! - [`CvKernel`] - Render entry point and lifecycle
//! - [`CardBank`] / [`Card`] - The sixteen routing cards
//! - [`MidiState`] - Per-channel and aggregate MIDI tracking
//! - [`HostEvent`] - Parameter and MIDI events delivered with a render call
//! - [`CvOutputs`] - Borrowed host output buffers
//! - [`KernelConfig`] - Render size, sample rate and initial bypass
//! - [`RenderError`] - Render failures and their host status codes
//!
//! ## Parameter Addresses
//!
//! See [`parameters`] for the address layout hosts use to configure cards.

// `#[derive(EnumParameter)]` expands to `::rope::core::...`, the facade path.
// These two aliases resolve that path inside this crate.
extern crate self as rope;
#[doc(hidden)]
pub use crate as core;

pub mod buffer;
pub mod card;
pub mod config;
pub mod error;
pub mod event;
pub mod kernel;
pub mod midi;
pub mod midi_state;
pub mod parameters;
pub mod sample;
pub mod segmenter;
pub mod types;

// Re-exports for convenience
pub use buffer::CvOutputs;
pub use card::{Card, CardBank, CardFunction, CardSource, DEFAULT_CC_NUMBER};
pub use config::{KernelConfig, DEFAULT_MAX_FRAMES, DEFAULT_SAMPLE_RATE};
pub use error::{RenderError, RenderResult};
pub use event::{HostEvent, HostEventKind, LegacyMidi};
pub use kernel::CvKernel;
pub use midi::{cc, ChannelMessage, MidiEventPacket, UmpMessages};
pub use midi_state::{ChannelState, MidiState};
pub use parameters::{decode_address, CardField, EnumParameterValue};
pub use sample::Sample;
pub use segmenter::{process_with_events, RenderEvent, SegmentRenderer};
pub use types::{
    CardIndex, MidiChannel, ParameterAddress, ParameterValue, SampleTime, CARD_COUNT, CC_COUNT,
    MIDDLE_C, MIDI_CHANNEL_COUNT, OUTPUT_COUNT,
};
