//! The MIDI to CV kernel.
//!
//! [`CvKernel`] owns the card bank and the MIDI state and turns them into one
//! constant value per output per rendered slice. A render call is split at
//! every event time by the [segmenter](crate::segmenter), so a note-on at
//! frame 100 opens its gate at frame 100, not at the start of the block.
//!
//! # Real-Time Safety
//!
//! [`CvKernel::process`] and everything it calls are allocation-free, lock-free
//! and do no I/O. Lifecycle methods (`initialize`, `set_max_frames_to_render`,
//! `set_bypass`) log and must be called outside the render thread.
//!
//! # Example
//!
//! ```
//! use rope_core::{CvKernel, CvOutputs, HostEvent, KernelConfig};
//!
//! let mut kernel = CvKernel::new(KernelConfig::new());
//! kernel.initialize(48_000.0);
//!
//! let events = [HostEvent::midi(0, &[0x90, 72, 100])];
//! let mut gate = [0.0f32; 64];
//! let mut pitch = [0.0f32; 64];
//! let mut outputs = CvOutputs::new([&mut gate[..], &mut pitch[..]]);
//! kernel.process(0, 64, &events, &mut outputs).unwrap();
//!
//! assert_eq!(gate[0], 1.0);
//! assert_eq!(pitch[0], 0.1);
//! ```

use std::ops::Range;

use crate::buffer::CvOutputs;
use crate::card::{Card, CardBank, CardFunction};
use crate::config::KernelConfig;
use crate::error::{RenderError, RenderResult};
use crate::event::{HostEvent, HostEventKind, LegacyMidi};
use crate::midi::MidiEventPacket;
use crate::midi_state::MidiState;
use crate::sample::Sample;
use crate::segmenter::{process_with_events, SegmentRenderer};
use crate::types::{CardIndex, ParameterAddress, ParameterValue, SampleTime, MIDDLE_C};

/// Semitones per unit of pitch CV (1 V/oct with a ±10 octave span).
const PITCH_SEMITONES_PER_UNIT: f32 = 120.0;

/// Full-scale pitch bend magnitude.
const PITCH_BEND_SCALE: f32 = 8192.0;

/// Full-scale 7-bit value.
const MIDI_7BIT_MAX: f32 = 127.0;

/// MIDI to CV conversion kernel.
#[derive(Debug, Clone)]
pub struct CvKernel {
    cards: CardBank,
    midi: MidiState,
    bypassed: bool,
    sample_rate: f64,
    max_frames: u32,
}

impl CvKernel {
    pub fn new(config: KernelConfig) -> Self {
        Self {
            cards: CardBank::new(),
            midi: MidiState::new(),
            bypassed: config.bypassed,
            sample_rate: config.sample_rate,
            max_frames: config.max_frames,
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Prepare for rendering at `sample_rate`. Restores the default card
    /// layout and clears all MIDI state.
    pub fn initialize(&mut self, sample_rate: f64) {
        log::debug!(
            "Initializing CV kernel: sample_rate={}, max_frames={}",
            sample_rate,
            self.max_frames
        );
        self.sample_rate = sample_rate;
        self.cards = CardBank::new();
        self.midi.reset();
    }

    /// Release render resources. The kernel holds none, so this only logs.
    pub fn deinitialize(&mut self) {
        log::debug!("Deinitializing CV kernel");
    }

    #[inline]
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    #[inline]
    pub fn is_bypassed(&self) -> bool {
        self.bypassed
    }

    /// While bypassed, events are still applied but output buffers are left
    /// as the host handed them over.
    pub fn set_bypass(&mut self, bypassed: bool) {
        if bypassed != self.bypassed {
            log::debug!("CV kernel bypass {}", if bypassed { "on" } else { "off" });
        }
        self.bypassed = bypassed;
    }

    #[inline]
    pub fn max_frames_to_render(&self) -> u32 {
        self.max_frames
    }

    pub fn set_max_frames_to_render(&mut self, max_frames: u32) {
        log::debug!("Maximum frames to render: {}", max_frames);
        self.max_frames = max_frames;
    }

    // =========================================================================
    // State Access
    // =========================================================================

    #[inline]
    pub fn cards(&self) -> &CardBank {
        &self.cards
    }

    #[inline]
    pub fn midi_state(&self) -> &MidiState {
        &self.midi
    }

    /// Apply a host parameter write (clamped; unknown addresses ignored).
    #[inline]
    pub fn set_parameter(&mut self, address: ParameterAddress, value: ParameterValue) {
        self.cards.set_parameter(address, value);
    }

    /// Read a host parameter (unknown addresses read as 0).
    #[inline]
    pub fn parameter(&self, address: ParameterAddress) -> ParameterValue {
        self.cards.parameter(address)
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Apply one host event.
    pub fn handle_event(&mut self, event: &HostEvent<'_>) {
        match event.kind {
            HostEventKind::Parameter { address, value } => self.set_parameter(address, value),
            HostEventKind::Midi(midi) => self.handle_midi1(&midi),
            HostEventKind::MidiEventList(packets) => self.handle_midi_event_list(packets),
        }
    }

    /// Apply a legacy MIDI 1.0 message. Malformed or unused messages are
    /// dropped.
    pub fn handle_midi1(&mut self, midi: &LegacyMidi) {
        if let Some(message) = midi.message() {
            self.midi.apply(message);
        }
    }

    /// Apply every channel-voice message in a UMP event list, in order.
    pub fn handle_midi_event_list(&mut self, packets: &[MidiEventPacket<'_>]) {
        for packet in packets {
            for message in packet.messages() {
                self.midi.apply(message);
            }
        }
    }

    // =========================================================================
    // CV Mapping
    // =========================================================================

    /// Value a single card contributes to its output.
    pub fn cv_value_for_card(&self, index: CardIndex) -> f32 {
        self.cv_value(self.cards.card(index))
    }

    /// Sum of every card routed to `output_number` (one-based), clamped to
    /// -1.0..=1.0.
    pub fn summed_cv_value_for_output(&self, output_number: u8) -> f32 {
        let sum: f32 = self
            .cards
            .routed_to(output_number)
            .map(|card| self.cv_value(card))
            .sum();
        sum.clamp(-1.0, 1.0)
    }

    fn cv_value(&self, card: &Card) -> f32 {
        let function = card.function();
        if function == CardFunction::Off {
            return 0.0;
        }

        let source = self.midi.source(card.source());
        match function {
            CardFunction::Off => 0.0,
            CardFunction::Gate => {
                if source.gate_on {
                    1.0
                } else {
                    0.0
                }
            }
            CardFunction::Pitch => {
                (source.note as f32 - MIDDLE_C as f32) / PITCH_SEMITONES_PER_UNIT
            }
            CardFunction::Velocity => source.velocity as f32 / MIDI_7BIT_MAX,
            CardFunction::PitchBend => source.pitch_bend as f32 / PITCH_BEND_SCALE,
            CardFunction::Aftertouch => source.aftertouch as f32 / MIDI_7BIT_MAX,
            CardFunction::Cc => source
                .cc(card.cc_number())
                .map_or(0.0, |value| value as f32 / MIDI_7BIT_MAX),
        }
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Render `frame_count` frames starting at `start_time`, applying
    /// `events` at their sample times.
    ///
    /// Fails without touching any state or buffer when `frame_count` exceeds
    /// [`max_frames_to_render`](Self::max_frames_to_render).
    pub fn process<'e, 'p: 'e, S, I>(
        &mut self,
        start_time: SampleTime,
        frame_count: u32,
        events: I,
        outputs: &mut CvOutputs<'_, S>,
    ) -> RenderResult<()>
    where
        S: Sample,
        I: IntoIterator<Item = &'e HostEvent<'p>>,
    {
        if frame_count > self.max_frames {
            return Err(RenderError::TooManyFrames {
                requested: frame_count,
                maximum: self.max_frames,
            });
        }

        let mut segments = KernelSegments {
            kernel: self,
            outputs,
        };
        process_with_events(&mut segments, start_time, frame_count as usize, events);
        Ok(())
    }

    /// Write the current summed value of every output over `frames`.
    fn render<S: Sample>(&self, outputs: &mut CvOutputs<'_, S>, frames: Range<usize>) {
        if self.bypassed {
            return;
        }

        for index in 0..outputs.num_outputs() {
            let value = self.summed_cv_value_for_output(index as u8 + 1);
            outputs.fill(index, frames.clone(), S::from_f32(value));
        }
    }
}

impl Default for CvKernel {
    fn default() -> Self {
        Self::new(KernelConfig::default())
    }
}

/// Binds a kernel to one call's output buffers for the segmenter.
struct KernelSegments<'k, 'o, 'b, S: Sample> {
    kernel: &'k mut CvKernel,
    outputs: &'o mut CvOutputs<'b, S>,
}

impl<S: Sample> SegmentRenderer<HostEvent<'_>> for KernelSegments<'_, '_, '_, S> {
    #[inline]
    fn handle_event(&mut self, _now: SampleTime, event: &HostEvent<'_>) {
        self.kernel.handle_event(event);
    }

    #[inline]
    fn render_segment(&mut self, _now: SampleTime, frame_offset: usize, frame_count: usize) {
        self.kernel
            .render(self.outputs, frame_offset..frame_offset + frame_count);
    }
}
