//! MIDI state tracking.
//!
//! [`MidiState`] remembers the last note, velocity, pitch bend, aftertouch and
//! controller values per MIDI channel, plus an "any channel" view that holds
//! whatever was written last on any channel.
//!
//! # Gate semantics
//!
//! Each channel latches one note. A note-off only releases the gate when it
//! names the latched note, so an overlapping legato release of an older note
//! does not close the gate. The aggregate gate is recomputed from all sixteen
//! channel gates after every release; it closes only when no channel is held.

use crate::card::CardSource;
use crate::midi::ChannelMessage;
use crate::types::{MidiChannel, CC_COUNT, MIDDLE_C, MIDI_CHANNEL_COUNT};

/// State of one MIDI channel, or of the aggregate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelState {
    /// True while the latched note is held.
    pub gate_on: bool,
    /// Last note-on pitch. Retained after release.
    pub note: u8,
    /// Last note-on velocity (0-127).
    pub velocity: u8,
    /// Pitch bend, -8192..=8191, 0 at centre.
    pub pitch_bend: i16,
    /// Channel pressure (0-127).
    pub aftertouch: u8,
    /// Last value per controller number (0-127).
    pub cc_values: [u8; CC_COUNT],
}

impl ChannelState {
    /// Power-on state: gate off, middle C, everything else zero.
    pub const INITIAL: Self = Self {
        gate_on: false,
        note: MIDDLE_C,
        velocity: 0,
        pitch_bend: 0,
        aftertouch: 0,
        cc_values: [0; CC_COUNT],
    };

    /// Value of controller `controller`, or `None` if it is not a valid CC
    /// number.
    #[inline]
    pub fn cc(&self, controller: u8) -> Option<u8> {
        self.cc_values.get(controller as usize).copied()
    }
}

impl Default for ChannelState {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// MIDI state for all sixteen channels plus the aggregate view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiState {
    channels: [ChannelState; MIDI_CHANNEL_COUNT],
    any: ChannelState,
}

impl MidiState {
    pub const fn new() -> Self {
        Self {
            channels: [ChannelState::INITIAL; MIDI_CHANNEL_COUNT],
            any: ChannelState::INITIAL,
        }
    }

    /// Return every channel and the aggregate view to the power-on state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// State of a single channel.
    #[inline]
    pub fn channel(&self, channel: MidiChannel) -> &ChannelState {
        &self.channels[channel.index()]
    }

    /// The "any channel" aggregate view.
    #[inline]
    pub fn any_channel(&self) -> &ChannelState {
        &self.any
    }

    /// State a card with the given source reads from.
    #[inline]
    pub fn source(&self, source: CardSource) -> &ChannelState {
        match source {
            CardSource::Any => &self.any,
            CardSource::Channel(channel) => self.channel(channel),
        }
    }

    /// Apply a decoded channel message.
    pub fn apply(&mut self, message: ChannelMessage) {
        match message {
            ChannelMessage::NoteOn {
                channel,
                note,
                velocity,
            } => self.latch_note(channel, note, velocity),
            ChannelMessage::NoteOff { channel, note } => self.note_off(channel, note),
            ChannelMessage::ControlChange {
                channel,
                controller,
                value,
            } => self.control_change(channel, controller, value),
            ChannelMessage::ChannelPressure { channel, pressure } => {
                self.channel_pressure(channel, pressure)
            }
            ChannelMessage::PitchBend { channel, value } => self.pitch_bend(channel, value),
        }
    }

    /// Latch a note on `channel` and open its gate.
    ///
    /// The aggregate takes this note unconditionally. A velocity of 0 is a
    /// note-off.
    pub fn note_on(&mut self, channel: MidiChannel, note: u8, velocity: u8) {
        if velocity == 0 {
            self.note_off(channel, note);
            return;
        }
        self.latch_note(channel, note, velocity);
    }

    /// Open the gate for `note` without the zero-velocity check. Decoded
    /// messages land here: the decoders already turn a raw zero velocity
    /// into a note-off, and a quiet MIDI 2.0 note-on that reduces to 7-bit
    /// velocity 0 still opens the gate.
    fn latch_note(&mut self, channel: MidiChannel, note: u8, velocity: u8) {
        let state = &mut self.channels[channel.index()];
        state.gate_on = true;
        state.note = note;
        state.velocity = velocity;

        self.any.gate_on = true;
        self.any.note = note;
        self.any.velocity = velocity;
    }

    /// Release `note` on `channel` if it is the latched note.
    pub fn note_off(&mut self, channel: MidiChannel, note: u8) {
        let state = &mut self.channels[channel.index()];
        if state.note == note {
            state.gate_on = false;
        }
        self.any.gate_on = self.channels.iter().any(|c| c.gate_on);
    }

    pub fn pitch_bend(&mut self, channel: MidiChannel, value: i16) {
        self.channels[channel.index()].pitch_bend = value;
        self.any.pitch_bend = value;
    }

    pub fn channel_pressure(&mut self, channel: MidiChannel, pressure: u8) {
        self.channels[channel.index()].aftertouch = pressure;
        self.any.aftertouch = pressure;
    }

    /// Store a controller value. Controller numbers of 128 and above are
    /// ignored.
    pub fn control_change(&mut self, channel: MidiChannel, controller: u8, value: u8) {
        let index = controller as usize;
        if index >= CC_COUNT {
            return;
        }
        self.channels[channel.index()].cc_values[index] = value;
        self.any.cc_values[index] = value;
    }
}

impl Default for MidiState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ch(n: u8) -> MidiChannel {
        MidiChannel::new(n).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let state = MidiState::new();
        for channel in MidiChannel::all() {
            assert_eq!(*state.channel(channel), ChannelState::INITIAL);
        }
        assert_eq!(state.any_channel().note, 60);
        assert!(!state.any_channel().gate_on);
    }

    #[test]
    fn test_note_on_updates_channel_and_aggregate() {
        let mut state = MidiState::new();
        state.note_on(ch(2), 67, 90);

        let channel = state.channel(ch(2));
        assert!(channel.gate_on);
        assert_eq!((channel.note, channel.velocity), (67, 90));

        let any = state.any_channel();
        assert!(any.gate_on);
        assert_eq!((any.note, any.velocity), (67, 90));

        assert!(!state.channel(ch(0)).gate_on);
    }

    #[test]
    fn test_stale_note_off_keeps_gate() {
        let mut state = MidiState::new();
        state.note_on(ch(0), 60, 100);

        state.note_off(ch(0), 61);
        assert!(state.channel(ch(0)).gate_on);
        assert!(state.any_channel().gate_on);

        state.note_off(ch(0), 60);
        assert!(!state.channel(ch(0)).gate_on);
        assert!(!state.any_channel().gate_on);
    }

    #[test]
    fn test_legato_overlap_keeps_gate_until_latest_released() {
        let mut state = MidiState::new();
        state.note_on(ch(0), 60, 100);
        state.note_on(ch(0), 64, 100);
        state.note_off(ch(0), 60);
        assert!(state.channel(ch(0)).gate_on);
        assert_eq!(state.channel(ch(0)).note, 64);
        state.note_off(ch(0), 64);
        assert!(!state.channel(ch(0)).gate_on);
    }

    #[test]
    fn test_note_retained_after_release() {
        let mut state = MidiState::new();
        state.note_on(ch(0), 72, 100);
        state.note_off(ch(0), 72);
        assert_eq!(state.channel(ch(0)).note, 72);
        assert_eq!(state.any_channel().note, 72);
    }

    #[test]
    fn test_aggregate_gate_recomputed_in_either_order() {
        for release_a_first in [true, false] {
            let mut state = MidiState::new();
            state.note_on(ch(0), 60, 100);
            state.note_on(ch(1), 64, 100);

            let (first, second) = if release_a_first {
                ((ch(0), 60), (ch(1), 64))
            } else {
                ((ch(1), 64), (ch(0), 60))
            };

            state.note_off(first.0, first.1);
            assert!(state.any_channel().gate_on);

            state.note_off(second.0, second.1);
            assert!(!state.any_channel().gate_on);
        }
    }

    #[test]
    fn test_velocity_zero_matches_note_off() {
        let mut via_note_off = MidiState::new();
        via_note_off.note_on(ch(3), 60, 100);
        via_note_off.note_off(ch(3), 60);

        let mut via_zero_velocity = MidiState::new();
        via_zero_velocity.note_on(ch(3), 60, 100);
        via_zero_velocity.note_on(ch(3), 60, 0);

        assert_eq!(via_note_off, via_zero_velocity);
        assert!(!via_zero_velocity.channel(ch(3)).gate_on);
        // The releasing message does not overwrite the latched velocity.
        assert_eq!(via_zero_velocity.channel(ch(3)).velocity, 100);
    }

    #[test]
    fn test_decoded_note_on_with_reduced_zero_velocity_opens_gate() {
        let mut state = MidiState::new();
        // MIDI 2.0 velocity 0x0100 reduces to 7-bit velocity 0.
        let message = ChannelMessage::from_ump(&[0x4090_4000, 0x0100_0000]).unwrap();
        assert_eq!(
            message,
            ChannelMessage::NoteOn {
                channel: ch(0),
                note: 64,
                velocity: 0,
            }
        );
        state.apply(message);

        assert!(state.channel(ch(0)).gate_on);
        assert!(state.any_channel().gate_on);
        assert_eq!(state.any_channel().note, 64);
        assert_eq!(state.any_channel().velocity, 0);

        // A raw zero velocity is still a release.
        state.apply(ChannelMessage::from_ump(&[0x4090_4000, 0x0000_0000]).unwrap());
        assert!(!state.any_channel().gate_on);
    }

    #[test]
    fn test_continuous_values_are_last_write_wins() {
        let mut state = MidiState::new();
        state.pitch_bend(ch(0), -4096);
        state.pitch_bend(ch(5), 2000);
        state.channel_pressure(ch(1), 90);
        state.control_change(ch(0), 74, 10);
        state.control_change(ch(9), 74, 99);

        assert_eq!(state.channel(ch(0)).pitch_bend, -4096);
        assert_eq!(state.any_channel().pitch_bend, 2000);
        assert_eq!(state.any_channel().aftertouch, 90);
        assert_eq!(state.channel(ch(0)).cc(74), Some(10));
        assert_eq!(state.channel(ch(9)).cc(74), Some(99));
        assert_eq!(state.any_channel().cc(74), Some(99));
    }

    #[test]
    fn test_cc_out_of_range_is_ignored() {
        let mut state = MidiState::new();
        state.control_change(ch(0), 128, 55);
        state.control_change(ch(0), 255, 55);
        assert_eq!(state, MidiState::new());
    }

    #[test]
    fn test_apply_and_reset() {
        let mut state = MidiState::new();
        state.apply(ChannelMessage::NoteOn {
            channel: ch(4),
            note: 48,
            velocity: 20,
        });
        state.apply(ChannelMessage::PitchBend {
            channel: ch(4),
            value: 100,
        });
        assert!(state.source(CardSource::Channel(ch(4))).gate_on);
        assert_eq!(state.source(CardSource::Any).pitch_bend, 100);

        state.reset();
        assert_eq!(state, MidiState::new());
    }
}
