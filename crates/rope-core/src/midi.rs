//! MIDI message decoding.
//!
//! Hosts deliver MIDI in two encodings: legacy MIDI 1.0 byte messages and
//! Universal MIDI Packets (UMP). Both reduce to [`ChannelMessage`], which keeps
//! values in the MIDI 1.0 domain (7-bit data, 14-bit pitch bend centred on 0).
//!
//! # Reduction rules
//!
//! MIDI 2.0 channel-voice values carry more resolution than the tracker keeps.
//! They are shifted down with fixed constants:
//!
//! | Field            | MIDI 2.0 width | Reduction                    |
//! |------------------|----------------|------------------------------|
//! | Note velocity    | 16 bit         | `>> 9`                       |
//! | Pitch bend       | 32 bit         | `(raw - 0x8000_0000) >> 18`  |
//! | Channel pressure | 32 bit         | `>> 25`                      |
//! | Control change   | 32 bit         | `>> 25`                      |
//!
//! Anything the tracker does not use (program change, poly pressure, system
//! messages, per-note controllers) decodes to `None`.

use crate::types::{MidiChannel, CC_COUNT};

// =============================================================================
// Status Codes
// =============================================================================

/// Channel-voice status nibbles shared by MIDI 1.0 and MIDI 2.0.
pub mod status {
    pub const NOTE_OFF: u8 = 0x8;
    pub const NOTE_ON: u8 = 0x9;
    pub const CONTROL_CHANGE: u8 = 0xB;
    pub const CHANNEL_PRESSURE: u8 = 0xD;
    pub const PITCH_BEND: u8 = 0xE;
}

/// UMP message types (top nibble of the first word).
pub mod ump_type {
    /// MIDI 1.0 channel voice, one word.
    pub const MIDI1_CHANNEL_VOICE: u8 = 0x2;
    /// MIDI 2.0 channel voice, two words.
    pub const MIDI2_CHANNEL_VOICE: u8 = 0x4;
}

/// Centre of the legacy 14-bit pitch bend range.
pub const PITCH_BEND_CENTER: i32 = 8192;

/// Centre of the MIDI 2.0 32-bit pitch bend range.
pub const PITCH_BEND_CENTER_32: i64 = 0x8000_0000;

// =============================================================================
// ChannelMessage
// =============================================================================

/// A channel-voice message reduced to the MIDI 1.0 value domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelMessage {
    /// Note-on with non-reduced note number and 7-bit velocity.
    NoteOn {
        channel: MidiChannel,
        note: u8,
        velocity: u8,
    },
    /// Note-off. Release velocity is not tracked.
    NoteOff { channel: MidiChannel, note: u8 },
    /// Controller change. `controller` is always below 128.
    ControlChange {
        channel: MidiChannel,
        controller: u8,
        value: u8,
    },
    /// Channel pressure (mono aftertouch), 7-bit.
    ChannelPressure { channel: MidiChannel, pressure: u8 },
    /// Pitch bend, -8192..=8191 with 0 at centre.
    PitchBend { channel: MidiChannel, value: i16 },
}

impl ChannelMessage {
    /// Decode a legacy MIDI 1.0 message.
    ///
    /// `bytes` holds only the valid bytes of the message. Returns `None` for
    /// unsupported statuses and for messages too short for their status.
    /// A note-on with velocity 0 decodes as a note-off.
    pub fn from_midi1(bytes: &[u8]) -> Option<Self> {
        let status_byte = *bytes.first()?;
        let channel = MidiChannel::new(status_byte & 0x0F)?;
        let data = |i: usize| bytes.get(i).map(|b| b & 0x7F);

        let message = match status_byte >> 4 {
            status::NOTE_OFF => Self::NoteOff {
                channel,
                note: data(1)?,
            },
            status::NOTE_ON => {
                let note = data(1)?;
                let velocity = data(2)?;
                if velocity == 0 {
                    Self::NoteOff { channel, note }
                } else {
                    Self::NoteOn {
                        channel,
                        note,
                        velocity,
                    }
                }
            }
            status::CONTROL_CHANGE => Self::ControlChange {
                channel,
                controller: data(1)?,
                value: data(2)?,
            },
            status::CHANNEL_PRESSURE => Self::ChannelPressure {
                channel,
                pressure: data(1)?,
            },
            status::PITCH_BEND => {
                let lsb = data(1)? as i32;
                let msb = data(2)? as i32;
                Self::PitchBend {
                    channel,
                    value: ((msb << 7 | lsb) - PITCH_BEND_CENTER) as i16,
                }
            }
            _ => return None,
        };

        Some(message)
    }

    /// Decode one Universal MIDI Packet message.
    ///
    /// `words` must start at a message boundary; see [`UmpMessages`] for
    /// splitting a packet into messages. Handles MIDI 2.0 channel voice
    /// (type 4) and MIDI 1.0 channel voice wrapped in UMP (type 2).
    pub fn from_ump(words: &[u32]) -> Option<Self> {
        let word0 = *words.first()?;
        match (word0 >> 28) as u8 {
            ump_type::MIDI1_CHANNEL_VOICE => {
                let bytes = [(word0 >> 16) as u8, (word0 >> 8) as u8, word0 as u8];
                Self::from_midi1(&bytes)
            }
            ump_type::MIDI2_CHANNEL_VOICE => Self::from_midi2_channel_voice(word0, *words.get(1)?),
            _ => None,
        }
    }

    fn from_midi2_channel_voice(word0: u32, data: u32) -> Option<Self> {
        let channel = MidiChannel::new(((word0 >> 16) & 0x0F) as u8)?;
        let index = (word0 >> 8) as u8;

        let message = match ((word0 >> 20) & 0x0F) as u8 {
            status::NOTE_ON => {
                let velocity16 = (data >> 16) as u16;
                if velocity16 == 0 {
                    Self::NoteOff {
                        channel,
                        note: index,
                    }
                } else {
                    Self::NoteOn {
                        channel,
                        note: index,
                        velocity: (velocity16 >> 9) as u8,
                    }
                }
            }
            status::NOTE_OFF => Self::NoteOff {
                channel,
                note: index,
            },
            status::PITCH_BEND => Self::PitchBend {
                channel,
                value: ((data as i64 - PITCH_BEND_CENTER_32) >> 18) as i16,
            },
            status::CHANNEL_PRESSURE => Self::ChannelPressure {
                channel,
                pressure: (data >> 25) as u8,
            },
            status::CONTROL_CHANGE => {
                if index as usize >= CC_COUNT {
                    return None;
                }
                Self::ControlChange {
                    channel,
                    controller: index,
                    value: (data >> 25) as u8,
                }
            }
            _ => return None,
        };

        Some(message)
    }

    /// Channel this message was sent on.
    pub const fn channel(&self) -> MidiChannel {
        match *self {
            Self::NoteOn { channel, .. }
            | Self::NoteOff { channel, .. }
            | Self::ControlChange { channel, .. }
            | Self::ChannelPressure { channel, .. }
            | Self::PitchBend { channel, .. } => channel,
        }
    }
}

// =============================================================================
// Universal MIDI Packets
// =============================================================================

/// Number of 32-bit words in a UMP message of the given type.
#[inline]
pub const fn ump_word_count(message_type: u8) -> usize {
    match message_type & 0x0F {
        0x0 | 0x1 | 0x2 | 0x6 | 0x7 => 1,
        0x3 | 0x4 | 0x8 | 0x9 | 0xA => 2,
        0xB | 0xC => 3,
        _ => 4,
    }
}

/// Iterator over the messages packed into a run of UMP words.
///
/// Each item is the word slice of one complete message. A trailing message
/// cut short by the end of the slice is not yielded.
#[derive(Debug, Clone)]
pub struct UmpMessages<'a> {
    words: &'a [u32],
}

impl<'a> UmpMessages<'a> {
    pub fn new(words: &'a [u32]) -> Self {
        Self { words }
    }
}

impl<'a> Iterator for UmpMessages<'a> {
    type Item = &'a [u32];

    fn next(&mut self) -> Option<Self::Item> {
        let first = *self.words.first()?;
        let len = ump_word_count((first >> 28) as u8);
        if len > self.words.len() {
            self.words = &[];
            return None;
        }
        let (message, rest) = self.words.split_at(len);
        self.words = rest;
        Some(message)
    }
}

/// One packet of a host MIDI event list.
///
/// Mirrors CoreMIDI's `MIDIEventPacket`: a timestamp and a run of UMP words
/// that may hold several messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidiEventPacket<'a> {
    /// Host timestamp (0 = now). Not used for scheduling; the enclosing
    /// render event carries the sample time.
    pub time_stamp: u64,
    /// UMP words.
    pub words: &'a [u32],
}

impl<'a> MidiEventPacket<'a> {
    pub const fn new(words: &'a [u32]) -> Self {
        Self {
            time_stamp: 0,
            words,
        }
    }

    /// Decoded channel messages in this packet, skipping everything the
    /// tracker does not use.
    pub fn messages(&self) -> impl Iterator<Item = ChannelMessage> + 'a {
        UmpMessages::new(self.words).filter_map(ChannelMessage::from_ump)
    }
}

// =============================================================================
// Controller Names
// =============================================================================

/// Well-known MIDI CC numbers and their conventional names.
pub mod cc {
    pub const BANK_SELECT: u8 = 0;
    pub const MOD_WHEEL: u8 = 1;
    pub const BREATH: u8 = 2;
    pub const FOOT_CONTROLLER: u8 = 4;
    pub const PORTAMENTO_TIME: u8 = 5;
    pub const DATA_ENTRY: u8 = 6;
    pub const VOLUME: u8 = 7;
    pub const BALANCE: u8 = 8;
    pub const PAN: u8 = 10;
    pub const EXPRESSION: u8 = 11;
    pub const SUSTAIN_PEDAL: u8 = 64;
    pub const PORTAMENTO: u8 = 65;
    pub const SOSTENUTO: u8 = 66;
    pub const SOFT_PEDAL: u8 = 67;
    pub const LEGATO_FOOTSWITCH: u8 = 68;
    pub const HOLD_2: u8 = 69;
    pub const RESONANCE: u8 = 71;
    pub const RELEASE_TIME: u8 = 72;
    pub const ATTACK_TIME: u8 = 73;
    pub const CUTOFF: u8 = 74;
    pub const DECAY_TIME: u8 = 75;
    pub const VIBRATO_RATE: u8 = 76;
    pub const VIBRATO_DEPTH: u8 = 77;
    pub const VIBRATO_DELAY: u8 = 78;
    pub const PORTAMENTO_CONTROL: u8 = 84;
    pub const REVERB_SEND: u8 = 91;
    pub const TREMOLO_DEPTH: u8 = 92;
    pub const CHORUS_SEND: u8 = 93;
    pub const DETUNE_DEPTH: u8 = 94;
    pub const PHASER_DEPTH: u8 = 95;
    pub const ALL_SOUND_OFF: u8 = 120;
    pub const RESET_ALL_CONTROLLERS: u8 = 121;
    pub const ALL_NOTES_OFF: u8 = 123;

    /// Conventional name of a controller, if it has one.
    pub const fn name(controller: u8) -> Option<&'static str> {
        let name = match controller {
            BANK_SELECT => "Bank Select",
            MOD_WHEEL => "Mod Wheel",
            BREATH => "Breath Controller",
            FOOT_CONTROLLER => "Foot Controller",
            PORTAMENTO_TIME => "Portamento Time",
            DATA_ENTRY => "Data Entry",
            VOLUME => "Channel Volume",
            BALANCE => "Balance",
            PAN => "Pan",
            EXPRESSION => "Expression",
            SUSTAIN_PEDAL => "Sustain Pedal",
            PORTAMENTO => "Portamento",
            SOSTENUTO => "Sostenuto",
            SOFT_PEDAL => "Soft Pedal",
            LEGATO_FOOTSWITCH => "Legato Footswitch",
            HOLD_2 => "Hold 2",
            RESONANCE => "Resonance",
            RELEASE_TIME => "Release",
            ATTACK_TIME => "Attack",
            CUTOFF => "Cutoff / Brightness",
            DECAY_TIME => "Decay",
            VIBRATO_RATE => "Vibrato Rate",
            VIBRATO_DEPTH => "Vibrato Depth",
            VIBRATO_DELAY => "Vibrato Delay",
            PORTAMENTO_CONTROL => "Portamento Control",
            REVERB_SEND => "Reverb Send",
            TREMOLO_DEPTH => "Tremolo Depth",
            CHORUS_SEND => "Chorus Send",
            DETUNE_DEPTH => "Detune Depth",
            PHASER_DEPTH => "Phaser Depth",
            ALL_SOUND_OFF => "All Sound Off",
            RESET_ALL_CONTROLLERS => "Reset All Controllers",
            ALL_NOTES_OFF => "All Notes Off",
            _ => return None,
        };
        Some(name)
    }

    /// Label for a controller picker, e.g. `"CC 74 - Cutoff / Brightness"`
    /// or `"CC 3"` for unnamed controllers.
    pub fn display_name(controller: u8) -> String {
        match name(controller) {
            Some(name) => format!("CC {} - {}", controller, name),
            None => format!("CC {}", controller),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ch(n: u8) -> MidiChannel {
        MidiChannel::new(n).unwrap()
    }

    /// Build a MIDI 2.0 channel voice message.
    fn midi2(status: u8, channel: u8, index: u8, data: u32) -> [u32; 2] {
        let word0 = (0x4u32 << 28)
            | (status as u32) << 20
            | (channel as u32) << 16
            | (index as u32) << 8;
        [word0, data]
    }

    #[test]
    fn test_midi1_note_on() {
        assert_eq!(
            ChannelMessage::from_midi1(&[0x93, 60, 100]),
            Some(ChannelMessage::NoteOn {
                channel: ch(3),
                note: 60,
                velocity: 100
            })
        );
    }

    #[test]
    fn test_midi1_velocity_zero_is_note_off() {
        assert_eq!(
            ChannelMessage::from_midi1(&[0x90, 64, 0]),
            Some(ChannelMessage::NoteOff {
                channel: ch(0),
                note: 64
            })
        );
    }

    #[test]
    fn test_midi1_short_messages_are_dropped() {
        assert_eq!(ChannelMessage::from_midi1(&[]), None);
        assert_eq!(ChannelMessage::from_midi1(&[0x90, 60]), None);
        assert_eq!(ChannelMessage::from_midi1(&[0xB0, 1]), None);
        assert_eq!(ChannelMessage::from_midi1(&[0xE0, 0]), None);
        assert_eq!(ChannelMessage::from_midi1(&[0x80]), None);
        assert_eq!(ChannelMessage::from_midi1(&[0xD0]), None);
        // Two bytes are enough for note-off and channel pressure.
        assert!(ChannelMessage::from_midi1(&[0x80, 60]).is_some());
        assert!(ChannelMessage::from_midi1(&[0xD0, 90]).is_some());
    }

    #[test]
    fn test_midi1_unsupported_statuses() {
        assert_eq!(ChannelMessage::from_midi1(&[0xC0, 5]), None); // program change
        assert_eq!(ChannelMessage::from_midi1(&[0xA0, 60, 10]), None); // poly pressure
        assert_eq!(ChannelMessage::from_midi1(&[0xF8]), None); // clock
        assert_eq!(ChannelMessage::from_midi1(&[0x40, 60, 10]), None); // data byte
    }

    #[test]
    fn test_midi1_pitch_bend() {
        let bend = |lsb, msb| match ChannelMessage::from_midi1(&[0xE0, lsb, msb]) {
            Some(ChannelMessage::PitchBend { value, .. }) => value,
            other => panic!("Expected PitchBend, got {:?}", other),
        };
        assert_eq!(bend(0x00, 0x40), 0);
        assert_eq!(bend(0x00, 0x00), -8192);
        assert_eq!(bend(0x7F, 0x7F), 8191);
    }

    #[test]
    fn test_midi1_masks_data_bytes() {
        assert_eq!(
            ChannelMessage::from_midi1(&[0xB2, 0x81, 0xFF]),
            Some(ChannelMessage::ControlChange {
                channel: ch(2),
                controller: 1,
                value: 127
            })
        );
    }

    #[test]
    fn test_midi2_note_on_velocity_reduction() {
        let words = midi2(status::NOTE_ON, 0, 60, 0x8000_0000);
        assert_eq!(
            ChannelMessage::from_ump(&words),
            Some(ChannelMessage::NoteOn {
                channel: ch(0),
                note: 60,
                velocity: 64
            })
        );

        let words = midi2(status::NOTE_ON, 0, 60, 0xFFFF_0000);
        assert!(matches!(
            ChannelMessage::from_ump(&words),
            Some(ChannelMessage::NoteOn { velocity: 127, .. })
        ));
    }

    #[test]
    fn test_midi2_zero_velocity_is_note_off() {
        let words = midi2(status::NOTE_ON, 5, 72, 0);
        assert_eq!(
            ChannelMessage::from_ump(&words),
            Some(ChannelMessage::NoteOff {
                channel: ch(5),
                note: 72
            })
        );
    }

    #[test]
    fn test_midi2_pitch_bend_reduction() {
        let bend = |data| match ChannelMessage::from_ump(&midi2(status::PITCH_BEND, 0, 0, data)) {
            Some(ChannelMessage::PitchBend { value, .. }) => value,
            other => panic!("Expected PitchBend, got {:?}", other),
        };
        assert_eq!(bend(0x8000_0000), 0);
        assert_eq!(bend(0), -8192);
        assert_eq!(bend(u32::MAX), 8191);
        assert_eq!(bend(0x8004_0000), 1);
    }

    #[test]
    fn test_midi2_pressure_and_cc_reduction() {
        assert_eq!(
            ChannelMessage::from_ump(&midi2(status::CHANNEL_PRESSURE, 1, 0, u32::MAX)),
            Some(ChannelMessage::ChannelPressure {
                channel: ch(1),
                pressure: 127
            })
        );
        assert_eq!(
            ChannelMessage::from_ump(&midi2(status::CONTROL_CHANGE, 1, 74, 0x4000_0000)),
            Some(ChannelMessage::ControlChange {
                channel: ch(1),
                controller: 74,
                value: 32
            })
        );
    }

    #[test]
    fn test_midi2_cc_index_out_of_range_is_dropped() {
        assert_eq!(
            ChannelMessage::from_ump(&midi2(status::CONTROL_CHANGE, 0, 200, u32::MAX)),
            None
        );
    }

    #[test]
    fn test_midi2_message_missing_data_word() {
        let words = midi2(status::NOTE_ON, 0, 60, 0x8000_0000);
        assert_eq!(ChannelMessage::from_ump(&words[..1]), None);
    }

    #[test]
    fn test_ump_wrapped_midi1() {
        let word = 0x2093_3C64; // group 0, note on ch 3, note 60, velocity 100
        assert_eq!(
            ChannelMessage::from_ump(&[word]),
            Some(ChannelMessage::NoteOn {
                channel: ch(3),
                note: 60,
                velocity: 100
            })
        );
    }

    #[test]
    fn test_ump_messages_split_by_type() {
        let note = midi2(status::NOTE_ON, 0, 60, 0x8000_0000);
        let words = [
            0x0000_0000, // utility (1 word)
            note[0],
            note[1],
            0x2090_3C64, // MIDI 1.0 note on (1 word)
            0x5000_0000, // data (4 words, truncated)
            0,
        ];
        let lengths: Vec<usize> = UmpMessages::new(&words).map(<[u32]>::len).collect();
        assert_eq!(lengths, vec![1, 2, 1]);
    }

    #[test]
    fn test_packet_messages_skip_unsupported() {
        let bend = midi2(status::PITCH_BEND, 2, 0, 0x8000_0000);
        let words = [0x10F8_0000, bend[0], bend[1], 0x20C0_0500];
        let packet = MidiEventPacket::new(&words);
        let messages: Vec<ChannelMessage> = packet.messages().collect();
        assert_eq!(
            messages,
            vec![ChannelMessage::PitchBend {
                channel: ch(2),
                value: 0
            }]
        );
    }

    #[test]
    fn test_cc_names() {
        assert_eq!(cc::name(cc::MOD_WHEEL), Some("Mod Wheel"));
        assert_eq!(cc::name(3), None);
        assert_eq!(cc::display_name(74), "CC 74 - Cutoff / Brightness");
        assert_eq!(cc::display_name(3), "CC 3");
    }
}
