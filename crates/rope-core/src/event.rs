//! Host render events.
//!
//! A host delivers events to a render call as a time-ordered sequence. Host
//! shells translate their native event list (for Audio Units, the linked list
//! of `AURenderEvent`s) into [`HostEvent`]s without copying MIDI payloads.

use crate::midi::{ChannelMessage, MidiEventPacket};
use crate::segmenter::RenderEvent;
use crate::types::{ParameterAddress, ParameterValue, SampleTime};

/// A legacy MIDI 1.0 message as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacyMidi {
    /// Number of valid bytes in `data`.
    pub length: u16,
    /// Status byte followed by up to two data bytes.
    pub data: [u8; 3],
}

impl LegacyMidi {
    /// Build from message bytes. Bytes past the third are dropped.
    pub fn new(bytes: &[u8]) -> Self {
        let mut data = [0; 3];
        let length = bytes.len().min(data.len());
        data[..length].copy_from_slice(&bytes[..length]);
        Self {
            length: length as u16,
            data,
        }
    }

    /// The valid bytes.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.data[..(self.length as usize).min(self.data.len())]
    }

    /// Decode into a channel message, if the tracker uses it.
    #[inline]
    pub fn message(&self) -> Option<ChannelMessage> {
        ChannelMessage::from_midi1(self.bytes())
    }
}

/// What a host event carries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEventKind<'a> {
    /// Parameter change from automation or the UI.
    Parameter {
        address: ParameterAddress,
        value: ParameterValue,
    },
    /// Legacy MIDI 1.0 byte message.
    Midi(LegacyMidi),
    /// MIDI event list of Universal MIDI Packets.
    MidiEventList(&'a [MidiEventPacket<'a>]),
}

/// A timestamped host event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostEvent<'a> {
    /// Absolute sample time, on the same clock as the render start time.
    pub sample_time: SampleTime,
    pub kind: HostEventKind<'a>,
}

impl<'a> HostEvent<'a> {
    pub const fn parameter(
        sample_time: SampleTime,
        address: ParameterAddress,
        value: ParameterValue,
    ) -> Self {
        Self {
            sample_time,
            kind: HostEventKind::Parameter { address, value },
        }
    }

    pub fn midi(sample_time: SampleTime, bytes: &[u8]) -> Self {
        Self {
            sample_time,
            kind: HostEventKind::Midi(LegacyMidi::new(bytes)),
        }
    }

    pub const fn midi_event_list(sample_time: SampleTime, packets: &'a [MidiEventPacket<'a>]) -> Self {
        Self {
            sample_time,
            kind: HostEventKind::MidiEventList(packets),
        }
    }
}

impl RenderEvent for HostEvent<'_> {
    #[inline]
    fn sample_time(&self) -> SampleTime {
        self.sample_time
    }
}
