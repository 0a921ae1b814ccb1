//! Common types used throughout the Rope core.

// =============================================================================
// Fixed Capacities
// =============================================================================
//
// Every table in the kernel is a fixed-size array indexed by one of these
// bounds. Nothing on the render path grows, so nothing on the render path
// allocates.
// =============================================================================

/// Number of cards (logical channel strips) in a bank.
pub const CARD_COUNT: usize = 16;

/// Number of MIDI channels tracked per port.
pub const MIDI_CHANNEL_COUNT: usize = 16;

/// Number of MIDI continuous controllers per channel.
pub const CC_COUNT: usize = 128;

/// Number of CV output buses a card can be routed to.
pub const OUTPUT_COUNT: usize = 16;

/// Note number that maps to 0 V on a pitch card.
pub const MIDDLE_C: u8 = 60;

/// Sample-frame timestamp used by host render events.
pub type SampleTime = i64;

/// Host parameter address.
pub type ParameterAddress = u64;

/// Host parameter value (plain, not normalized).
pub type ParameterValue = f32;

/// Index of a card within a [`CardBank`](crate::CardBank), always below
/// [`CARD_COUNT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CardIndex(u8);

impl CardIndex {
    /// Create an index, or `None` if `index >= CARD_COUNT`.
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < CARD_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Array position of this card.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over every card index in order.
    pub fn all() -> impl Iterator<Item = CardIndex> {
        (0..CARD_COUNT as u8).map(CardIndex)
    }
}

/// Zero-based MIDI channel, always below [`MIDI_CHANNEL_COUNT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MidiChannel(u8);

impl MidiChannel {
    /// Create a channel, or `None` if `channel >= MIDI_CHANNEL_COUNT`.
    pub const fn new(channel: u8) -> Option<Self> {
        if (channel as usize) < MIDI_CHANNEL_COUNT {
            Some(Self(channel))
        } else {
            None
        }
    }

    /// Array position of this channel (0-15).
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// One-based channel number as musicians count it (1-16).
    #[inline]
    pub const fn number(self) -> u8 {
        self.0 + 1
    }

    /// Iterate over all sixteen channels in order.
    pub fn all() -> impl Iterator<Item = MidiChannel> {
        (0..MIDI_CHANNEL_COUNT as u8).map(MidiChannel)
    }
}
